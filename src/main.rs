use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use amc_receipts::cli::{
    handle_audit, handle_committee_command, handle_export_command, handle_overview,
    handle_receipt_command, handle_report_command, handle_scope, handle_user_command,
    handle_whoami, read_password, CommitteeCommands, ExportCommands, ReceiptCommands,
    ReportCommands, Session, UserCommands,
};
use amc_receipts::config::{paths::AmcPaths, settings::Settings};
use amc_receipts::services::UserService;
use amc_receipts::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "amc",
    version,
    about = "Agricultural market committee receipt records",
    long_about = "Record, verify and report on trade receipts issued by agricultural \
                  market committees. Data entry operators enter receipts, checkpost \
                  officers verify slips, supervisors and joint directors review \
                  analytics for the committees they oversee."
)]
struct Cli {
    /// User to act as
    #[arg(short, long, global = true, env = "AMC_USER")]
    user: Option<String>,

    /// Show debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and create the first Joint Director
    Init {
        /// Username for the first Joint Director
        #[arg(long, default_value = "jd")]
        admin: String,
        /// Display name for the first Joint Director
        #[arg(long, default_value = "Joint Director")]
        name: String,
    },

    /// Show or change configuration
    Config {
        /// Add a town name that links short committee labels to committees
        #[arg(long)]
        add_alias: Option<String>,
        /// Default row limit for top-N report tables
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Check your credentials
    Login,

    /// Show your profile
    Whoami,

    /// Dashboard totals for your scope
    Overview {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which committees and receipts you can see
    Scope,

    /// Receipt entry, listing and verification
    #[command(subcommand)]
    Receipt(ReceiptCommands),

    /// Analytics and trader reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export receipts
    #[command(subcommand)]
    Export(ExportCommands),

    /// User management (Joint Directors)
    #[command(subcommand)]
    User(UserCommands),

    /// Committee listing and registration
    #[command(subcommand)]
    Committee(CommitteeCommands),

    /// Show recent audit log entries
    Audit {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("AMC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let paths = AmcPaths::new()?;

    let command = match cli.command {
        Some(Commands::Init { admin, name }) => return run_init(&paths, &admin, &name),
        Some(command) => command,
        None => {
            println!("AMC Receipts - agricultural market committee receipt records");
            println!();
            println!("Run 'amc --help' for usage information.");
            println!("Run 'amc init' to set up a new data directory.");
            return Ok(());
        }
    };

    if !paths.is_initialized() {
        bail!(
            "No data found at {}. Run 'amc init' first.",
            paths.base_dir().display()
        );
    }

    let mut settings = Settings::load_or_create(&paths)?;

    if let Commands::Config { add_alias, top_n } = command {
        return run_config(&paths, &mut settings, add_alias, top_n);
    }

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let session = Session::login(&storage, &settings, cli.user.as_deref())?;
    tracing::debug!(user = %session.principal.name, role = %session.principal.role, "session opened");

    match command {
        Commands::Login => {
            println!(
                "Logged in as {} ({})",
                session.principal.name,
                session.principal.role.description()
            );
        }
        Commands::Whoami => handle_whoami(&session)?,
        Commands::Overview { output } => handle_overview(&session, output)?,
        Commands::Scope => handle_scope(&session)?,
        Commands::Receipt(cmd) => handle_receipt_command(&session, cmd)?,
        Commands::Report(cmd) => handle_report_command(&session, cmd)?,
        Commands::Export(cmd) => handle_export_command(&session, cmd)?,
        Commands::User(cmd) => handle_user_command(&session, cmd)?,
        Commands::Committee(cmd) => handle_committee_command(&session, cmd)?,
        Commands::Audit { limit } => handle_audit(&session, limit)?,
        Commands::Init { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

fn run_init(paths: &AmcPaths, admin: &str, name: &str) -> Result<()> {
    println!("Initializing AMC Receipts at: {}", paths.base_dir().display());
    initialize_storage(paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    if storage.users.count()? == 0 {
        let password = read_password(&format!("Password for {}: ", admin))?;
        let user = UserService::new(&storage).bootstrap_admin(admin, name, &password)?;
        println!("Created Joint Director account: {}", user.username);
    }

    println!("Initialization complete!");
    println!();
    println!("Committees:");
    for committee in storage.committees.get_all()? {
        println!("  - {}", committee.name);
    }
    println!();
    println!("Run 'amc --user <name> user add' to create accounts for your staff.");
    Ok(())
}

fn run_config(
    paths: &AmcPaths,
    settings: &mut Settings,
    add_alias: Option<String>,
    top_n: Option<usize>,
) -> Result<()> {
    let mut changed = false;
    if let Some(alias) = add_alias {
        let alias = alias.trim().to_lowercase();
        if !alias.is_empty() && !settings.committee_aliases.contains(&alias) {
            settings.committee_aliases.push(alias);
            changed = true;
        }
    }
    if let Some(top_n) = top_n {
        if top_n == 0 {
            bail!("--top-n must be at least 1");
        }
        settings.top_n = top_n;
        changed = true;
    }
    if changed {
        settings.save(paths)?;
        println!("Settings saved.");
        println!();
    }

    println!("AMC Receipts Configuration");
    println!("==========================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Data directory:   {}", paths.data_dir().display());
    println!("Audit log:        {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol:   {}", settings.currency_symbol);
    println!("  Date format:       {}", settings.date_format);
    println!("  Top-N rows:        {}", settings.top_n);
    if settings.committee_aliases.is_empty() {
        println!("  Committee aliases: (defaults only)");
    } else {
        println!(
            "  Committee aliases: {}",
            settings.committee_aliases.join(", ")
        );
    }
    Ok(())
}

//! CLI commands for reports
//!
//! Analytics and trader reports over the receipts in the caller's scope.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{AmcError, AmcResult};
use crate::models::{Capability, MonthKey};
use crate::reports::{trader_monthly_trend, AnalyticsReport, TraderReport};

use super::session::Session;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// District, commodity and monthly breakdowns
    Analytics {
        /// Number of commodities to show
        #[arg(long)]
        top: Option<usize>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-trader statistics
    Traders {
        /// Month for the "active traders" count (YYYY-MM, defaults to this month)
        #[arg(short, long)]
        month: Option<String>,

        /// Only traders whose name contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Show the month-by-month trend for one trader
        #[arg(long)]
        trader: Option<String>,

        /// Show top N traders only
        #[arg(long)]
        top: Option<usize>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(session: &Session, cmd: ReportCommands) -> AmcResult<()> {
    session.require(Capability::ViewAnalytics)?;

    match cmd {
        ReportCommands::Analytics { top, output } => handle_analytics_report(session, top, output),
        ReportCommands::Traders {
            month,
            search,
            trader,
            top,
            output,
        } => handle_trader_report(session, month, search, trader, top, output),
    }
}

fn handle_analytics_report(
    session: &Session,
    top: Option<usize>,
    output: Option<PathBuf>,
) -> AmcResult<()> {
    let scope = session.view_scope();
    let top = top.unwrap_or(session.settings.top_n);
    let report = AnalyticsReport::generate_with_limit(&scope.receipts, &scope.committees, top);

    if let Some(path) = output {
        let mut writer = create_output(&path)?;
        report.export_csv(&mut writer)?;
        writer.flush().map_err(|e| AmcError::Export(e.to_string()))?;
        println!("Analytics report exported to: {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

fn handle_trader_report(
    session: &Session,
    month: Option<String>,
    search: Option<String>,
    trader: Option<String>,
    top: Option<usize>,
    output: Option<PathBuf>,
) -> AmcResult<()> {
    let month = match month {
        Some(m) => MonthKey::parse(&m).map_err(|e| AmcError::Validation(e.to_string()))?,
        None => MonthKey::current(),
    };

    let scope = session.view_scope();

    if let Some(trader) = trader {
        let trend = trader_monthly_trend(&scope.receipts, &trader);
        if trend.is_empty() {
            println!("No receipts found for trader '{}'.", trader);
            return Ok(());
        }
        println!("Monthly trend for {}", trader);
        println!("{}", "=".repeat(40));
        for month in &trend {
            println!(
                "{:<10} {:>5} receipts {:>16}",
                month.key.label(),
                month.count,
                month.total_value.to_string()
            );
        }
        return Ok(());
    }

    let report = TraderReport::generate(&scope.receipts, month);

    if let Some(path) = output {
        let mut writer = create_output(&path)?;
        report.export_csv(&mut writer)?;
        writer.flush().map_err(|e| AmcError::Export(e.to_string()))?;
        println!("Trader report exported to: {}", path.display());
        return Ok(());
    }

    if let Some(query) = search {
        let matches = report.search(&query);
        if matches.is_empty() {
            println!("No traders match '{}'.", query);
        }
        for stats in matches {
            println!(
                "{:<30} {:>5} receipts {:>16}  {}",
                stats.name,
                stats.receipt_count,
                stats.total_value.to_string(),
                stats.commodities.join(", ")
            );
        }
        return Ok(());
    }

    println!("{}", report.format_terminal(top.unwrap_or(session.settings.top_n)));
    Ok(())
}

pub(crate) fn create_output(path: &Path) -> AmcResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        AmcError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

//! Export CLI commands
//!
//! CSV export of the visible receipt list, and full JSON/YAML snapshots.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::error::{AmcError, AmcResult};
use crate::export::{export_full_json, export_full_yaml, export_receipts_csv, FullExport};
use crate::models::Capability;
use crate::services::ReceiptFilter;

use super::report::create_output;
use super::session::Session;

/// Export format for full snapshots
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export the receipts you can see to CSV
    Receipts {
        /// Output file path (use - for stdout)
        output: PathBuf,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        committee: Option<String>,

        #[arg(long)]
        commodity: Option<String>,
    },

    /// Export committees and receipts in your scope
    All {
        /// Output file path (use - for stdout)
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
    },
}

/// Handle export commands
pub fn handle_export_command(session: &Session, cmd: ExportCommands) -> AmcResult<()> {
    session.require(Capability::Export)?;

    match cmd {
        ExportCommands::Receipts {
            output,
            search,
            committee,
            commodity,
        } => {
            let scope = session.view_scope();

            let mut filter = ReceiptFilter::new();
            if let Some(search) = search {
                filter = filter.search(search);
            }
            if let Some(committee) = committee {
                filter = filter.committee(committee);
            }
            if let Some(commodity) = commodity {
                filter = filter.commodity(commodity);
            }
            let filtered = filter.apply(&scope.receipts, &scope.committees);

            write_to(&output, |mut writer| {
                export_receipts_csv(&filtered.rows, &scope.committees, &mut writer)
            })?;

            tracing::info!(rows = filtered.shown(), "receipts exported");
            if !is_stdout(&output) {
                println!(
                    "Exported {} receipts to: {}",
                    filtered.shown(),
                    output.display()
                );
            }
        }

        ExportCommands::All { output, format } => {
            let scope = session.view_scope();
            let export = FullExport::from_scope(&scope, &session.principal);

            write_to(&output, |mut writer| match format {
                ExportFormat::Json => export_full_json(&export, &mut writer),
                ExportFormat::Yaml => export_full_yaml(&export, &mut writer),
            })?;

            if !is_stdout(&output) {
                println!(
                    "Exported {} committees and {} receipts to: {}",
                    export.metadata.committee_count,
                    export.metadata.receipt_count,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn is_stdout(path: &std::path::Path) -> bool {
    path.as_os_str() == "-"
}

fn write_to<F>(output: &std::path::Path, write: F) -> AmcResult<()>
where
    F: FnOnce(&mut dyn Write) -> AmcResult<()>,
{
    if is_stdout(output) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write(&mut handle)?;
        handle.flush().map_err(|e| AmcError::Export(e.to_string()))
    } else {
        let mut writer = create_output(output)?;
        write(&mut writer)?;
        writer.flush().map_err(|e| AmcError::Export(e.to_string()))
    }
}

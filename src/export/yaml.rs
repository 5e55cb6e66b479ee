//! YAML export
//!
//! The same snapshot as the JSON export, under a short comment header.

use std::io::Write;

use crate::error::{AmcError, AmcResult};
use crate::export::json::FullExport;

pub fn export_full_yaml<W: Write>(export: &FullExport, writer: &mut W) -> AmcResult<()> {
    let header = format!(
        "# AMC Receipts export\n# Generated: {}\n# Exported by: {}\n# App Version: {}\n\n",
        export.exported_at, export.exported_by, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| AmcError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| AmcError::Export(e.to_string()))?;

    Ok(())
}

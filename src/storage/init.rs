//! Storage initialization
//!
//! First-run setup: directories, default settings and the committees of the
//! East Godavari district.

use crate::config::paths::AmcPaths;
use crate::config::settings::Settings;
use crate::error::AmcError;
use crate::models::Committee;

use super::committees::CommitteeData;
use super::file_io::write_json_atomic;

/// Committees seeded on first run: (name, code, district)
pub const DEFAULT_COMMITTEES: [(&str, &str, &str); 4] = [
    ("Tuni Agricultural Market Committee", "TUN", "East Godavari"),
    ("Kakinada Agricultural Market Committee", "KKD", "East Godavari"),
    ("Rajahmundry Agricultural Market Committee", "RJY", "East Godavari"),
    ("Amalapuram Agricultural Market Committee", "AMP", "East Godavari"),
];

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched, so running this twice is harmless.
pub fn initialize_storage(paths: &AmcPaths) -> Result<(), AmcError> {
    paths.ensure_directories()?;

    if !paths.committees_file().exists() {
        create_default_committees(paths)?;
    }

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    Ok(())
}

fn create_default_committees(paths: &AmcPaths) -> Result<(), AmcError> {
    let committees = DEFAULT_COMMITTEES
        .iter()
        .map(|(name, code, district)| {
            Committee::new(*name).with_code(*code).with_district(*district)
        })
        .collect();

    write_json_atomic(paths.committees_file(), &CommitteeData { committees })?;
    tracing::info!(count = DEFAULT_COMMITTEES.len(), "seeded default committees");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_seeds_committees_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AmcPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();
        assert!(paths.is_initialized());

        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let committees = storage.committees.get_all().unwrap();
        let names: Vec<_> = committees.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            DEFAULT_COMMITTEES.iter().map(|(n, _, _)| *n).collect::<Vec<_>>()
        );
        assert_eq!(committees[1].code.as_deref(), Some("KKD"));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AmcPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();
        let storage = Storage::new(paths.clone()).unwrap();
        storage.load_all().unwrap();
        storage.committees.upsert(Committee::new("Peddapuram AMC")).unwrap();
        storage.committees.save().unwrap();

        initialize_storage(&paths).unwrap();
        storage.committees.load().unwrap();
        assert_eq!(storage.committees.count().unwrap(), 5);
    }
}

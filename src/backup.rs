//! Database backup before any mutation.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Copy the database file into `dest_dir`, filename stamped with the local
/// time. Returns the path of the copy.
pub fn backup_database(db: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let filename = format!(
        "{}_backup_synoautoblock.db",
        Local::now().format("%Y%d%m_%H%M%S")
    );
    let dest = dest_dir.join(filename);
    fs::copy(db, &dest)
        .with_context(|| format!("Failed to backup database to {}", dest.display()))?;
    info!("Database successfully backed up to {}", dest.display());
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_backup_copies_verbatim() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let db = src_dir.path().join("synoautoblock.db");
        let mut file = fs::File::create(&db).unwrap();
        file.write_all(b"not really sqlite").unwrap();

        let copy = backup_database(&db, dest_dir.path()).unwrap();
        assert!(copy.starts_with(dest_dir.path()));
        assert!(copy
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("_backup_synoautoblock.db"));
        assert_eq!(fs::read(&copy).unwrap(), b"not really sqlite");
    }

    #[test]
    fn test_backup_missing_source_fails() {
        let dest_dir = tempfile::tempdir().unwrap();
        let result = backup_database(Path::new("/nonexistent/synoautoblock.db"), dest_dir.path());
        assert!(result.is_err());
    }
}

//! Timestamped database backups
//!
//! Every database mutation is preceded by a byte-exact copy to a sibling
//! file named `<database>.backup.<unix-seconds>`. Backups are kept
//! indefinitely; they are the recovery artifact if a later write goes
//! wrong.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{Error, Result};

/// Copy the database to a timestamped sibling and return the backup path
///
/// The copy is complete (flushed and closed) before this returns; callers
/// must not write the database unless this succeeded.
pub fn backup_database(db_path: &Path) -> Result<PathBuf> {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(format!(".backup.{}", Utc::now().timestamp()));
    let backup_path = PathBuf::from(name);

    fs::copy(db_path, &backup_path).map_err(|e| {
        Error::BackupFailed(format!(
            "copy {} -> {}: {}",
            db_path.display(),
            backup_path.display(),
            e
        ))
    })?;

    tracing::info!("Database backup created at {}", backup_path.display());
    Ok(backup_path)
}

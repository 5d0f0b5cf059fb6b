//! Database hygiene: prune path-less, corrupted, metadata-less, and
//! duplicate records

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::backup::backup_database;
use crate::database::{read_database, write_database, Record};
use crate::error::Result;
use crate::utils::clean_path;

/// What a clean pass removes beyond hard corruption
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CleanupOptions {
    /// Drop records whose normalized path was already seen
    pub remove_duplicates: bool,
    /// Drop records with no title, artist, or album
    pub require_metadata: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            require_metadata: true,
        }
    }
}

/// Counters from a clean pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupStats {
    pub original_count: usize,
    pub removed_no_path: usize,
    pub removed_corrupted: usize,
    pub removed_no_metadata: usize,
    pub removed_duplicates: usize,
    pub final_count: usize,
}

impl CleanupStats {
    /// Total records removed
    pub fn removed(&self) -> usize {
        self.original_count - self.final_count
    }
}

/// Filter records in order, counting each removal reason
///
/// Rules apply in sequence per record: missing/blank path, then corrupted
/// path (too short or containing NUL), then missing metadata, then
/// duplicate path. The duplicate key is the cleaned, lowercased `pfil`,
/// so the same track written with Windows and Unix spellings collapses to
/// one record.
pub fn clean_records(
    records: Vec<Record>,
    options: &CleanupOptions,
) -> (Vec<Record>, CleanupStats) {
    let mut stats = CleanupStats {
        original_count: records.len(),
        ..Default::default()
    };

    let mut kept = Vec::with_capacity(records.len());
    let mut seen_paths = std::collections::HashSet::new();

    for record in records {
        let pfil = match record.file_path() {
            Some(p) if !p.trim().is_empty() => p,
            _ => {
                stats.removed_no_path += 1;
                continue;
            }
        };

        if pfil.len() < 3 || pfil.contains('\0') {
            stats.removed_corrupted += 1;
            continue;
        }

        if options.require_metadata && !has_metadata(&record) {
            stats.removed_no_metadata += 1;
            continue;
        }

        if options.remove_duplicates {
            let normalized = clean_path(pfil).to_lowercase();
            if !seen_paths.insert(normalized) {
                stats.removed_duplicates += 1;
                continue;
            }
        }

        kept.push(record);
    }

    stats.final_count = kept.len();
    (kept, stats)
}

fn has_metadata(record: &Record) -> bool {
    [*b"ttit", *b"tart", *b"talb"]
        .iter()
        .any(|tag| record.text(*tag).is_some_and(|v| !v.trim().is_empty()))
}

/// Outcome of a full clean-database operation
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub stats: CleanupStats,
    pub backup_path: PathBuf,
}

impl CleanupReport {
    /// User-facing summary string
    pub fn summary(&self) -> String {
        format!(
            "Database cleanup complete.\nOriginal records: {}\nCleaned records: {}",
            self.stats.original_count, self.stats.final_count
        )
    }
}

/// Clean the database on disk: read, back up, filter, rewrite
///
/// The backup happens after a successful read and before the rewrite; if
/// it fails the database is left untouched.
pub fn clean_database(db_path: &Path, options: &CleanupOptions) -> Result<CleanupReport> {
    tracing::info!("Cleaning database at {}", db_path.display());

    let db = read_database(db_path, "")?;
    let backup_path = backup_database(db_path)?;
    let (kept, stats) = clean_records(db.records, options);
    write_database(db_path, &kept)?;

    tracing::info!(
        "Cleanup removed {} of {} records",
        stats.removed(),
        stats.original_count
    );

    Ok(CleanupReport {
        stats,
        backup_path,
    })
}

//! Main synchronization engine
//!
//! One `run` performs a full sync: scan the library, diff it against the
//! database, rewrite the crates that gained tracks, back the database up,
//! and append a minimal record per new track. Serato fills in metadata
//! when it analyzes the files.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::backup::backup_database;
use crate::config::Config;
use crate::crates::{build_crate_payload, build_ptrk, write_crate};
use crate::database::{read_database, write_database, Record};
use crate::error::{Error, Result};
use crate::library::{build_crate_plans, detect_new_tracks, library_stats, LibraryScanner};

/// Sink for user-visible progress lines
///
/// The host (GUI shell, CLI) renders these however it likes; emission
/// never blocks the sync.
pub type LogCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Counters from one sync run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    /// Audio files found in the library
    pub files_scanned: usize,
    /// Directories holding at least one audio file
    pub directories_scanned: usize,
    /// Database records before the sync
    pub records_before: usize,
    /// Scanned tracks absent from the database
    pub new_tracks: usize,
    /// Records actually appended
    pub tracks_added: usize,
    /// Database records after the sync
    pub records_after: usize,
    /// Crate files written or updated
    pub crates_written: usize,
    /// Track paths written across all rewritten crates
    pub crate_tracks_written: usize,
    /// Backup created before the database rewrite, if one was needed
    pub backup_path: Option<PathBuf>,
    /// Whether this was a dry run (nothing written)
    pub dry_run: bool,
}

impl SyncSummary {
    /// Multi-line human-readable summary block
    pub fn report(&self) -> String {
        let header = if self.dry_run {
            "SYNC SUMMARY (dry run)"
        } else {
            "SYNC SUMMARY"
        };
        format!(
            "--------------------\n\
             {}\n\
             --------------------\n\
             Music Library Files Scanned: {}\n\
             Serato Database Tracks Before Sync: {}\n\
             New Tracks Detected: {}\n\
             Tracks Added to Database: {}\n\
             Total Tracks in Database After Sync: {}\n\
             Crate Files Written/Updated: {}\n\
             Total Tracks Written to Crates: {}\n\
             --------------------",
            header,
            self.files_scanned,
            self.records_before,
            self.new_tracks,
            self.tracks_added,
            self.records_after,
            self.crates_written,
            self.crate_tracks_written,
        )
    }
}

/// Synchronization engine for one library/database pair
pub struct SyncEngine {
    config: Config,
    dry_run: bool,
    extensions: Option<Vec<String>>,
    log_callback: Option<LogCallback>,
}

impl SyncEngine {
    /// Create an engine from the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dry_run: false,
            extensions: None,
            log_callback: None,
        }
    }

    /// Plan and report without writing crates, backup, or database
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Override the scanner's audio extension filter
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = Some(extensions.into_iter().map(|e| e.as_ref().to_string()).collect());
        self
    }

    /// Set the sink for user-visible progress lines
    pub fn with_log_callback(mut self, callback: LogCallback) -> Self {
        self.log_callback = Some(callback);
        self
    }

    fn log(&self, message: &str) {
        tracing::info!("{}", message);
        if let Some(ref callback) = self.log_callback {
            callback(message);
        }
    }

    /// Run the full synchronization
    ///
    /// Scan and database-read failures are fatal and leave the disk
    /// untouched. A failed crate write is logged and skipped. A backup
    /// failure aborts before the database rewrite.
    pub fn run(&self) -> Result<SyncSummary> {
        self.log("Starting library sync...");

        // 1. Validate configuration and locate the database
        self.config.validate()?;
        let db_path = self.config.database_path();
        if !db_path.exists() {
            return Err(Error::NotFound(db_path));
        }

        // 2. Scan the music library
        self.log(&format!(
            "Scanning music library at {}...",
            self.config.music_library_path
        ));
        let mut scanner = LibraryScanner::new(&self.config.music_library_path);
        if let Some(ref exts) = self.extensions {
            scanner = scanner.with_extensions(exts);
        }
        let library_map = scanner.scan()?;
        let (num_dirs, num_files) = library_stats(&library_map);
        self.log(&format!(
            "Found {} directories and {} audio files.",
            num_dirs, num_files
        ));

        // 3. Read the database
        self.log(&format!(
            "Reading Serato database at {}...",
            db_path.display()
        ));
        let db = read_database(&db_path, &self.config.music_library_path)?;
        self.log(&format!(
            "Found {} tracks in the database for comparison.",
            db.stripped_paths.len()
        ));
        self.log(&format!(
            "Using prefix from library path: {}",
            db.library_prefix
        ));

        // 4. Diff scanned paths against the database
        let all_tracks: Vec<String> = library_map.values().flatten().cloned().collect();
        let new_tracks = detect_new_tracks(&all_tracks, &db.stripped_paths);
        self.log(&format!("Found {} new tracks.", new_tracks.len()));

        // 5. Full paths of the new tracks, as they will appear in crates
        let affected: HashSet<String> = new_tracks
            .iter()
            .map(|p| build_ptrk(&db.library_prefix, p))
            .collect();

        // 6. Plan one crate per non-root directory
        let plans = build_crate_plans(
            &library_map,
            &db.library_prefix,
            self.config.serato_db_path.as_ref(),
        );

        let mut summary = SyncSummary {
            files_scanned: num_files,
            directories_scanned: num_dirs,
            records_before: db.records.len(),
            new_tracks: new_tracks.len(),
            records_after: db.records.len(),
            dry_run: self.dry_run,
            ..Default::default()
        };

        // 7. Rewrite only the crates that gained a track
        self.log("Writing crate files...");
        for plan in &plans {
            if !plan.track_paths.iter().any(|p| affected.contains(p)) {
                continue;
            }

            if self.dry_run {
                self.log(&format!(
                    "[dry run] Would write crate {} with {} tracks.",
                    plan.crate_path.display(),
                    plan.track_paths.len()
                ));
                continue;
            }

            // Skip the write when the bytes on disk already match
            let payload = build_crate_payload(&plan.track_paths);
            if fs::read(&plan.crate_path).is_ok_and(|existing| existing == payload) {
                continue;
            }

            match write_crate(&plan.crate_path, &plan.track_paths) {
                Ok(()) => {
                    self.log(&format!(
                        "Wrote crate file {} with {} tracks.",
                        plan.crate_path.display(),
                        plan.track_paths.len()
                    ));
                    summary.crates_written += 1;
                    summary.crate_tracks_written += plan.track_paths.len();
                }
                Err(e) => {
                    self.log(&format!(
                        "Error writing crate file {}: {}",
                        plan.crate_path.display(),
                        e
                    ));
                }
            }
        }

        // 8. Back up, then append the new records
        if !new_tracks.is_empty() && !self.dry_run {
            self.log(&format!(
                "Adding {} new tracks to the database...",
                new_tracks.len()
            ));

            let backup_path = backup_database(&db_path)?;
            self.log(&format!(
                "Database backup created at {}",
                backup_path.display()
            ));
            summary.backup_path = Some(backup_path);

            let mut all_records = db.records;
            for rel_path in &new_tracks {
                all_records.push(Record::with_path(build_ptrk(&db.library_prefix, rel_path)));
            }

            match write_database(&db_path, &all_records) {
                Ok(()) => {
                    summary.tracks_added = new_tracks.len();
                    summary.records_after = all_records.len();
                    self.log("Successfully updated database with new tracks.");
                }
                Err(e) => {
                    // The backup stays on disk as the recovery artifact
                    self.log(&format!("Error writing updated database: {}", e));
                }
            }
        }

        // 9. Summary
        for line in summary.report().lines() {
            self.log(line);
        }

        Ok(summary)
    }
}

//! # serato-sync-core
//!
//! Core library for mirroring an on-disk music library into a Serato DJ
//! library.
//!
//! This crate provides the foundational functionality for:
//! - Reading and writing Serato's binary `database V2` master index
//! - Reading and writing crate (playlist) files under `Subcrates/`
//! - Scanning a music folder hierarchy for audio files
//! - Detecting tracks the database does not know about yet
//! - Synchronizing folder structure into crates and appending new tracks
//! - Pruning corrupted and duplicate database records
//!
//! ## Modules
//!
//! - [`backup`] - Timestamped database backups
//! - [`cleanup`] - Database hygiene pass
//! - [`config`] - Configuration loading and saving
//! - [`crates`] - Crate file format
//! - [`database`] - Database V2 format
//! - [`error`] - Error types and Result alias
//! - [`library`] - Library scanning and crate planning
//! - [`sync`] - Synchronization engine
//! - [`tlv`] - The tag–length–value codec both formats share
//!
//! ## Example
//!
//! ```no_run
//! use serato_sync_core::{Config, SyncEngine};
//!
//! let config = Config::load().expect("Failed to load config");
//! let summary = SyncEngine::new(config).run().expect("Sync failed");
//! println!("{}", summary.report());
//! ```

// Module declarations
pub mod backup;
pub mod cleanup;
pub mod config;
pub mod crates;
pub mod database;
pub mod error;
pub mod library;
pub mod sync;
pub mod tlv;
pub mod utils;

// Re-export key types for convenience

// Error types
pub use error::{Error, Result};

// Configuration
pub use config::Config;

// Database V2
pub use database::{
    generate_report, read_database, write_database, Database, Field, Record, DATABASE_FILENAME,
    DATABASE_VERSION,
};

// Crate files
pub use crates::{build_ptrk, crate_path_for_dir, read_crate, write_crate, CRATE_VERSION};

// Library scanning and planning
pub use library::{
    build_crate_plans, detect_new_tracks, library_stats, CratePlan, LibraryMap, LibraryScanner,
    AUDIO_EXTENSIONS,
};

// Sync engine
pub use sync::{LogCallback, SyncEngine, SyncSummary};

// Cleanup
pub use cleanup::{clean_database, clean_records, CleanupOptions, CleanupReport, CleanupStats};

// Backup
pub use backup::backup_database;

//! Crate planning and new-track detection

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::crates::{build_ptrk, crate_path_for_dir};
use crate::utils::clean_path;

use super::LibraryMap;

/// A planned crate write: output path plus the full track paths it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CratePlan {
    /// Where the crate file goes under `Subcrates/`
    pub crate_path: PathBuf,
    /// Prefixed `ptrk` paths, one per track
    pub track_paths: Vec<String>,
}

/// Turn a library map into one crate plan per non-root directory
///
/// Root-level files are not eligible for crate membership; a crate
/// mirrors a directory.
pub fn build_crate_plans(map: &LibraryMap, prefix: &str, serato_root: &Path) -> Vec<CratePlan> {
    map.iter()
        .filter(|(rel_dir, _)| rel_dir.as_str() != ".")
        .map(|(rel_dir, files)| CratePlan {
            crate_path: crate_path_for_dir(serato_root, rel_dir),
            track_paths: files.iter().map(|f| build_ptrk(prefix, f)).collect(),
        })
        .collect()
}

/// Report the scanned paths that are absent from the database
///
/// Membership is tested on the cleaned form; output preserves scan order.
pub fn detect_new_tracks(track_paths: &[String], known_paths: &HashSet<String>) -> Vec<String> {
    track_paths
        .iter()
        .filter(|p| !known_paths.contains(&clean_path(p)))
        .cloned()
        .collect()
}

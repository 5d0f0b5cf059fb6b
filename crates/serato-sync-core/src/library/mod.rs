//! Music library scanning and crate planning

mod planner;
mod scanner;

pub use planner::{build_crate_plans, detect_new_tracks, CratePlan};
pub use scanner::LibraryScanner;

use std::collections::BTreeMap;

/// Audio extensions scanned by default (lowercase, no dot)
pub const AUDIO_EXTENSIONS: [&str; 8] = ["mp3", "m4a", "aac", "aif", "aiff", "wav", "flac", "ogg"];

/// Relative directory → relative audio files directly under it
///
/// Paths are relative to the library root and use forward slashes on
/// every platform. Files at the root itself live under the `"."` key.
/// Each directory owns only its direct files.
pub type LibraryMap = BTreeMap<String, Vec<String>>;

/// Count the directories and files in a scan result
pub fn library_stats(map: &LibraryMap) -> (usize, usize) {
    let num_files = map.values().map(Vec::len).sum();
    (map.len(), num_files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_stats() {
        let mut map = LibraryMap::new();
        map.insert(
            "House".to_string(),
            vec!["House/a.mp3".to_string(), "House/b.mp3".to_string()],
        );
        map.insert("Techno".to_string(), vec!["Techno/c.flac".to_string()]);

        assert_eq!(library_stats(&map), (2, 3));
    }
}

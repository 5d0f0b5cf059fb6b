//! Recursive audio-file walk of the library root

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

use super::{LibraryMap, AUDIO_EXTENSIONS};

/// Scanner for a music library folder
///
/// Walks the root recursively and groups supported audio files by their
/// parent directory. IO errors anywhere in the walk are fatal; a partial
/// scan would silently under-report new tracks.
pub struct LibraryScanner {
    root: PathBuf,
    extensions: HashSet<String>,
}

impl LibraryScanner {
    /// Create a scanner for the given library root with the default
    /// audio extensions
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: AUDIO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the extension filter
    ///
    /// Entries are matched case-insensitively; a leading dot is accepted
    /// and stripped.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Walk the library and build the directory → files map
    pub fn scan(&self) -> Result<LibraryMap> {
        if !self.root.is_dir() {
            return Err(Error::NotFound(self.root.clone()));
        }

        let mut map = LibraryMap::new();

        // follow_links walks through symlinked directories; walkdir
        // detects cycles and surfaces them as errors, which are fatal here
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.is_audio_file(entry.path()) {
                continue;
            }

            let rel_file = relative_slash_path(&self.root, entry.path())?;
            let rel_dir = match rel_file.rsplit_once('/') {
                Some((dir, _)) => dir.to_string(),
                None => ".".to_string(),
            };

            map.entry(rel_dir).or_default().push(rel_file);
        }

        Ok(map)
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

/// Express `path` relative to `root` with forward slashes
fn relative_slash_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(root).map_err(|_| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} is outside the library root", path.display()),
        ))
    })?;

    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_scan_groups_by_directory() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("House/a.mp3"));
        touch(&dir.path().join("House/b.flac"));
        touch(&dir.path().join("Techno/2024/c.wav"));
        touch(&dir.path().join("root.ogg"));

        let map = LibraryScanner::new(dir.path()).scan().unwrap();

        assert_eq!(
            map.get("House").unwrap(),
            &vec!["House/a.mp3".to_string(), "House/b.flac".to_string()]
        );
        assert_eq!(
            map.get("Techno/2024").unwrap(),
            &vec!["Techno/2024/c.wav".to_string()]
        );
        assert_eq!(map.get(".").unwrap(), &vec!["root.ogg".to_string()]);
    }

    #[test]
    fn test_non_audio_files_ignored() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("House/cover.jpg"));
        touch(&dir.path().join("House/notes.txt"));
        touch(&dir.path().join("House/a.mp3"));

        let map = LibraryScanner::new(dir.path()).scan().unwrap();
        assert_eq!(map.get("House").unwrap(), &vec!["House/a.mp3".to_string()]);
    }

    #[test]
    fn test_extension_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("House/a.MP3"));
        touch(&dir.path().join("House/b.FlAc"));

        let map = LibraryScanner::new(dir.path()).scan().unwrap();
        assert_eq!(map.get("House").unwrap().len(), 2);
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.mp3"));
        touch(&dir.path().join("b.opus"));

        let map = LibraryScanner::new(dir.path())
            .with_extensions([".opus"])
            .scan()
            .unwrap();
        assert_eq!(map.get(".").unwrap(), &vec!["b.opus".to_string()]);
    }

    #[test]
    fn test_empty_library() {
        let dir = TempDir::new().unwrap();
        let map = LibraryScanner::new(dir.path()).scan().unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = LibraryScanner::new(dir.path().join("missing"))
            .scan()
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_deterministic_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("House/b.mp3"));
        touch(&dir.path().join("House/a.mp3"));

        let map = LibraryScanner::new(dir.path()).scan().unwrap();
        assert_eq!(
            map.get("House").unwrap(),
            &vec!["House/a.mp3".to_string(), "House/b.mp3".to_string()]
        );
    }
}

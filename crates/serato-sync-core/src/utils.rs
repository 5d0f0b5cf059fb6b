//! Utility functions shared across modules.

/// Normalize a file path for cross-database comparison.
///
/// Serato databases written on different platforms mix backslashes,
/// forward slashes, and drive letters for the same track. This reduces a
/// path to a canonical comparable form:
///
/// 1. every backslash becomes a forward slash,
/// 2. a leading drive letter (`C:`) is dropped,
/// 3. leading and trailing slashes are trimmed.
///
/// The result is only ever used for comparison; files keep whatever
/// native form Serato wrote.
///
/// # Examples
///
/// ```
/// use serato_sync_core::utils::clean_path;
///
/// assert_eq!(clean_path("C:\\Music\\House\\a.mp3"), "Music/House/a.mp3");
/// assert_eq!(clean_path("/Music/House/a.mp3"), "Music/House/a.mp3");
/// assert_eq!(clean_path("Music/House/a.mp3"), "Music/House/a.mp3");
/// ```
pub fn clean_path(path: &str) -> String {
    let mut p = path.replace('\\', "/");
    if p.as_bytes().get(1) == Some(&b':') {
        p = p[2..].to_string();
    }
    p.trim_matches('/').to_string()
}

//! Crate (playlist) files under `_Serato_/Subcrates/`
//!
//! A crate file is a flat chunk stream: one leading `vrsn` chunk with the
//! crate version string, then one `otrk` chunk per track whose payload is
//! a single nested `ptrk` chunk carrying the forward-slash track path.
//!
//! The crate filename encodes directory nesting: the path separator is
//! replaced with the two-character delimiter `%%`, so directory
//! `House/2024` becomes `Subcrates/House%%2024.crate`.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::tlv::{self, Tag};

/// Version string carried by the leading `vrsn` chunk of a crate file
pub const CRATE_VERSION: &str = "1.0/Serato ScratchLive Crate";

/// Filename separator standing in for directory nesting
pub const CRATE_NAME_SEPARATOR: &str = "%%";

const VRSN: Tag = *b"vrsn";
const OTRK: Tag = *b"otrk";
const PTRK: Tag = *b"ptrk";

/// Map a library-relative directory to its crate file path
///
/// `rel_dir` uses forward slashes (the scanner's relative form).
pub fn crate_path_for_dir(serato_root: &Path, rel_dir: &str) -> PathBuf {
    let name = format!("{}.crate", rel_dir.replace('/', CRATE_NAME_SEPARATOR));
    serato_root.join("Subcrates").join(name)
}

/// Join the library prefix and a relative file into a `ptrk` path
///
/// With an empty prefix the path starts at the first file segment.
pub fn build_ptrk(prefix: &str, rel_file: &str) -> String {
    if prefix.is_empty() {
        rel_file.to_string()
    } else {
        format!("{}/{}", prefix, rel_file)
    }
}

/// Encode a full crate file for the given track paths
pub fn build_crate_payload(track_paths: &[String]) -> Vec<u8> {
    let mut out = tlv::make_chunk(VRSN, &tlv::encode_utf16be(CRATE_VERSION));
    for path in track_paths {
        let ptrk = tlv::make_chunk(PTRK, &tlv::encode_utf16be(path));
        out.extend(tlv::make_chunk(OTRK, &ptrk));
    }
    out
}

/// Write a crate file, creating parent directories as needed
pub fn write_crate(crate_path: &Path, track_paths: &[String]) -> Result<()> {
    if let Some(parent) = crate_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(crate_path, build_crate_payload(track_paths))?;
    Ok(())
}

/// Read the track paths from an existing crate file
///
/// A nonexistent crate reads as empty: it is simply a crate that has not
/// been written yet. A `ptrk` that fails to decode is skipped so one
/// corrupt entry cannot hide the rest of the crate.
pub fn read_crate(crate_path: &Path) -> Result<Vec<String>> {
    if !crate_path.exists() {
        return Ok(Vec::new());
    }

    let file = fs::File::open(crate_path)?;
    let mut reader = BufReader::new(file);
    let chunks = tlv::read_chunks(&mut reader)?;

    let mut track_paths = Vec::new();
    for chunk in chunks {
        if chunk.tag != OTRK {
            continue;
        }
        for (tag, value) in tlv::nested_chunks(&chunk.value) {
            if tag != PTRK {
                continue;
            }
            match tlv::decode_utf16be(value) {
                Ok(path) => track_paths.push(path),
                Err(e) => {
                    tracing::warn!(
                        "Skipping unreadable track entry in {}: {}",
                        crate_path.display(),
                        e
                    );
                }
            }
        }
    }

    Ok(track_paths)
}

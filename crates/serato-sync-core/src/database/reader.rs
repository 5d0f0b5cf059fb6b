//! Parser for `database V2` files

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::tlv;
use crate::utils::clean_path;

use super::record::{is_text_tag, Field, Record};
use super::OTRK;

/// Parsed database contents plus the comparison set used for diffing
#[derive(Debug, Clone)]
pub struct Database {
    /// Track records in file order
    pub records: Vec<Record>,
    /// Cleaned `pfil` paths under the library prefix, prefix stripped
    pub stripped_paths: HashSet<String>,
    /// Normalized library root used to strip and rebuild paths
    pub library_prefix: String,
}

/// Read all track records from a `database V2` file
///
/// `music_library_path` is the configured library root; its cleaned form
/// becomes the library prefix. Database paths outside the prefix are left
/// out of the comparison set: tracks on other drives cannot be matched
/// against the local library and must not be rewritten.
///
/// A record whose text leaves fail to decode is skipped, not fatal: one
/// corrupt track must not obliterate the database.
pub fn read_database(db_path: &Path, music_library_path: &str) -> Result<Database> {
    if !db_path.exists() {
        return Err(Error::NotFound(db_path.to_path_buf()));
    }

    let file = File::open(db_path)?;
    let mut reader = BufReader::new(file);
    let chunks = tlv::read_chunks(&mut reader)?;

    let mut records = Vec::new();
    let mut cleaned_paths = HashSet::new();

    for chunk in chunks {
        if chunk.tag != OTRK {
            continue;
        }

        match parse_record(&chunk.value) {
            Ok(record) => {
                if let Some(pfil) = record.file_path() {
                    cleaned_paths.insert(clean_path(pfil));
                }
                records.push(record);
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable track record: {}", e);
            }
        }
    }

    let library_prefix = clean_path(music_library_path);
    let stripped_paths = strip_library_prefix(&cleaned_paths, &library_prefix);

    Ok(Database {
        records,
        stripped_paths,
        library_prefix,
    })
}

/// Parse one `otrk` payload into a record
fn parse_record(payload: &[u8]) -> Result<Record> {
    let mut record = Record::new();

    for (tag, value) in tlv::nested_chunks(payload) {
        if is_text_tag(tag) {
            let text = tlv::decode_utf16be(trim_trailing_nul_pairs(value))?;
            record.push(tag, Field::Text(text));
        } else {
            record.push(tag, Field::Raw(value.to_vec()));
        }
    }

    Ok(record)
}

/// Strip trailing NUL code units (byte pairs) from a text payload
///
/// Real databases pad some text leaves with UTF-16 NULs. Stripping whole
/// pairs keeps a legitimate final unit like U+0100 (`0x01 0x00`) intact.
fn trim_trailing_nul_pairs(mut bytes: &[u8]) -> &[u8] {
    while bytes.len() >= 2 && bytes[bytes.len() - 2..] == [0x00, 0x00] {
        bytes = &bytes[..bytes.len() - 2];
    }
    bytes
}

/// Reduce cleaned database paths to their library-relative form
fn strip_library_prefix(paths: &HashSet<String>, prefix: &str) -> HashSet<String> {
    if prefix.is_empty() {
        return paths.clone();
    }

    let prefix_slash = format!("{}/", prefix);
    paths
        .iter()
        .filter_map(|p| p.strip_prefix(&prefix_slash))
        .map(str::to_string)
        .collect()
}

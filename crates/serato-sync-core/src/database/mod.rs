//! Reader/writer for Serato's master track index ("Database V2")
//!
//! The file is a flat chunk stream: one leading `vrsn` chunk carrying the
//! version string, then one `otrk` chunk per track. Each `otrk` payload is
//! itself a chunk stream of typed leaves: a fixed allow-list of tags is
//! UTF-16BE text, everything else is opaque bytes preserved verbatim.

mod reader;
mod record;
mod writer;

pub use reader::{read_database, Database};
pub use record::{is_text_tag, Field, Record, TEXT_TAGS};
pub use writer::write_database;

use std::path::Path;

use crate::error::Result;
use crate::tlv::Tag;

/// Version string carried by the leading `vrsn` chunk
pub const DATABASE_VERSION: &str = "2.0/Serato Scratch LIVE Database";

/// Conventional database file name under the Serato root
pub const DATABASE_FILENAME: &str = "database V2";

pub(crate) const VRSN: Tag = *b"vrsn";
pub(crate) const OTRK: Tag = *b"otrk";

/// Build the short human-readable report for the "report" operation
pub fn generate_report(db_path: &Path) -> Result<String> {
    let db = read_database(db_path, "")?;
    Ok(format!(
        "Database Report:\n- Total tracks: {}",
        db.records.len()
    ))
}

//! Writer for `database V2` files
//!
//! The rewrite targets a sibling temp file and renames onto the database
//! after a successful close. A failure or interruption anywhere in the
//! write leaves the original file untouched and removes the temp.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::tlv;

use super::record::{Field, Record};
use super::{DATABASE_VERSION, OTRK, VRSN};

/// Rewrite the database with the given records, in order
///
/// Emits the `vrsn` chunk, then one `otrk` chunk per record with fields in
/// their stored order: text fields UTF-16BE-encoded, raw fields verbatim.
pub fn write_database(db_path: &Path, records: &[Record]) -> Result<()> {
    let dir = match db_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;

    tlv::write_chunk(&mut tmp, VRSN, &tlv::encode_utf16be(DATABASE_VERSION))?;

    for record in records {
        let mut inner = Vec::new();
        for (tag, field) in record.fields() {
            match field {
                Field::Text(s) => {
                    inner.extend(tlv::make_chunk(*tag, &tlv::encode_utf16be(s)));
                }
                Field::Raw(bytes) => {
                    inner.extend(tlv::make_chunk(*tag, bytes));
                }
            }
        }
        tlv::write_chunk(&mut tmp, OTRK, &inner)?;
    }

    tmp.flush()?;
    tmp.persist(db_path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::{read_database, DATABASE_VERSION, VRSN};
    use super::*;
    use crate::tlv::{decode_utf16be, read_chunks};
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_version_chunk_comes_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database V2");
        write_database(&path, &[Record::with_path("Music/a.mp3")]).unwrap();

        let bytes = fs::read(&path).unwrap();
        let chunks = read_chunks(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(chunks[0].tag, VRSN);
        assert_eq!(decode_utf16be(&chunks[0].value).unwrap(), DATABASE_VERSION);
        assert_eq!(chunks[1].tag, OTRK);
    }

    #[test]
    fn test_read_write_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database V2");

        let mut record = Record::with_path("Music/House/a.flac");
        record.push(*b"ttit", Field::Text("Deep Cut".to_string()));
        record.push(*b"uadd", Field::Raw(vec![0x68, 0x3B, 0x11, 0x00]));
        let records = vec![record, Record::with_path("Music/b.mp3")];

        write_database(&path, &records).unwrap();
        let first = read_database(&path, "").unwrap();
        write_database(&path, &first.records).unwrap();
        let second = read_database(&path, "").unwrap();

        assert_eq!(first.records, second.records);
        assert_eq!(second.records, records);
    }

    #[test]
    fn test_opaque_leaf_preserved_bit_for_bit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database V2");

        let mut record = Record::with_path("Music/a.mp3");
        record.push(*b"zzzz", Field::Raw(vec![0xDE, 0xAD, 0xBE, 0xEF]));
        write_database(&path, &[record]).unwrap();

        let db = read_database(&path, "").unwrap();
        write_database(&path, &db.records).unwrap();
        let again = read_database(&path, "").unwrap();

        assert_eq!(
            again.records[0].get(*b"zzzz"),
            Some(&Field::Raw(vec![0xDE, 0xAD, 0xBE, 0xEF]))
        );
    }

    #[test]
    fn test_rewrite_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database V2");

        write_database(&path, &[Record::with_path("Music/a.mp3")]).unwrap();
        write_database(&path, &[]).unwrap();

        let db = read_database(&path, "").unwrap();
        assert!(db.records.is_empty());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database V2");
        write_database(&path, &[Record::with_path("Music/a.mp3")]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("database V2")]);
    }
}

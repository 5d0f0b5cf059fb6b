//! Track record model for Database V2

use crate::tlv::Tag;

/// Nested tags within an `otrk` whose payload is UTF-16BE text
///
/// Every other tag is opaque bytes and must round-trip bit-for-bit; a
/// reader that decoded unknown leaves as text would corrupt them on
/// rewrite.
pub const TEXT_TAGS: [Tag; 15] = [
    *b"pfil", *b"ttyp", *b"tadd", *b"talb", *b"tart", *b"ttit", *b"tgen", *b"tkey", *b"tcom",
    *b"tgrp", *b"tbit", *b"tsmp", *b"tbpm", *b"tlen", *b"tmod",
];

/// Check whether a nested tag carries UTF-16BE text
pub fn is_text_tag(tag: Tag) -> bool {
    TEXT_TAGS.contains(&tag)
}

/// A single field value within a track record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Decoded UTF-16BE text (trailing NUL pairs stripped)
    Text(String),
    /// Opaque payload preserved verbatim
    Raw(Vec<u8>),
}

impl Field {
    /// The text value, if this is a text field
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            Field::Raw(_) => None,
        }
    }
}

/// One track in Database V2
///
/// Fields keep the order they were read in; the writer emits them in the
/// same order. Serato reads by tag, but users' libraries have survived on
/// read-order emission and nothing here depends on position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(Tag, Field)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record carrying only a file path
    ///
    /// This is the shape of a freshly inserted track: Serato fills in the
    /// remaining fields when it analyzes the file.
    pub fn with_path(path: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.push(*b"pfil", Field::Text(path.into()));
        record
    }

    /// Append a field, keeping insertion order
    pub fn push(&mut self, tag: Tag, field: Field) {
        self.fields.push((tag, field));
    }

    /// Look up a field by tag (first occurrence)
    pub fn get(&self, tag: Tag) -> Option<&Field> {
        self.fields.iter().find(|(t, _)| *t == tag).map(|(_, f)| f)
    }

    /// Look up a text field by tag
    pub fn text(&self, tag: Tag) -> Option<&str> {
        self.get(tag).and_then(Field::as_text)
    }

    /// The track's file path (`pfil`), if present and textual
    pub fn file_path(&self) -> Option<&str> {
        self.text(*b"pfil")
    }

    /// All fields in stored order
    pub fn fields(&self) -> &[(Tag, Field)] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

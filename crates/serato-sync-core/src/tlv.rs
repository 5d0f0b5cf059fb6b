//! Tag–length–value codec shared by the Serato file formats
//!
//! Both `database V2` and crate files are flat streams of chunks:
//! - 4 ASCII tag bytes
//! - u32 payload length (big-endian, excludes the 8-byte header)
//! - exactly `length` payload bytes
//!
//! Chunks are neither aligned nor separated. A payload may itself be a
//! concatenation of child chunks. Designated leaf tags carry UTF-16BE text
//! with no BOM and no terminator; everything else is opaque bytes.
//!
//! The top-level reader is strict: end-of-stream between chunks is a clean
//! stop, end-of-stream inside a header or payload is [`Error::Truncated`].
//! The nested iterator is lenient: record payloads in real libraries carry
//! trailing pad bytes or unknown trailers, so it stops silently at the
//! first incomplete header.

use std::io::{Read, Write};

use crate::error::{Error, Result};

/// A 4-byte ASCII chunk identifier (e.g. `*b"otrk"`)
pub type Tag = [u8; 4];

/// A decoded TLV chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 4-byte chunk identifier
    pub tag: Tag,
    /// Raw payload, exactly as long as the declared length
    pub value: Vec<u8>,
}

impl Chunk {
    /// Tag rendered as a string for log messages
    pub fn tag_display(&self) -> String {
        tag_display(self.tag)
    }
}

/// Render a tag for log messages (lossy, tags are ASCII in practice)
pub fn tag_display(tag: Tag) -> String {
    String::from_utf8_lossy(&tag).into_owned()
}

/// Encode a single chunk as bytes: tag, big-endian length, payload
pub fn make_chunk(tag: Tag, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(&tag);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// Write a single chunk to a writer
pub fn write_chunk<W: Write>(writer: &mut W, tag: Tag, payload: &[u8]) -> Result<()> {
    writer.write_all(&tag)?;
    writer.write_all(&(payload.len() as u32).to_be_bytes())?;
    writer.write_all(payload)?;
    Ok(())
}

/// Encode a string as UTF-16BE with no BOM and no terminator
pub fn encode_utf16be(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect()
}

/// Decode a UTF-16BE byte slice to a string
///
/// The byte length must be even and the code units must form valid UTF-16
/// (no unpaired surrogates); anything else is [`Error::MalformedString`].
pub fn decode_utf16be(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::MalformedString(format!(
            "odd byte length {}",
            bytes.len()
        )));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&units)
        .map_err(|_| Error::MalformedString("invalid surrogate sequence".to_string()))
}

/// Read all top-level chunks from a reader (strict)
///
/// EOF between chunks ends the stream successfully. EOF inside a header or
/// payload is [`Error::Truncated`]; top-level files are authoritative and
/// a cut-off file must not be silently accepted.
pub fn read_chunks<R: Read>(reader: &mut R) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::new();

    while let Some((tag, size)) = read_header(reader)? {
        let mut value = vec![0u8; size as usize];
        reader.read_exact(&mut value).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::Truncated {
                    context: format!(
                        "payload for tag {} cut off (expected {} bytes)",
                        tag_display(tag),
                        size
                    ),
                }
            } else {
                Error::Io(e)
            }
        })?;
        chunks.push(Chunk { tag, value });
    }

    Ok(chunks)
}

/// Read an 8-byte chunk header, distinguishing clean EOF from a torn one
fn read_header<R: Read>(reader: &mut R) -> Result<Option<(Tag, u32)>> {
    let mut header = [0u8; 8];
    let mut filled = 0;

    while filled < header.len() {
        let n = reader.read(&mut header[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(Error::Truncated {
                context: format!("chunk header cut off after {} of 8 bytes", filled),
            });
        }
        filled += n;
    }

    let tag = [header[0], header[1], header[2], header[3]];
    let size = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
    Ok(Some((tag, size)))
}

/// Iterate over nested chunks inside an in-memory payload (lenient)
///
/// Stops at the first incomplete header or at a declared length that would
/// overrun the buffer, tolerating the trailing-pad patterns observed in
/// real crate files.
pub fn nested_chunks(buf: &[u8]) -> NestedChunks<'_> {
    NestedChunks { buf, pos: 0 }
}

/// Iterator returned by [`nested_chunks`]
pub struct NestedChunks<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for NestedChunks<'a> {
    type Item = (Tag, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos + 8 > self.buf.len() {
            return None;
        }

        let header = &self.buf[self.pos..self.pos + 8];
        let tag = [header[0], header[1], header[2], header[3]];
        let size = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;

        let start = self.pos + 8;
        let end = start.checked_add(size)?;
        if end > self.buf.len() {
            return None;
        }

        self.pos = end;
        Some((tag, &self.buf[start..end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_chunk_roundtrip() {
        let payload = b"hello world".to_vec();
        let bytes = make_chunk(*b"test", &payload);

        let mut cursor = Cursor::new(bytes);
        let chunks = read_chunks(&mut cursor).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tag, *b"test");
        assert_eq!(chunks[0].value, payload);
    }

    #[test]
    fn test_empty_stream_is_ok() {
        let mut cursor = Cursor::new(Vec::new());
        let chunks = read_chunks(&mut cursor).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_multiple_chunks() {
        let mut data = make_chunk(*b"aaaa", b"1");
        data.extend(make_chunk(*b"bbbb", b"22"));
        data.extend(make_chunk(*b"cccc", b""));

        let chunks = read_chunks(&mut Cursor::new(data)).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].value, b"22");
        assert!(chunks[2].value.is_empty());
    }

    #[test]
    fn test_truncated_header() {
        // 5 of 8 header bytes
        let data = vec![b'o', b't', b'r', b'k', 0x00];
        let err = read_chunks(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = make_chunk(*b"otrk", b"full payload");
        data.truncate(data.len() - 3);

        let err = read_chunks(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::Truncated { .. }));
    }

    #[test]
    fn test_utf16be_roundtrip_ascii() {
        let s = "Music/House/track.flac";
        assert_eq!(decode_utf16be(&encode_utf16be(s)).unwrap(), s);
    }

    #[test]
    fn test_utf16be_roundtrip_non_bmp() {
        // Surrogate pairs survive the round trip
        let s = "Dvořák — 🎵 mix";
        assert_eq!(decode_utf16be(&encode_utf16be(s)).unwrap(), s);
    }

    #[test]
    fn test_utf16be_no_bom() {
        let bytes = encode_utf16be("A");
        assert_eq!(bytes, vec![0x00, 0x41]);
    }

    #[test]
    fn test_decode_odd_length_fails() {
        let err = decode_utf16be(&[0x00, 0x41, 0x00]).unwrap_err();
        assert!(matches!(err, Error::MalformedString(_)));
    }

    #[test]
    fn test_decode_unpaired_surrogate_fails() {
        // Lone high surrogate 0xD800
        let err = decode_utf16be(&[0xD8, 0x00]).unwrap_err();
        assert!(matches!(err, Error::MalformedString(_)));
    }

    #[test]
    fn test_nested_iteration() {
        let mut buf = make_chunk(*b"ptrk", b"abc");
        buf.extend(make_chunk(*b"xxxx", b"defg"));

        let collected: Vec<_> = nested_chunks(&buf).collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].0, *b"ptrk");
        assert_eq!(collected[0].1, b"abc");
        assert_eq!(collected[1].1, b"defg");
    }

    #[test]
    fn test_nested_stops_at_trailing_pad() {
        let mut buf = make_chunk(*b"ptrk", b"abc");
        buf.extend_from_slice(&[0x00, 0x00, 0x00]); // pad shorter than a header

        let collected: Vec<_> = nested_chunks(&buf).collect();
        assert_eq!(collected.len(), 1);
    }

    #[test]
    fn test_nested_stops_at_overrunning_length() {
        let mut buf = make_chunk(*b"ptrk", b"abc");
        // Header declaring more bytes than remain in the buffer
        buf.extend_from_slice(b"xxxx");
        buf.extend_from_slice(&100u32.to_be_bytes());
        buf.extend_from_slice(b"short");

        let collected: Vec<_> = nested_chunks(&buf).collect();
        assert_eq!(collected.len(), 1);
    }
}

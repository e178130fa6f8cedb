//! IFF chunk header parsing
//!
//! Every record in a container starts with a fixed 76-byte header:
//!
//! ```text
//! Offset | Size | Field | Description
//! -------|------|-------|------------------------------------------------
//! 0x00   |  4   | tag   | Kind tag, padded with '#' or NUL ("SPR#", "STR#")
//! 0x04   |  4   | size  | Record size in bytes INCLUDING this header
//! 0x08   |  2   | id    | Record id, unique per kind
//! 0x0A   |  2   | flags | Unused by the decoders
//! 0x0C   | 64   | label | NUL-padded display label
//! ```
//!
//! Header integers are big-endian. The payload that follows is `size - 76`
//! bytes long and is handed to the typed decoder untouched; decoders choose
//! their own byte order through [`ByteCursor`].

use std::io::Cursor;

use binrw::BinRead;

use crate::chunk_id::{ChunkKind, trim_tag};
use crate::error::{IffError, Result};
use crate::reader::ByteCursor;

/// Size of a chunk header on disk
pub const CHUNK_HEADER_SIZE: usize = 76;

/// Fixed 76-byte chunk header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead)]
#[br(big)]
pub struct ChunkHeader {
    /// Raw tag bytes, still padded
    pub tag: [u8; 4],

    /// Size of the whole record, header included
    pub size: u32,

    /// Record id
    pub id: u16,

    /// Unused flags word
    pub flags: u16,

    /// NUL-padded label
    pub label: [u8; 64],
}

impl ChunkHeader {
    /// Tag with `#`/NUL padding removed
    pub fn trimmed_tag(&self) -> String {
        trim_tag(&self.tag)
    }

    /// Label up to its first NUL
    pub fn label(&self) -> String {
        let end = self
            .label
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.label.len());
        String::from_utf8_lossy(&self.label[..end]).into_owned()
    }

    /// Length of the payload following the header
    pub fn payload_len(&self) -> usize {
        (self.size as usize).saturating_sub(CHUNK_HEADER_SIZE)
    }
}

/// A header together with the payload bytes it describes.
///
/// The payload is only borrowed: a typed decoder copies what it needs and
/// the raw record is dropped as soon as decoding finishes.
#[derive(Debug, Clone, Copy)]
pub struct RawChunk<'a> {
    /// Parsed header
    pub header: ChunkHeader,
    /// Kind resolved from the header tag
    pub kind: ChunkKind,
    /// Offset of the header within the container
    pub offset: usize,
    /// Payload bytes (`header.size - 76` of them)
    pub payload: &'a [u8],
}

impl<'a> RawChunk<'a> {
    /// Record id from the header
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Little-endian cursor over the payload
    pub fn cursor(&self) -> ByteCursor<'a> {
        ByteCursor::little(self.payload)
    }

    /// Offset just past this record
    pub fn end(&self) -> usize {
        self.offset + CHUNK_HEADER_SIZE + self.payload.len()
    }
}

/// Decode the header at `offset` and slice its payload out of `data`.
///
/// An unrecognised tag is fatal ([`IffError::UnknownChunkType`]); a size
/// field pointing past the end of `data` is [`IffError::Truncated`].
pub fn read_chunk(data: &[u8], offset: usize) -> Result<RawChunk<'_>> {
    let available = data.len().saturating_sub(offset);
    if available < CHUNK_HEADER_SIZE {
        return Err(IffError::Truncated {
            offset,
            needed: CHUNK_HEADER_SIZE,
            available,
        });
    }

    let header = ChunkHeader::read(&mut Cursor::new(&data[offset..offset + CHUNK_HEADER_SIZE]))
        .map_err(|_| IffError::Truncated {
            offset,
            needed: CHUNK_HEADER_SIZE,
            available,
        })?;

    let tag = header.trimmed_tag();
    let kind = ChunkKind::from_tag(&tag).ok_or_else(|| IffError::UnknownChunkType {
        tag: tag.clone(),
        offset: offset as u64,
    })?;

    if (header.size as usize) < CHUNK_HEADER_SIZE {
        return Err(IffError::invalid_container(format!(
            "{kind} chunk {} at offset {offset} declares size {} smaller than its header",
            header.id, header.size
        )));
    }

    let start = offset + CHUNK_HEADER_SIZE;
    let len = header.payload_len();
    if len > data.len() - start {
        return Err(IffError::Truncated {
            offset: start,
            needed: len,
            available: data.len() - start,
        });
    }

    Ok(RawChunk {
        header,
        kind,
        offset,
        payload: &data[start..start + len],
    })
}

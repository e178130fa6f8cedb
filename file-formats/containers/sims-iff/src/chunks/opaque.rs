//! Records kept as raw bytes: BHAV plus TTAB, TPRP, SLOT, XXXX and rsmp

use crate::chunk_id::ChunkKind;
use crate::error::Result;
use crate::reader::ByteCursor;

/// BHAV behavior script. Only the leading signature word is read; the
/// instruction stream is kept untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Behavior {
    /// Leading u16, 0 for an empty payload
    pub signature: u16,
    /// Whole payload, signature included
    pub data: Vec<u8>,
}

impl Behavior {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let data = cursor.read_to_end();
        let signature = match data {
            [lo, hi, ..] => u16::from_le_bytes([*lo, *hi]),
            _ => 0,
        };
        Ok(Self {
            signature,
            data: data.to_vec(),
        })
    }
}

/// A record of a known kind whose payload is not interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpaqueRecord {
    pub kind: ChunkKind,
    pub data: Vec<u8>,
}

impl OpaqueRecord {
    pub(crate) fn decode(kind: ChunkKind, cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            kind,
            data: cursor.read_to_end().to_vec(),
        })
    }
}

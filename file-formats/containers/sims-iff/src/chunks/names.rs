//! FWAV and GLOB - records that only carry a name

use crate::chunk_id::ChunkKind;
use crate::error::Result;
use crate::reader::ByteCursor;

/// A sound event name (FWAV) or semi-global file name (GLOB)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NameReference {
    pub kind: ChunkKind,
    pub name: String,
}

impl NameReference {
    pub(crate) fn decode(kind: ChunkKind, cursor: &mut ByteCursor<'_>) -> Result<Self> {
        // GLOB names are length-prefixed in newer files and NUL-terminated in
        // older ones; a leading byte equal to the rest of the payload decides.
        let prefixed = kind == ChunkKind::Glob
            && cursor.remaining() > 0
            && cursor.data()[cursor.position()] as usize == cursor.remaining() - 1;

        let name = if prefixed {
            cursor.read_pascal_string()?
        } else {
            cursor.read_null_terminated_string()?
        };

        Ok(Self { kind, name })
    }
}

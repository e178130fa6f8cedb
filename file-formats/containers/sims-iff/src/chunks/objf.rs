//! OBJf - object function table
//!
//! Maps each engine entry point (init, main, cleanup, ...) to a pair of
//! behavior ids: a guard that decides availability and the action itself.

use crate::error::Result;
use crate::reader::ByteCursor;

/// Guard and action behavior ids for one entry point; 0 means unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionEntry {
    pub condition_id: u16,
    pub action_id: u16,
}

/// OBJf record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionTable {
    pub version: u32,
    pub entries: Vec<FunctionEntry>,
}

impl FunctionTable {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        cursor.skip(4)?;
        let version = cursor.read_u32()?;
        cursor.skip(4)?; // "fJBO"
        let count = cursor.read_u32()?;

        let mut entries = Vec::new();
        for _ in 0..count {
            entries.push(FunctionEntry {
                condition_id: cursor.read_u16()?,
                action_id: cursor.read_u16()?,
            });
        }

        Ok(Self { version, entries })
    }

    /// Entry for function slot `index`
    pub fn get(&self, index: usize) -> Option<FunctionEntry> {
        self.entries.get(index).copied()
    }
}

//! FCNS - simulator tuning constants
//!
//! ```text
//! u32 zero | u32 version | 4-byte magic | u32 count
//! count x (name, f32 value, description)
//! ```
//!
//! Version 2 stores its strings with a variable-length prefix; earlier
//! versions use NUL-terminated strings.

use crate::error::Result;
use crate::reader::ByteCursor;

/// One named tuning value
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulatorConstant {
    pub name: String,
    pub value: f32,
    pub description: String,
}

/// FCNS record
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulatorConstants {
    /// Format version
    pub version: u32,
    /// Constants in stored order
    pub entries: Vec<SimulatorConstant>,
}

impl SimulatorConstants {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        cursor.skip(4)?;
        let version = cursor.read_u32()?;
        cursor.skip(4)?;
        let count = cursor.read_u32()?;

        let read_string = |c: &mut ByteCursor<'_>| {
            if version == 2 {
                c.read_var_len_string()
            } else {
                c.read_null_terminated_string()
            }
        };

        let mut entries = Vec::new();
        for _ in 0..count {
            let name = read_string(cursor)?;
            let value = cursor.read_f32()?;
            let description = read_string(cursor)?;
            entries.push(SimulatorConstant {
                name,
                value,
                description,
            });
        }

        Ok(Self { version, entries })
    }

    /// Value of the first constant called `name`
    pub fn value(&self, name: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value)
    }
}

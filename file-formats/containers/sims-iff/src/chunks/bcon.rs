//! BCON - behavior constants

use crate::error::Result;
use crate::reader::ByteCursor;

/// Table of signed constants referenced by behavior scripts
///
/// ```text
/// u8 count | u8 flags | count x i16
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constants {
    /// Flags byte, not interpreted
    pub flags: u8,
    /// Constant values in index order
    pub values: Vec<i16>,
}

impl Constants {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let count = cursor.read_u8()?;
        let flags = cursor.read_u8()?;
        let values = (0..count)
            .map(|_| cursor.read_i16())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { flags, values })
    }

    /// Constant at `index`
    pub fn get(&self, index: usize) -> Option<i16> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_constants() {
        let mut data = vec![3, 0x80];
        for v in [10i16, -2, 300] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let bcon = Constants::decode(&mut ByteCursor::little(&data)).unwrap();
        assert_eq!(bcon.flags, 0x80);
        assert_eq!(bcon.values, vec![10, -2, 300]);
        assert_eq!(bcon.get(1), Some(-2));
        assert_eq!(bcon.get(3), None);
    }

    #[test]
    fn short_table_fails() {
        let data = [2, 0, 1, 0];
        assert!(Constants::decode(&mut ByteCursor::little(&data)).is_err());
    }
}

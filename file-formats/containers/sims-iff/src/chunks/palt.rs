//! PALT - indexed color table

use image::{Rgb, Rgba};

use crate::error::Result;
use crate::reader::ByteCursor;

/// Maximum number of palette entries addressable by an 8-bit index
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// PALT record: up to 256 RGB colors indexed by sprite pixel bytes
///
/// ```text
/// u32 version | u32 count | 8 reserved bytes | count x (r, g, b)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    /// Format version as stored
    pub version: u32,
    entries: Vec<Rgb<u8>>,
}

impl Palette {
    /// Build a palette from colors, keeping at most 256 of them
    pub fn new(mut entries: Vec<Rgb<u8>>) -> Self {
        entries.truncate(MAX_PALETTE_ENTRIES);
        Self {
            version: 1,
            entries,
        }
    }

    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let version = cursor.read_u32()?;
        let declared = cursor.read_u32()? as usize;
        cursor.skip(8)?;

        let count = declared.min(MAX_PALETTE_ENTRIES);
        if declared > count {
            log::warn!("PALT declares {declared} colors, keeping the first {count}");
        }

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let rgb = cursor.read_bytes(3)?;
            entries.push(Rgb([rgb[0], rgb[1], rgb[2]]));
        }

        Ok(Self { version, entries })
    }

    /// Number of colors stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the palette holds no colors
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Color at `index`, if the palette defines one
    pub fn get(&self, index: u8) -> Option<Rgb<u8>> {
        self.entries.get(index as usize).copied()
    }

    /// Color at `index`; indices past the stored colors resolve to black
    pub fn color(&self, index: u8) -> Rgb<u8> {
        self.get(index).unwrap_or(Rgb([0, 0, 0]))
    }

    /// Color at `index` with the given alpha
    pub fn rgba(&self, index: u8, alpha: u8) -> Rgba<u8> {
        let Rgb([r, g, b]) = self.color(index);
        Rgba([r, g, b, alpha])
    }

    /// All stored colors
    pub fn entries(&self) -> &[Rgb<u8>] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decode_palette() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&[255, 0, 0, 0, 0, 255]);

        let palette = Palette::decode(&mut ByteCursor::little(&data)).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.color(0), Rgb([255, 0, 0]));
        assert_eq!(palette.color(1), Rgb([0, 0, 255]));
        assert_eq!(palette.get(2), None);
        assert_eq!(palette.color(2), Rgb([0, 0, 0]));
    }

    #[test]
    fn truncated_entries_fail() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&[1, 2, 3]);
        assert!(Palette::decode(&mut ByteCursor::little(&data)).is_err());
    }

    proptest! {
        #[test]
        fn resolves_every_stored_triple(colors in proptest::collection::vec(any::<[u8; 3]>(), 0..=256)) {
            let palette = Palette::new(colors.iter().map(|c| Rgb(*c)).collect());
            for (i, c) in colors.iter().enumerate() {
                prop_assert_eq!(palette.get(i as u8), Some(Rgb(*c)));
            }
        }
    }
}

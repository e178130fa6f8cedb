//! BMP_ and FBMP - embedded Windows bitmaps

use image::{DynamicImage, ImageFormat};

use crate::chunk_id::ChunkKind;
use crate::error::Result;
use crate::reader::ByteCursor;

/// Raw bitmap payload, kept as stored
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bitmap {
    pub kind: ChunkKind,
    pub data: Vec<u8>,
}

impl Bitmap {
    pub(crate) fn decode(kind: ChunkKind, cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            kind,
            data: cursor.read_to_end().to_vec(),
        })
    }

    /// Decode the payload as a BMP image
    pub fn decode_image(&self) -> Result<DynamicImage> {
        Ok(image::load_from_memory_with_format(
            &self.data,
            ImageFormat::Bmp,
        )?)
    }
}

//! Paletted sprite decoding (SPR and SPR2)
//!
//! Both sprite kinds store an offset table followed by per-frame pixel
//! command streams. Frames are decoded on demand: a record only keeps its
//! payload and offset table, and the palette it refers to is looked up in
//! the owning container when a frame is requested (see [`SpriteView`]).
//!
//! ```no_run
//! use sims_iff::Iff;
//!
//! let iff = Iff::open("chair.iff")?;
//! let sprite = iff.sprite(100)?;
//! for index in 0..sprite.frame_count() {
//!     let frame = sprite.frame(index)?;
//!     frame.to_image().save(format!("chair_{index}.png"))?;
//! }
//! # Ok::<(), sims_iff::IffError>(())
//! ```

mod spr;
mod spr2;

pub use spr::Sprite;
pub use spr2::{DepthSprite, MAX_SYNTHESIZED_FRAMES};

use bitflags::bitflags;
use image::{DynamicImage, GrayImage, Luma, Rgb, Rgba, RgbaImage};

use crate::chunk_id::ChunkKind;
use crate::chunks::Palette;
use crate::container::Iff;
use crate::error::{IffError, Result};

/// Depth value of a pixel with nothing drawn on it
pub const FAR_DEPTH: u8 = 255;

/// Largest frame area accepted from a frame header (4096 x 4096)
pub const MAX_FRAME_PIXELS: u64 = 4096 * 4096;

/// Reject frame dimensions no sprite in these archives comes close to
pub(crate) fn check_frame_size(sprite: u16, index: usize, width: u32, height: u32) -> Result<()> {
    if u64::from(width) * u64::from(height) > MAX_FRAME_PIXELS {
        return Err(IffError::FrameTooLarge {
            sprite,
            index,
            width,
            height,
        });
    }
    Ok(())
}

bitflags! {
    /// Channels present in a decoded frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FrameFlags: u32 {
        const HAS_COLOR = 0x01;
        const HAS_DEPTH = 0x02;
        const HAS_ALPHA = 0x04;
    }
}

/// One decoded sprite frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Horizontal placement offset
    pub x: i32,
    /// Vertical placement offset
    pub y: i32,
    /// Channels the frame was stored with
    pub flags: FrameFlags,
    /// Palette color marking see-through pixels
    pub transparent: Rgb<u8>,
    pixels: RgbaImage,
    depth: Option<GrayImage>,
}

impl Frame {
    pub(crate) fn new(width: u32, height: u32, flags: FrameFlags, transparent: Rgb<u8>) -> Self {
        let Rgb([r, g, b]) = transparent;
        let depth = flags
            .contains(FrameFlags::HAS_DEPTH)
            .then(|| GrayImage::from_pixel(width, height, Luma([FAR_DEPTH])));
        Self {
            x: 0,
            y: 0,
            flags,
            transparent,
            pixels: RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0])),
            depth,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Color buffer
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Depth buffer, present when the frame carries [`FrameFlags::HAS_DEPTH`]
    pub fn depth(&self) -> Option<&GrayImage> {
        self.depth.as_ref()
    }

    /// Color at (`x`, `y`)
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Depth at (`x`, `y`)
    pub fn depth_at(&self, x: u32, y: u32) -> Option<u8> {
        self.depth.as_ref()?.get_pixel_checked(x, y).map(|p| p.0[0])
    }

    /// Color buffer as an exportable image
    pub fn to_image(&self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.pixels.clone())
    }

    /// Depth buffer as an exportable grayscale image
    pub fn depth_image(&self) -> Option<DynamicImage> {
        self.depth.clone().map(DynamicImage::ImageLuma8)
    }

    /// Take ownership of the color and depth buffers
    pub fn into_buffers(self) -> (RgbaImage, Option<GrayImage>) {
        (self.pixels, self.depth)
    }

    /// Write a pixel, clamping the coordinates to the last column and row.
    ///
    /// Command streams from damaged files can run past the declared size; the
    /// clamp keeps such writes inside the buffer.
    pub(crate) fn put(&mut self, x: u32, y: u32, color: Rgba<u8>, depth: Option<u8>) {
        let (width, height) = self.pixels.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        let (x, y) = (x.min(width - 1), y.min(height - 1));
        self.pixels.put_pixel(x, y, color);
        if let (Some(buffer), Some(value)) = (self.depth.as_mut(), depth) {
            buffer.put_pixel(x, y, Luma([value]));
        }
    }

    /// Fill rows `start..start + count` with `color`, depth reset to far
    pub(crate) fn clear_rows(&mut self, start: u32, count: u32, color: Rgba<u8>) {
        let (width, height) = self.pixels.dimensions();
        let end = start.saturating_add(count).min(height);
        for y in start.min(height)..end {
            for x in 0..width {
                self.pixels.put_pixel(x, y, color);
                if let Some(buffer) = self.depth.as_mut() {
                    buffer.put_pixel(x, y, Luma([FAR_DEPTH]));
                }
            }
        }
    }
}

/// Frame storage shared by both sprite kinds
pub trait FrameSource {
    /// Chunk id of the record
    fn sprite_id(&self) -> u16;

    /// Id of the PALT record frames are resolved against
    fn palette_id(&self) -> u32;

    /// Number of frames in the offset table
    fn frame_count(&self) -> usize;

    /// Decode frame `index` using `palette`
    fn decode_frame(&self, index: usize, palette: &Palette) -> Result<Frame>;

    /// Fail with [`IffError::FrameOutOfRange`] unless `index` is valid
    fn check_index(&self, index: usize) -> Result<()> {
        let count = self.frame_count();
        if index < count {
            Ok(())
        } else {
            Err(IffError::FrameOutOfRange {
                sprite: self.sprite_id(),
                index,
                count,
            })
        }
    }
}

/// A sprite record bound to the container that owns its palette
#[derive(Clone, Copy)]
pub struct SpriteView<'a> {
    container: &'a Iff,
    kind: ChunkKind,
    source: &'a (dyn FrameSource + Sync),
}

impl std::fmt::Debug for SpriteView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteView")
            .field("kind", &self.kind)
            .field("id", &self.source.sprite_id())
            .field("palette_id", &self.source.palette_id())
            .field("frame_count", &self.source.frame_count())
            .finish()
    }
}

impl<'a> SpriteView<'a> {
    pub(crate) fn new(
        container: &'a Iff,
        kind: ChunkKind,
        source: &'a (dyn FrameSource + Sync),
    ) -> Self {
        Self {
            container,
            kind,
            source,
        }
    }

    /// `Spr` or `Spr2`
    pub fn kind(&self) -> ChunkKind {
        self.kind
    }

    pub fn id(&self) -> u16 {
        self.source.sprite_id()
    }

    pub fn palette_id(&self) -> u32 {
        self.source.palette_id()
    }

    pub fn frame_count(&self) -> usize {
        self.source.frame_count()
    }

    /// Palette this sprite refers to, looked up in the owning container
    pub fn palette(&self) -> Result<&'a Palette> {
        self.container.palette(self.source.palette_id() as u16)
    }

    /// Decode frame `index`
    pub fn frame(&self, index: usize) -> Result<Frame> {
        self.source.check_index(index)?;
        let palette = self.palette()?;
        self.source.decode_frame(index, palette)
    }

    /// Decode every frame, resolving the palette once
    pub fn decode_all_frames(&self) -> Result<Vec<Frame>> {
        let palette = self.palette()?;
        let source = self.source;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..source.frame_count())
                .into_par_iter()
                .map(|index| source.decode_frame(index, palette))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            (0..source.frame_count())
                .map(|index| source.decode_frame(index, palette))
                .collect()
        }
    }
}

//! DGRP - drawing group
//!
//! A drawing group bundles, for each (direction, zoom) combination, the list
//! of sprite frames that are layered to draw one object tile.
//!
//! ## Layouts
//!
//! Versions 20000 and 20001 use narrow fields:
//!
//! ```text
//! u16 version | u16 image count
//! image:  u16 sprite count | u8 direction | u8 zoom
//! sprite: u16 id | u16 frame | i16 x | i16 y | f32 z
//! ```
//!
//! Versions 20003 and 20004 widen everything to 32 bits; 20004 also stores a
//! world-space offset:
//!
//! ```text
//! u16 version | u32 image count
//! image:  u32 direction | u32 zoom | u32 sprite count
//! sprite: u32 id | u32 frame | i32 x | i32 y | f32 z | u32 flags [| f32 wx | f32 wy]
//! ```

use bitflags::bitflags;

use crate::error::Result;
use crate::reader::ByteCursor;

/// First legacy version
pub const VERSION_LEGACY: u16 = 20000;
/// Legacy version with the same field widths
pub const VERSION_LEGACY_Z: u16 = 20001;
/// Wide fields
pub const VERSION_WIDE: u16 = 20003;
/// Wide fields plus world offsets
pub const VERSION_WORLD: u16 = 20004;

bitflags! {
    /// Camera directions an image is drawn for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Direction: u32 {
        const RIGHT_FRONT = 0x01;
        const RIGHT_BACK  = 0x04;
        const LEFT_FRONT  = 0x10;
        const LEFT_BACK   = 0x40;
    }
}

bitflags! {
    /// Per-reference drawing flags (wide layouts only)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpriteFlags: u32 {
        /// Draw mirrored horizontally
        const FLIP = 0x01;
        const UNKNOWN_2 = 0x02;
        /// Sprite carries no depth-sortable content
        const LUMINOUS = 0x04;
        const UNKNOWN_8 = 0x08;
    }
}

/// Zoom level of an image; 1 is farthest, 3 is closest
pub type Zoom = u32;

/// One frame of one sprite placed within an image
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpriteReference {
    /// Id of an SPR or SPR2 record in the same container
    pub sprite_id: u32,
    /// Frame index within that sprite
    pub frame: u32,
    /// Pixel offset of the frame
    pub x: i32,
    pub y: i32,
    /// Depth offset
    pub z: f32,
    pub flags: SpriteFlags,
    /// World-space offset, version 20004 only
    pub world: Option<(f32, f32)>,
}

/// Sprite references for one direction/zoom pair
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawingGroupImage {
    pub direction: Direction,
    pub zoom: Zoom,
    pub sprites: Vec<SpriteReference>,
}

/// DGRP record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawingGroup {
    pub version: u16,
    pub images: Vec<DrawingGroupImage>,
}

impl DrawingGroup {
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let version = cursor.read_u16()?;
        let legacy = matches!(version, VERSION_LEGACY | VERSION_LEGACY_Z);
        if !legacy && !matches!(version, VERSION_WIDE | VERSION_WORLD) {
            log::warn!("DGRP: unknown version {version}, reading the wide layout");
        }

        let image_count = if legacy {
            cursor.read_u16()? as u32
        } else {
            cursor.read_u32()?
        };

        let mut images = Vec::new();
        for _ in 0..image_count {
            let image = if legacy {
                Self::read_legacy_image(cursor)?
            } else {
                Self::read_wide_image(cursor, version == VERSION_WORLD)?
            };
            images.push(image);
        }

        Ok(Self { version, images })
    }

    fn read_legacy_image(cursor: &mut ByteCursor<'_>) -> Result<DrawingGroupImage> {
        let count = cursor.read_u16()?;
        let direction = Direction::from_bits_retain(cursor.read_u8()? as u32);
        let zoom = cursor.read_u8()? as u32;

        let mut sprites = Vec::with_capacity(count as usize);
        for _ in 0..count {
            sprites.push(SpriteReference {
                sprite_id: cursor.read_u16()? as u32,
                frame: cursor.read_u16()? as u32,
                x: cursor.read_i16()? as i32,
                y: cursor.read_i16()? as i32,
                z: cursor.read_f32()?,
                flags: SpriteFlags::empty(),
                world: None,
            });
        }

        Ok(DrawingGroupImage {
            direction,
            zoom,
            sprites,
        })
    }

    fn read_wide_image(cursor: &mut ByteCursor<'_>, world: bool) -> Result<DrawingGroupImage> {
        let direction = Direction::from_bits_retain(cursor.read_u32()?);
        let zoom = cursor.read_u32()?;
        let count = cursor.read_u32()?;

        let mut sprites = Vec::new();
        for _ in 0..count {
            let sprite_id = cursor.read_u32()?;
            let frame = cursor.read_u32()?;
            let x = cursor.read_i32()?;
            let y = cursor.read_i32()?;
            let z = cursor.read_f32()?;
            let flags = SpriteFlags::from_bits_retain(cursor.read_u32()?);
            let world = if world {
                Some((cursor.read_f32()?, cursor.read_f32()?))
            } else {
                None
            };
            sprites.push(SpriteReference {
                sprite_id,
                frame,
                x,
                y,
                z,
                flags,
                world,
            });
        }

        Ok(DrawingGroupImage {
            direction,
            zoom,
            sprites,
        })
    }

    /// Image drawn for `direction` at `zoom`
    pub fn image(&self, direction: Direction, zoom: Zoom) -> Option<&DrawingGroupImage> {
        self.images
            .iter()
            .find(|img| img.direction.contains(direction) && img.zoom == zoom)
    }
}

//! SPR2 - paletted sprite with depth and alpha channels
//!
//! Version 1000 stores an explicit offset table:
//!
//! ```text
//! u32 version | u32 frame count | u32 palette id | frame count x u32 offset
//! ```
//!
//! Version 1001 leaves the count unused and prefixes every frame with its own
//! `u32 version | u32 size` header, so the offset table is rebuilt by walking
//! those headers:
//!
//! ```text
//! u32 version | u32 palette id | u32 unused | frames...
//! ```
//!
//! A frame is `u16 width | u16 height | u32 flags | u16 palette slot |
//! u16 transparent index | u16 y | u16 x`, then a stream of 16-bit markers,
//! each a 3-bit command above a 13-bit count:
//!
//! | Cmd | Effect                                                     |
//! |-----|------------------------------------------------------------|
//! | 0   | one row of pixel commands, `count` bytes including marker  |
//! | 4   | `count` rows fully transparent                             |
//! | 5   | end of frame                                               |
//!
//! Pixel commands inside a row use the same marker packing:
//!
//! | Cmd | Per pixel                    | Odd-count pad |
//! |-----|------------------------------|---------------|
//! | 1   | depth, color                 | no            |
//! | 2   | depth, color, alpha (0..=31) | yes           |
//! | 3   | nothing, pixel transparent   | no            |
//! | 6   | color                        | yes           |

use super::{FAR_DEPTH, Frame, FrameFlags, FrameSource, check_frame_size};
use crate::chunks::Palette;
use crate::error::Result;
use crate::reader::ByteCursor;

/// Version with an explicit offset table
pub const VERSION_OFFSET_TABLE: u32 = 1000;
/// Version with per-frame headers
pub const VERSION_FRAME_HEADERS: u32 = 1001;

/// Most frames rebuilt from per-frame headers: 12 views at 2 zoom levels
pub const MAX_SYNTHESIZED_FRAMES: usize = 24;

const ROW_PIXELS: u16 = 0x00;
const ROW_SKIP: u16 = 0x04;
const ROW_END: u16 = 0x05;

const PIXEL_DEPTH_COLOR: u16 = 0x01;
const PIXEL_DEPTH_COLOR_ALPHA: u16 = 0x02;
const PIXEL_TRANSPARENT: u16 = 0x03;
const PIXEL_COLOR: u16 = 0x06;

fn split_marker(marker: u16) -> (u16, u32) {
    (marker >> 13, (marker & 0x1FFF) as u32)
}

fn scale_alpha(alpha: u8) -> u8 {
    (alpha as u32 * 255 / 31).min(255) as u8
}

/// SPR2 record: header, offset table and the undecoded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthSprite {
    pub id: u16,
    pub version: u32,
    pub palette_id: u32,
    offsets: Vec<usize>,
    data: Vec<u8>,
}

impl DepthSprite {
    /// Read the header and build the offset table of a SPR2 payload
    pub fn decode(id: u16, payload: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::little(payload);
        let version = cursor.read_u32()?;

        let (palette_id, offsets) = if version == VERSION_OFFSET_TABLE {
            let count = cursor.read_u32()?;
            let palette_id = cursor.read_u32()?;
            let offsets = (0..count)
                .map(|_| cursor.read_u32().map(|o| o as usize))
                .collect::<Result<Vec<_>>>()?;
            (palette_id, offsets)
        } else {
            if version != VERSION_FRAME_HEADERS {
                log::warn!("SPR2 {id}: unknown version {version}, walking frame headers");
            }
            let palette_id = cursor.read_u32()?;
            cursor.skip(4)?;
            (palette_id, Self::walk_frame_headers(&mut cursor)?)
        };

        log::trace!(
            "SPR2 {id}: version {version}, {} frames, palette {palette_id}",
            offsets.len()
        );

        Ok(Self {
            id,
            version,
            palette_id,
            offsets,
            data: payload.to_vec(),
        })
    }

    /// Offsets of consecutive `version | size` framed records, at most
    /// [`MAX_SYNTHESIZED_FRAMES`] of them
    fn walk_frame_headers(cursor: &mut ByteCursor<'_>) -> Result<Vec<usize>> {
        let mut offsets = Vec::new();
        let mut position = cursor.position();
        while offsets.len() < MAX_SYNTHESIZED_FRAMES && cursor.len() - position >= 8 {
            offsets.push(position);
            cursor.seek(position + 4)?;
            let size = cursor.read_u32()? as usize;
            position = match (position + 8).checked_add(size) {
                Some(next) if next <= cursor.len() => next,
                _ => break,
            };
        }
        Ok(offsets)
    }

    /// Offset of each frame within the payload
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    fn has_frame_headers(&self) -> bool {
        self.version != VERSION_OFFSET_TABLE
    }
}

impl FrameSource for DepthSprite {
    fn sprite_id(&self) -> u16 {
        self.id
    }

    fn palette_id(&self) -> u32 {
        self.palette_id
    }

    fn frame_count(&self) -> usize {
        self.offsets.len()
    }

    fn decode_frame(&self, index: usize, palette: &Palette) -> Result<Frame> {
        self.check_index(index)?;
        let mut cursor = ByteCursor::little(&self.data);
        cursor.seek(self.offsets[index])?;
        if self.has_frame_headers() {
            cursor.skip(8)?;
        }

        let width = cursor.read_u16()? as u32;
        let height = cursor.read_u16()? as u32;
        let flags = FrameFlags::from_bits_retain(cursor.read_u32()?);
        let _palette_slot = cursor.read_u16()?;
        let transparent_index = cursor.read_u16()?;
        let y = cursor.read_u16()?;
        let x = cursor.read_u16()?;

        if transparent_index > 0xFF {
            log::warn!(
                "SPR2 {} frame {index}: transparent index {transparent_index} exceeds the palette, using its low byte",
                self.id
            );
        }
        let transparent_index = transparent_index as u8;

        check_frame_size(self.id, index, width, height)?;
        let transparent = palette.color(transparent_index);
        let mut frame = Frame::new(width, height, flags, transparent);
        frame.x = x as i32;
        frame.y = y as i32;

        let clear = palette.rgba(transparent_index, 0);
        let mut row = 0u32;
        loop {
            let (command, count) = split_marker(cursor.read_u16()?);
            log::trace!("SPR2 {} frame {index} row {row}: command {command} x{count}", self.id);

            match command {
                ROW_PIXELS => {
                    let mut column = 0u32;
                    let mut budget = count as i64 - 2;
                    while budget > 0 {
                        let (pixel_command, pixels) = split_marker(cursor.read_u16()?);
                        budget -= 2;

                        match pixel_command {
                            PIXEL_DEPTH_COLOR => {
                                for _ in 0..pixels {
                                    let depth = cursor.read_u8()?;
                                    let color = palette.rgba(cursor.read_u8()?, 255);
                                    frame.put(column, row, color, Some(depth));
                                    column += 1;
                                }
                                budget -= 2 * pixels as i64;
                            }
                            PIXEL_DEPTH_COLOR_ALPHA => {
                                for _ in 0..pixels {
                                    let depth = cursor.read_u8()?;
                                    let color = cursor.read_u8()?;
                                    let alpha = scale_alpha(cursor.read_u8()?);
                                    frame.put(column, row, palette.rgba(color, alpha), Some(depth));
                                    column += 1;
                                }
                                budget -= 3 * pixels as i64;
                                if pixels % 2 == 1 {
                                    cursor.skip(1)?;
                                    budget -= 1;
                                }
                            }
                            PIXEL_TRANSPARENT => {
                                for _ in 0..pixels {
                                    frame.put(column, row, clear, Some(FAR_DEPTH));
                                    column += 1;
                                }
                            }
                            PIXEL_COLOR => {
                                for _ in 0..pixels {
                                    let color = cursor.read_u8()?;
                                    if palette.color(color) == transparent {
                                        frame.put(column, row, clear, Some(FAR_DEPTH));
                                    } else {
                                        frame.put(column, row, palette.rgba(color, 255), Some(0));
                                    }
                                    column += 1;
                                }
                                budget -= pixels as i64;
                                if pixels % 2 == 1 {
                                    cursor.skip(1)?;
                                    budget -= 1;
                                }
                            }
                            other => {
                                log::warn!(
                                    "SPR2 {} frame {index}: unknown pixel command {other} at row {row}, ending frame",
                                    self.id
                                );
                                return Ok(frame);
                            }
                        }
                    }
                    row += 1;
                }
                ROW_SKIP => {
                    frame.clear_rows(row, count, clear);
                    row += count;
                }
                ROW_END => break,
                other => {
                    log::warn!(
                        "SPR2 {} frame {index}: unknown row command {other} at row {row}, ending frame",
                        self.id
                    );
                    break;
                }
            }
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};
    use pretty_assertions::assert_eq;

    const MAGENTA: Rgb<u8> = Rgb([255, 0, 255]);

    fn palette() -> Palette {
        Palette::new(vec![
            MAGENTA,
            Rgb([10, 20, 30]),
            Rgb([40, 50, 60]),
            Rgb([70, 80, 90]),
        ])
    }

    fn marker(command: u16, count: u16) -> [u8; 2] {
        ((command << 13) | count).to_le_bytes()
    }

    fn frame_header(width: u16, height: u16, flags: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // palette slot
        out.extend_from_slice(&0u16.to_le_bytes()); // transparent index
        out.extend_from_slice(&4u16.to_le_bytes()); // y
        out.extend_from_slice(&2u16.to_le_bytes()); // x
        out
    }

    fn table_sprite(frame: &[u8]) -> DepthSprite {
        let mut data = VERSION_OFFSET_TABLE.to_le_bytes().to_vec();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&5u32.to_le_bytes());
        data.extend_from_slice(&16u32.to_le_bytes());
        data.extend_from_slice(frame);
        DepthSprite::decode(8, &data).unwrap()
    }

    #[test]
    fn color_row_is_opaque_with_zero_depth() {
        let mut frame = frame_header(3, 1, 0x07);
        frame.extend_from_slice(&marker(ROW_PIXELS, 8));
        frame.extend_from_slice(&marker(PIXEL_COLOR, 3));
        frame.extend_from_slice(&[1, 2, 3, 0]);
        frame.extend_from_slice(&marker(ROW_END, 0));

        let sprite = table_sprite(&frame);
        assert_eq!(sprite.palette_id, 5);
        let decoded = sprite.decode_frame(0, &palette()).unwrap();
        assert_eq!((decoded.x, decoded.y), (2, 4));
        assert_eq!(decoded.transparent, MAGENTA);
        assert_eq!(decoded.pixel(0, 0), Some(Rgba([10, 20, 30, 255])));
        assert_eq!(decoded.pixel(1, 0), Some(Rgba([40, 50, 60, 255])));
        assert_eq!(decoded.pixel(2, 0), Some(Rgba([70, 80, 90, 255])));
        for x in 0..3 {
            assert_eq!(decoded.depth_at(x, 0), Some(0));
        }
    }

    #[test]
    fn transparent_color_index_is_see_through() {
        let mut frame = frame_header(2, 1, 0x07);
        frame.extend_from_slice(&marker(ROW_PIXELS, 6));
        frame.extend_from_slice(&marker(PIXEL_COLOR, 2));
        frame.extend_from_slice(&[0, 1]);
        frame.extend_from_slice(&marker(ROW_END, 0));

        let decoded = table_sprite(&frame).decode_frame(0, &palette()).unwrap();
        assert_eq!(decoded.pixel(0, 0), Some(Rgba([255, 0, 255, 0])));
        assert_eq!(decoded.depth_at(0, 0), Some(FAR_DEPTH));
        assert_eq!(decoded.pixel(1, 0), Some(Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn depth_color_alpha_triples() {
        let mut frame = frame_header(2, 1, 0x07);
        // marker + sub marker + one triple + pad, then a depth/color pair
        frame.extend_from_slice(&marker(ROW_PIXELS, 12));
        frame.extend_from_slice(&marker(PIXEL_DEPTH_COLOR_ALPHA, 1));
        frame.extend_from_slice(&[9, 2, 31, 0]);
        frame.extend_from_slice(&marker(PIXEL_DEPTH_COLOR, 1));
        frame.extend_from_slice(&[17, 3]);
        frame.extend_from_slice(&marker(ROW_END, 0));

        let decoded = table_sprite(&frame).decode_frame(0, &palette()).unwrap();
        assert_eq!(decoded.pixel(0, 0), Some(Rgba([40, 50, 60, 255])));
        assert_eq!(decoded.depth_at(0, 0), Some(9));
        assert_eq!(decoded.pixel(1, 0), Some(Rgba([70, 80, 90, 255])));
        assert_eq!(decoded.depth_at(1, 0), Some(17));
    }

    #[test]
    fn alpha_scales_to_full_range() {
        assert_eq!(scale_alpha(0), 0);
        assert_eq!(scale_alpha(16), 131);
        assert_eq!(scale_alpha(31), 255);
        assert_eq!(scale_alpha(200), 255);
    }

    #[test]
    fn skipped_rows_and_transparent_runs() {
        let mut frame = frame_header(2, 3, 0x03);
        frame.extend_from_slice(&marker(ROW_SKIP, 2));
        frame.extend_from_slice(&marker(ROW_PIXELS, 8));
        frame.extend_from_slice(&marker(PIXEL_TRANSPARENT, 1));
        frame.extend_from_slice(&marker(PIXEL_DEPTH_COLOR, 1));
        frame.extend_from_slice(&[4, 1]);
        frame.extend_from_slice(&marker(ROW_END, 0));

        let decoded = table_sprite(&frame).decode_frame(0, &palette()).unwrap();
        assert_eq!(decoded.pixel(1, 1), Some(Rgba([255, 0, 255, 0])));
        assert_eq!(decoded.pixel(0, 2), Some(Rgba([255, 0, 255, 0])));
        assert_eq!(decoded.depth_at(0, 2), Some(FAR_DEPTH));
        assert_eq!(decoded.pixel(1, 2), Some(Rgba([10, 20, 30, 255])));
        assert_eq!(decoded.depth_at(1, 2), Some(4));
    }

    #[test]
    fn overlong_row_clamps_to_last_column() {
        let mut frame = frame_header(1, 1, 0x01);
        frame.extend_from_slice(&marker(ROW_PIXELS, 8));
        frame.extend_from_slice(&marker(PIXEL_COLOR, 3));
        frame.extend_from_slice(&[1, 2, 3, 0]);
        frame.extend_from_slice(&marker(ROW_END, 0));

        let decoded = table_sprite(&frame).decode_frame(0, &palette()).unwrap();
        assert_eq!(decoded.width(), 1);
        assert_eq!(decoded.pixel(0, 0), Some(Rgba([70, 80, 90, 255])));
        assert!(decoded.depth().is_none());
    }

    #[test]
    fn header_stores_width_before_height() {
        let mut frame = frame_header(5, 2, 0x01);
        frame.extend_from_slice(&marker(ROW_END, 0));
        let decoded = table_sprite(&frame).decode_frame(0, &palette()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 2));
    }

    #[test_log::test]
    fn wide_transparent_index_uses_low_byte() {
        let mut frame = frame_header(1, 1, 0x01);
        frame[10..12].copy_from_slice(&0x0102u16.to_le_bytes());
        frame.extend_from_slice(&marker(ROW_END, 0));
        let decoded = table_sprite(&frame).decode_frame(0, &palette()).unwrap();
        assert_eq!(decoded.transparent, Rgb([40, 50, 60]));
        assert_eq!(decoded.pixel(0, 0), Some(Rgba([40, 50, 60, 0])));
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let mut frame = frame_header(u16::MAX, u16::MAX, 0x07);
        frame.extend_from_slice(&marker(ROW_END, 0));
        assert!(matches!(
            table_sprite(&frame).decode_frame(0, &palette()),
            Err(crate::IffError::FrameTooLarge { sprite: 8, .. })
        ));
    }

    #[test]
    fn unknown_row_command_ends_frame() {
        let mut frame = frame_header(1, 1, 0x01);
        frame.extend_from_slice(&marker(0x07, 0));
        let decoded = table_sprite(&frame).decode_frame(0, &palette()).unwrap();
        assert_eq!(decoded.pixel(0, 0), Some(Rgba([255, 0, 255, 0])));
    }

    fn framed_sprite(frames: usize) -> Vec<u8> {
        let mut body = frame_header(1, 1, 0x01);
        body.extend_from_slice(&marker(ROW_END, 0));

        let mut data = VERSION_FRAME_HEADERS.to_le_bytes().to_vec();
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        for _ in 0..frames {
            data.extend_from_slice(&VERSION_FRAME_HEADERS.to_le_bytes());
            data.extend_from_slice(&(body.len() as u32).to_le_bytes());
            data.extend_from_slice(&body);
        }
        data
    }

    #[test]
    fn frame_headers_are_walked() {
        let sprite = DepthSprite::decode(1, &framed_sprite(3)).unwrap();
        assert_eq!(sprite.palette_id, 3);
        assert_eq!(sprite.frame_count(), 3);
        assert_eq!(sprite.offsets()[0], 12);
        let frame = sprite.decode_frame(2, &palette()).unwrap();
        assert_eq!((frame.width(), frame.height()), (1, 1));
    }

    #[test]
    fn walked_table_is_capped() {
        let sprite = DepthSprite::decode(1, &framed_sprite(30)).unwrap();
        assert_eq!(sprite.frame_count(), MAX_SYNTHESIZED_FRAMES);
    }
}

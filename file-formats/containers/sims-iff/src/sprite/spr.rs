//! SPR - legacy paletted sprite
//!
//! ```text
//! u32 version | u32 frame count | u32 palette id | [frame count x u32 offset]
//! ```
//!
//! The record can be stored in either byte order. A version whose first
//! 16-bit half is zero was written big-endian; the whole record is then read
//! big-endian. Only versions 502..=505 carry an offset table; any other
//! version holds a single frame right after the header.
//!
//! Each frame is `u32 reserved | u16 height | u16 width` followed by one
//! (command, count) byte pair per row. Command `0x04` introduces `count`
//! pixel commands, also (command, count) byte pairs:
//!
//! | Cmd  | Effect                                               |
//! |------|------------------------------------------------------|
//! | 0x01 | `count` transparent pixels                           |
//! | 0x02 | one palette index, repeated `count` times            |
//! | 0x03 | `count` palette indices, one pixel each              |
//! | 0x09 | `count` whole rows transparent                       |
//!
//! Any other row command, `0x05` included, leaves its row as it was and
//! moves on to the next one.

use std::ops::RangeInclusive;

use image::{Rgb, Rgba};

use super::{Frame, FrameFlags, FrameSource, check_frame_size};
use crate::chunks::Palette;
use crate::error::Result;
use crate::reader::{ByteCursor, Endian};

/// Versions that store an explicit offset table
pub const OFFSET_TABLE_VERSIONS: RangeInclusive<u32> = 502..=505;

const ROW_PIXELS: u8 = 0x04;

const PIXEL_TRANSPARENT: u8 = 0x01;
const PIXEL_RUN: u8 = 0x02;
const PIXEL_LITERAL: u8 = 0x03;
const PIXEL_SKIP_ROWS: u8 = 0x09;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// SPR record: header, offset table and the undecoded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub id: u16,
    pub version: u32,
    pub palette_id: u32,
    /// Byte order the record was written in
    pub endian: Endian,
    offsets: Vec<usize>,
    data: Vec<u8>,
}

impl Sprite {
    /// Read the header and offset table from a SPR payload
    pub fn decode(id: u16, payload: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::little(payload);

        let raw = cursor.read_bytes(4)?;
        let (endian, version) = if raw[0] == 0 && raw[1] == 0 {
            (
                Endian::Big,
                u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
            )
        } else {
            (
                Endian::Little,
                u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            )
        };
        cursor.set_endian(endian);

        let frame_count = cursor.read_u32()?;
        let palette_id = cursor.read_u32()?;

        let offsets = if OFFSET_TABLE_VERSIONS.contains(&version) {
            (0..frame_count)
                .map(|_| cursor.read_u32().map(|o| o as usize))
                .collect::<Result<Vec<_>>>()?
        } else {
            vec![cursor.position()]
        };

        log::trace!(
            "SPR {id}: version {version} ({endian:?}), {} frames, palette {palette_id}",
            offsets.len()
        );

        Ok(Self {
            id,
            version,
            palette_id,
            endian,
            offsets,
            data: payload.to_vec(),
        })
    }

    /// Offset of each frame within the payload
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

impl FrameSource for Sprite {
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
        let mut cursor = ByteCursor::new(&self.data, self.endian);
        cursor.seek(self.offsets[index])?;

        cursor.skip(4)?;
        let height = cursor.read_u16()? as u32;
        let width = cursor.read_u16()? as u32;
        check_frame_size(self.id, index, width, height)?;
        let mut frame = Frame::new(width, height, FrameFlags::HAS_COLOR, Rgb([0, 0, 0]));

        let mut row = 0u32;
        while row < height {
            let command = cursor.read_u8()?;
            let count = cursor.read_u8()?;
            log::trace!("SPR {} frame {index} row {row}: command {command:#04x} x{count}", self.id);

            match command {
                ROW_PIXELS => {
                    let mut column = 0u32;
                    let mut skipped_rows = false;
                    for _ in 0..count {
                        let pixel_command = cursor.read_u8()?;
                        let pixel_count = cursor.read_u8()? as u32;
                        match pixel_command {
                            PIXEL_TRANSPARENT => {
                                for _ in 0..pixel_count {
                                    frame.put(column, row, TRANSPARENT, None);
                                    column += 1;
                                }
                            }
                            PIXEL_RUN => {
                                let color = palette.rgba(cursor.read_u8()?, 255);
                                for _ in 0..pixel_count {
                                    frame.put(column, row, color, None);
                                    column += 1;
                                }
                            }
                            PIXEL_LITERAL => {
                                for _ in 0..pixel_count {
                                    let color = palette.rgba(cursor.read_u8()?, 255);
                                    frame.put(column, row, color, None);
                                    column += 1;
                                }
                            }
                            PIXEL_SKIP_ROWS => {
                                frame.clear_rows(row, pixel_count, TRANSPARENT);
                                row += pixel_count;
                                column = 0;
                                skipped_rows = true;
                            }
                            other => {
                                log::warn!(
                                    "SPR {} frame {index}: unknown pixel command {other:#04x} at row {row}, ending frame",
                                    self.id
                                );
                                return Ok(frame);
                            }
                        }
                    }
                    if !skipped_rows {
                        row += 1;
                    }
                }
                _ => row += 1,
            }
        }

        Ok(frame)
    }
}

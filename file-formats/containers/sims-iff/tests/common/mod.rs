//! Byte-level fixture builders shared by the integration tests
#![allow(dead_code)]

use sims_iff::{CHUNK_HEADER_SIZE, MAGIC};

/// Assembles a container chunk by chunk
pub struct IffBuilder {
    data: Vec<u8>,
}

impl Default for IffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IffBuilder {
    pub fn new() -> Self {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&0u32.to_be_bytes());
        Self { data }
    }

    /// Append a chunk; `tag` is the padded on-disk spelling ("SPR#", "STR#")
    pub fn chunk(mut self, tag: &[u8; 4], id: u16, label: &str, payload: &[u8]) -> Self {
        let size = (CHUNK_HEADER_SIZE + payload.len()) as u32;
        self.data.extend_from_slice(tag);
        self.data.extend_from_slice(&size.to_be_bytes());
        self.data.extend_from_slice(&id.to_be_bytes());
        self.data.extend_from_slice(&0u16.to_be_bytes());
        let mut label_bytes = [0u8; 64];
        label_bytes[..label.len()].copy_from_slice(label.as_bytes());
        self.data.extend_from_slice(&label_bytes);
        self.data.extend_from_slice(payload);
        self
    }

    /// Append raw bytes after the last chunk
    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

pub fn palette(colors: &[[u8; 3]]) -> Vec<u8> {
    let mut out = 1u32.to_le_bytes().to_vec();
    out.extend_from_slice(&(colors.len() as u32).to_le_bytes());
    out.extend_from_slice(&[0; 8]);
    for color in colors {
        out.extend_from_slice(color);
    }
    out
}

/// OBJD version 138 (95 fields) with selected fields set
pub fn object_definition(fields: &[(usize, u16)]) -> Vec<u8> {
    let mut values = vec![0u16; 95];
    for &(index, value) in fields {
        values[index] = value;
    }
    let mut out = 138u32.to_le_bytes().to_vec();
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Format -1 string table
pub fn string_table(strings: &[&str]) -> Vec<u8> {
    let mut out = (-1i16).to_le_bytes().to_vec();
    out.extend_from_slice(&(strings.len() as u16).to_le_bytes());
    for s in strings {
        out.extend_from_slice(s.as_bytes());
        out.push(0);
    }
    out
}

/// Single-frame legacy sprite (version 1) in the requested byte order
pub fn legacy_sprite(
    big_endian: bool,
    palette_id: u32,
    width: u16,
    height: u16,
    rows: &[u8],
) -> Vec<u8> {
    let u32_bytes = |v: u32| {
        if big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    };
    let u16_bytes = |v: u16| {
        if big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    };

    // A big-endian version must keep its high half zero to be recognised
    let mut out = u32_bytes(1).to_vec();
    out.extend_from_slice(&u32_bytes(1));
    out.extend_from_slice(&u32_bytes(palette_id));
    out.extend_from_slice(&u32_bytes(0));
    out.extend_from_slice(&u16_bytes(height));
    out.extend_from_slice(&u16_bytes(width));
    out.extend_from_slice(rows);
    out
}

/// 16-bit SPR2 marker: 3-bit command above a 13-bit count
pub fn marker(command: u16, count: u16) -> [u8; 2] {
    ((command << 13) | count).to_le_bytes()
}

/// SPR2 frame header (no per-frame version/size prefix)
pub fn depth_frame_header(width: u16, height: u16, flags: u32, transparent: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&transparent.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

/// Version 1000 SPR2 with an explicit offset table
pub fn depth_sprite(palette_id: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut out = 1000u32.to_le_bytes().to_vec();
    out.extend_from_slice(&(frames.len() as u32).to_le_bytes());
    out.extend_from_slice(&palette_id.to_le_bytes());
    let mut offset = 12 + 4 * frames.len();
    for frame in frames {
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += frame.len();
    }
    for frame in frames {
        out.extend_from_slice(frame);
    }
    out
}

/// Version 1001 SPR2 holding `count` copies of `frame`, each behind its own
/// version/size header
pub fn framed_depth_sprite(palette_id: u32, frame: &[u8], count: usize) -> Vec<u8> {
    let mut out = 1001u32.to_le_bytes().to_vec();
    out.extend_from_slice(&palette_id.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    for _ in 0..count {
        out.extend_from_slice(&1001u32.to_le_bytes());
        out.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        out.extend_from_slice(frame);
    }
    out
}

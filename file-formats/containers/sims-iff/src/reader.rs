//! Bounds-checked byte cursor used by every record decoder
//!
//! The cursor never reads past its buffer: every primitive read checks the
//! remaining length first and fails with [`IffError::Truncated`]. Byte order
//! is an explicit property of the cursor rather than a transformation of the
//! underlying bytes, so a decoder can switch order mid-record without touching
//! the payload.

use crate::error::{IffError, Result};

/// Byte order used for multi-byte reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endian {
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

/// A cursor for reading binary data from a byte slice
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> ByteCursor<'a> {
    /// Create a new cursor at the beginning of the data
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            endian,
        }
    }

    /// Little-endian cursor, the byte order of chunk payloads
    pub fn little(data: &'a [u8]) -> Self {
        Self::new(data, Endian::Little)
    }

    /// Big-endian cursor, the byte order of container headers
    pub fn big(data: &'a [u8]) -> Self {
        Self::new(data, Endian::Big)
    }

    /// Current byte order
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Change the byte order used by subsequent reads
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Current absolute position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// The whole underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Move to an absolute position. Seeking to the very end is allowed.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(IffError::Truncated {
                offset: position,
                needed: 0,
                available: 0,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Advance by `n` bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(IffError::Truncated {
                offset: self.position,
                needed: n,
                available,
            });
        }
        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    /// Read an unsigned 8-bit integer
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Read a signed 8-bit integer
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read an unsigned 16-bit integer in the cursor's byte order
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take_array()?;
        Ok(match self.endian {
            Endian::Little => u16::from_le_bytes(bytes),
            Endian::Big => u16::from_be_bytes(bytes),
        })
    }

    /// Read a signed 16-bit integer in the cursor's byte order
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read an unsigned 32-bit integer in the cursor's byte order
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take_array()?;
        Ok(match self.endian {
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Big => u32::from_be_bytes(bytes),
        })
    }

    /// Read a signed 32-bit integer in the cursor's byte order
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a 32-bit IEEE float in the cursor's byte order
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Borrow exactly `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Borrow everything from the cursor to the end of the buffer
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let rest = &self.data[self.position..];
        self.position = self.data.len();
        rest
    }

    /// Read a fixed-length string, dropping trailing NUL padding
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        let bytes = self.take(n)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(decode_text(&bytes[..end]))
    }

    /// Read bytes up to a NUL terminator, consuming the terminator.
    ///
    /// A string running to the end of the buffer without a terminator is
    /// accepted as-is.
    pub fn read_null_terminated_string(&mut self) -> Result<String> {
        let rest = &self.data[self.position..];
        match rest.iter().position(|&b| b == 0) {
            Some(end) => {
                let text = decode_text(&rest[..end]);
                self.position += end + 1;
                Ok(text)
            }
            None => Ok(decode_text(self.read_to_end())),
        }
    }

    /// Read a string prefixed by an 8-bit length
    pub fn read_pascal_string(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        Ok(decode_text(self.take(len)?))
    }

    /// Read a string prefixed by a 7-bit-per-byte variable length.
    ///
    /// Lengths below 128 are encoded exactly like [`Self::read_pascal_string`].
    pub fn read_var_len_string(&mut self) -> Result<String> {
        let mut len = 0usize;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            len |= ((byte & 0x7F) as usize) << shift;
            if byte & 0x80 == 0 || shift >= 28 {
                break;
            }
            shift += 7;
        }
        Ok(decode_text(self.take(len)?))
    }
}

/// Strings in these archives are single-byte text; anything outside UTF-8 is
/// replaced rather than rejected.
fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

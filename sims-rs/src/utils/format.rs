//! Formatting utilities

use humansize::{DECIMAL, format_size};

/// Format file size in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, DECIMAL)
}

/// Format an object GUID the way catalog tools print it
pub fn format_guid(guid: u32) -> String {
    format!("0x{guid:08X}")
}

//! Error types for IFF container loading and record decoding.
//!
//! Loading is fail-fast: a bad header, an unknown chunk tag or a read past
//! the end of a buffer aborts the whole load. There is no partial-container
//! mode.
//!
//! # Error Categories
//!
//! - [`IffError::InvalidContainer`] - the 60-byte magic string did not match
//! - [`IffError::UnknownChunkType`] - a chunk header carried a tag outside the known set
//! - [`IffError::Truncated`] - a read ran past the end of the data
//! - [`IffError::LookupNotFound`] - a queried id is not present for that record kind
//! - [`IffError::FrameOutOfRange`] - a sprite frame index past the offset table
//! - [`IffError::FrameTooLarge`] - a frame header declares an impossible size
//! - [`IffError::Io`] - the file could not be read
//! - [`IffError::Image`] - an embedded bitmap could not be decoded
//!
//! Version values a decoder does not recognise are *not* errors; the decoder
//! falls back to the narrowest layout and logs a warning.

use thiserror::Error;

use crate::chunk_id::ChunkKind;

/// Result type alias using [`IffError`] as the error type.
pub type Result<T> = std::result::Result<T, IffError>;

/// Errors that can occur while loading or querying an IFF container.
#[derive(Error, Debug)]
pub enum IffError {
    /// Underlying I/O error while reading the container file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The container does not start with the expected magic string.
    #[error("Invalid IFF container: {reason}")]
    InvalidContainer {
        /// Human readable description of what was wrong.
        reason: String,
    },

    /// A chunk header carried a tag outside the closed set of known kinds.
    ///
    /// Always aborts the load.
    #[error("Unknown chunk type {tag:?} at offset {offset}")]
    UnknownChunkType {
        /// Tag after trimming `#` and NUL padding.
        tag: String,
        /// Offset of the chunk header within the container.
        offset: u64,
    },

    /// A read went past the end of the buffer.
    #[error("Truncated data: needed {needed} bytes at offset {offset}, only {available} available")]
    Truncated {
        /// Cursor position when the read was attempted.
        offset: usize,
        /// Bytes requested.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// The requested id is not present for the requested record kind.
    #[error("{kind} with id {id} not found")]
    LookupNotFound {
        /// Record family that was searched.
        kind: ChunkKind,
        /// Requested id.
        id: u16,
    },

    /// A sprite frame index past the end of the offset table.
    #[error("Sprite {sprite} has {count} frames, frame {index} requested")]
    FrameOutOfRange {
        /// Sprite chunk id.
        sprite: u16,
        /// Requested frame.
        index: usize,
        /// Frames in the offset table.
        count: usize,
    },

    /// A frame header declares dimensions past [`crate::sprite::MAX_FRAME_PIXELS`].
    #[error("Sprite {sprite} frame {index} declares an oversized {width}x{height} image")]
    FrameTooLarge {
        /// Sprite chunk id.
        sprite: u16,
        /// Frame being decoded.
        index: usize,
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },

    /// An embedded bitmap could not be decoded.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl IffError {
    /// Create an invalid container error
    pub fn invalid_container(reason: impl Into<String>) -> Self {
        Self::InvalidContainer {
            reason: reason.into(),
        }
    }

    /// Create a lookup miss for `kind`/`id`
    pub fn not_found(kind: ChunkKind, id: u16) -> Self {
        Self::LookupNotFound { kind, id }
    }

    /// True if this is a [`IffError::LookupNotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LookupNotFound { .. })
    }
}

//! Parser for Maxis IFF game-asset containers.
//!
//! An IFF file is a flat sequence of typed chunks: object definitions,
//! string tables, palettes, paletted sprites, drawing groups and a handful of
//! records this crate keeps as raw bytes. [`Iff`] loads the whole container
//! in one pass and offers by-id lookups for each record kind.
//!
//! ## Features
//!
//! - Fail-fast loading: a bad magic string, unknown chunk tag or truncated
//!   record aborts the load
//! - SPR and SPR2 sprite decoding, with SPR2 depth and alpha channels
//! - Palettes resolved when a frame is requested, not at load time
//! - All five string table layouts, with per-language access
//! - Parallel frame decoding (with the `parallel` feature)
//!
//! ## Example
//!
//! ```no_run
//! use sims_iff::{Iff, strings::DEFAULT_LANGUAGE};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let iff = Iff::open("objects/chair.iff")?;
//!
//! if let Some(object) = iff.master_object() {
//!     println!("GUID {:08X}, price {}", object.guid(), object.price());
//!     let catalog = iff.string_table(object.catalog_strings_id())?;
//!     println!("{:?}", catalog.get(DEFAULT_LANGUAGE, 0));
//! }
//!
//! let sprite = iff.sprite(100)?;
//! let frame = sprite.frame(0)?;
//! frame.to_image().save("chair.png")?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod chunk_header;
pub mod chunk_id;
pub mod chunks;
pub mod container;
pub mod error;
pub mod reader;
pub mod sprite;

pub use chunk_header::{CHUNK_HEADER_SIZE, ChunkHeader, RawChunk, read_chunk};
pub use chunk_id::ChunkKind;
pub use chunks::{
    Behavior, Bitmap, Chunk, Constants, Direction, DrawingGroup, DrawingGroupImage, FunctionEntry,
    FunctionTable, MotiveRatings, NameReference, ObjectDefinition, OpaqueRecord, Palette,
    SimulatorConstant, SimulatorConstants, SpriteFlags, SpriteReference, StringEntry, StringTable,
    StringTableFormat, objd, strings,
};
pub use container::{ChunkSummary, Iff, LoadOptions, MAGIC, PlacedFrame};
pub use error::{IffError, Result};
pub use reader::{ByteCursor, Endian};
pub use sprite::{DepthSprite, Frame, FrameFlags, FrameSource, Sprite, SpriteView};

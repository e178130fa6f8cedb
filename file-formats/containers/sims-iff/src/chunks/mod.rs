//! Typed record decoders and the tag dispatch that selects between them

pub mod bcon;
pub mod bitmap;
pub mod dgrp;
pub mod fcns;
pub mod names;
pub mod objd;
pub mod objf;
pub mod opaque;
pub mod palt;
pub mod strings;

pub use bcon::Constants;
pub use bitmap::Bitmap;
pub use dgrp::{Direction, DrawingGroup, DrawingGroupImage, SpriteFlags, SpriteReference};
pub use fcns::{SimulatorConstant, SimulatorConstants};
pub use names::NameReference;
pub use objd::{MotiveRatings, ObjectDefinition};
pub use objf::{FunctionEntry, FunctionTable};
pub use opaque::{Behavior, OpaqueRecord};
pub use palt::Palette;
pub use strings::{StringEntry, StringTable, StringTableFormat};

use crate::chunk_header::RawChunk;
use crate::chunk_id::ChunkKind;
use crate::error::Result;
use crate::sprite::{DepthSprite, Sprite};

/// A decoded record of any known kind
#[derive(Debug, Clone)]
pub enum Chunk {
    Bitmap(Bitmap),
    NameReference(NameReference),
    Constants(Constants),
    SimulatorConstants(SimulatorConstants),
    DrawingGroup(DrawingGroup),
    ObjectDefinition(ObjectDefinition),
    Behavior(Behavior),
    StringTable(StringTable),
    FunctionTable(FunctionTable),
    Sprite(Sprite),
    DepthSprite(DepthSprite),
    Palette(Palette),
    Opaque(OpaqueRecord),
}

impl Chunk {
    /// Decode a raw record with the decoder registered for its kind
    pub fn decode(raw: &RawChunk<'_>) -> Result<Self> {
        let mut cursor = raw.cursor();
        let cursor = &mut cursor;
        Ok(match raw.kind {
            ChunkKind::Bmp | ChunkKind::Fbmp => Self::Bitmap(Bitmap::decode(raw.kind, cursor)?),
            ChunkKind::Fwav | ChunkKind::Glob => {
                Self::NameReference(NameReference::decode(raw.kind, cursor)?)
            }
            ChunkKind::Bcon => Self::Constants(Constants::decode(cursor)?),
            ChunkKind::Fcns => Self::SimulatorConstants(SimulatorConstants::decode(cursor)?),
            ChunkKind::Dgrp => Self::DrawingGroup(DrawingGroup::decode(cursor)?),
            ChunkKind::Objd => Self::ObjectDefinition(ObjectDefinition::decode(raw.id(), cursor)?),
            ChunkKind::Bhav => Self::Behavior(Behavior::decode(cursor)?),
            ChunkKind::Cst | ChunkKind::Ctss | ChunkKind::Str | ChunkKind::TtaStrings => {
                Self::StringTable(StringTable::decode(raw.kind, cursor)?)
            }
            ChunkKind::Objf => Self::FunctionTable(FunctionTable::decode(cursor)?),
            ChunkKind::Spr => Self::Sprite(Sprite::decode(raw.id(), raw.payload)?),
            ChunkKind::Spr2 => Self::DepthSprite(DepthSprite::decode(raw.id(), raw.payload)?),
            ChunkKind::Palt => Self::Palette(Palette::decode(cursor)?),
            ChunkKind::Ttab
            | ChunkKind::Tprp
            | ChunkKind::Slot
            | ChunkKind::Filler
            | ChunkKind::ResourceMap => Self::Opaque(OpaqueRecord::decode(raw.kind, cursor)?),
        })
    }
}

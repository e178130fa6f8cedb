//! Container loading and the by-id lookup surface
//!
//! ```text
//! Offset | Size | Field
//! -------|------|--------------------------------------------------------
//! 0x00   | 60   | magic, "IFF FILE 2.5:TYPE FOLLOWED BY SIZE\0 JAMIE DOORNBOS & MAXIS 1"
//! 0x3C   |  4   | resource map offset (ignored)
//! 0x40   | ...  | chunks, each a 76-byte header plus payload
//! ```
//!
//! Chunks are read back to back until fewer than 76 bytes remain. Each one is
//! decoded immediately and stored in a per-kind index keyed by its id.

use std::collections::HashMap;
use std::path::Path;

use crate::chunk_header::{CHUNK_HEADER_SIZE, read_chunk};
use crate::chunk_id::ChunkKind;
use crate::chunks::{
    Behavior, Bitmap, Chunk, Constants, Direction, DrawingGroup, FunctionTable, NameReference,
    ObjectDefinition, OpaqueRecord, Palette, SimulatorConstants, SpriteReference, StringTable,
};
use crate::error::{IffError, Result};
use crate::sprite::{DepthSprite, Frame, Sprite, SpriteView};

/// Magic string every container starts with
pub const MAGIC: &[u8; 60] = b"IFF FILE 2.5:TYPE FOLLOWED BY SIZE\0 JAMIE DOORNBOS & MAXIS 1";

/// Magic plus the resource map offset
pub const FILE_HEADER_SIZE: usize = 64;

/// String table kinds in the order [`Iff::string_table`] searches them
const STRING_TABLE_KINDS: [ChunkKind; 4] = [
    ChunkKind::Str,
    ChunkKind::Cst,
    ChunkKind::Ctss,
    ChunkKind::TtaStrings,
];

/// Options controlling how a container is loaded
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether a bad magic string is an error.
    ///
    /// When `true` (default) it is [`IffError::InvalidContainer`]. When
    /// `false`, [`Iff::load_with`] returns `Ok(None)` instead.
    pub strict_magic: bool,
}

impl LoadOptions {
    /// Default options: strict magic checking
    pub fn new() -> Self {
        Self { strict_magic: true }
    }

    /// Set whether a bad magic string is an error
    pub fn strict_magic(mut self, strict: bool) -> Self {
        self.strict_magic = strict;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Header information of one chunk, kept for inspection
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkSummary {
    pub kind: ChunkKind,
    pub id: u16,
    pub label: String,
    /// Record size including the header
    pub size: u32,
    /// Offset of the header within the container
    pub offset: usize,
}

/// A drawing group sprite reference with its decoded frame
#[derive(Debug, Clone)]
pub struct PlacedFrame {
    pub reference: SpriteReference,
    pub frame: Frame,
}

/// A loaded IFF container
#[derive(Debug, Default)]
pub struct Iff {
    chunks: Vec<ChunkSummary>,
    bitmaps: HashMap<(ChunkKind, u16), Bitmap>,
    names: HashMap<(ChunkKind, u16), NameReference>,
    constants: HashMap<u16, Constants>,
    simulator_constants: HashMap<u16, SimulatorConstants>,
    drawing_groups: HashMap<u16, DrawingGroup>,
    behaviors: HashMap<u16, Behavior>,
    string_tables: HashMap<(ChunkKind, u16), StringTable>,
    opaque: HashMap<(ChunkKind, u16), OpaqueRecord>,
    function_tables: HashMap<u16, FunctionTable>,
    sprites: HashMap<u16, Sprite>,
    depth_sprites: HashMap<u16, DepthSprite>,
    palettes: HashMap<u16, Palette>,
    objects: Vec<ObjectDefinition>,
}

/// Insert into an id index, warning when an earlier record is replaced
fn insert_unique<K, V>(map: &mut HashMap<K, V>, key: K, value: V, kind: ChunkKind, id: u16)
where
    K: std::hash::Hash + Eq,
{
    if map.insert(key, value).is_some() {
        log::warn!("Duplicate {kind} id {id}, replacing the earlier record");
    }
}

impl Iff {
    /// Load a container from memory, failing on a bad magic string
    pub fn load(data: &[u8]) -> Result<Self> {
        Self::parse(data, true)?
            .ok_or_else(|| IffError::invalid_container("magic string mismatch"))
    }

    /// Load a container from memory with explicit options.
    ///
    /// Returns `Ok(None)` for a bad magic string when
    /// [`LoadOptions::strict_magic`] is off.
    pub fn load_with(data: &[u8], options: &LoadOptions) -> Result<Option<Self>> {
        Self::parse(data, options.strict_magic)
    }

    /// Read and load a container file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading IFF container {}", path.display());
        let data = std::fs::read(path)?;
        Self::load(&data)
    }

    /// Read and load a container file with explicit options
    pub fn open_with_options<P: AsRef<Path>>(
        path: P,
        options: &LoadOptions,
    ) -> Result<Option<Self>> {
        let data = std::fs::read(path)?;
        Self::load_with(&data, options)
    }

    /// True if `data` starts with the container magic (ASCII case-insensitive)
    pub fn has_magic(data: &[u8]) -> bool {
        data.get(..MAGIC.len())
            .is_some_and(|magic| magic.eq_ignore_ascii_case(MAGIC))
    }

    fn parse(data: &[u8], strict_magic: bool) -> Result<Option<Self>> {
        if !Self::has_magic(data) {
            if strict_magic {
                return Err(IffError::invalid_container(
                    "file does not start with the IFF 2.5 magic string",
                ));
            }
            log::debug!("Magic string mismatch, not an IFF container");
            return Ok(None);
        }
        if data.len() < FILE_HEADER_SIZE {
            return Err(IffError::Truncated {
                offset: MAGIC.len(),
                needed: FILE_HEADER_SIZE - MAGIC.len(),
                available: data.len() - MAGIC.len(),
            });
        }

        let mut iff = Self::default();
        let mut offset = FILE_HEADER_SIZE;
        while data.len() - offset >= CHUNK_HEADER_SIZE {
            let raw = read_chunk(data, offset)?;
            let label = raw.header.label();
            log::debug!(
                "{} chunk {} at offset {offset}, {} bytes, label {label:?}",
                raw.kind,
                raw.id(),
                raw.header.size
            );

            let chunk = Chunk::decode(&raw)?;
            iff.chunks.push(ChunkSummary {
                kind: raw.kind,
                id: raw.id(),
                label,
                size: raw.header.size,
                offset,
            });
            iff.insert(raw.kind, raw.id(), chunk);
            offset = raw.end();
        }

        if offset < data.len() {
            log::trace!("Ignoring {} trailing bytes", data.len() - offset);
        }

        Ok(Some(iff))
    }

    fn insert(&mut self, kind: ChunkKind, id: u16, chunk: Chunk) {
        match chunk {
            Chunk::Bitmap(c) => insert_unique(&mut self.bitmaps, (kind, id), c, kind, id),
            Chunk::NameReference(c) => insert_unique(&mut self.names, (kind, id), c, kind, id),
            Chunk::Constants(c) => insert_unique(&mut self.constants, id, c, kind, id),
            Chunk::SimulatorConstants(c) => {
                insert_unique(&mut self.simulator_constants, id, c, kind, id);
            }
            Chunk::DrawingGroup(c) => insert_unique(&mut self.drawing_groups, id, c, kind, id),
            Chunk::Behavior(c) => insert_unique(&mut self.behaviors, id, c, kind, id),
            Chunk::StringTable(c) => {
                insert_unique(&mut self.string_tables, (kind, id), c, kind, id);
            }
            Chunk::FunctionTable(c) => insert_unique(&mut self.function_tables, id, c, kind, id),
            Chunk::Sprite(c) => insert_unique(&mut self.sprites, id, c, kind, id),
            Chunk::DepthSprite(c) => insert_unique(&mut self.depth_sprites, id, c, kind, id),
            Chunk::Palette(c) => insert_unique(&mut self.palettes, id, c, kind, id),
            Chunk::Opaque(c) => insert_unique(&mut self.opaque, (kind, id), c, kind, id),
            Chunk::ObjectDefinition(c) => {
                match self.objects.iter_mut().find(|o| o.chunk_id == id) {
                    Some(existing) => {
                        log::warn!("Duplicate {kind} id {id}, replacing the earlier record");
                        *existing = c;
                    }
                    None => self.objects.push(c),
                }
            }
        }
    }

    /// Every chunk in file order
    pub fn chunks(&self) -> &[ChunkSummary] {
        &self.chunks
    }

    /// Palette `id`
    pub fn palette(&self, id: u16) -> Result<&Palette> {
        self.palettes
            .get(&id)
            .ok_or_else(|| IffError::not_found(ChunkKind::Palt, id))
    }

    /// String table `id`, searching STR, CST, CTSS then TTAs
    pub fn string_table(&self, id: u16) -> Result<&StringTable> {
        STRING_TABLE_KINDS
            .iter()
            .find_map(|&kind| self.string_tables.get(&(kind, id)))
            .ok_or_else(|| IffError::not_found(ChunkKind::Str, id))
    }

    /// String table `id` of exactly `kind`
    pub fn string_table_of(&self, kind: ChunkKind, id: u16) -> Result<&StringTable> {
        self.string_tables
            .get(&(kind, id))
            .ok_or_else(|| IffError::not_found(kind, id))
    }

    /// All string tables with their ids
    pub fn string_tables(&self) -> impl Iterator<Item = (u16, &StringTable)> {
        self.string_tables.iter().map(|(&(_, id), table)| (id, table))
    }

    /// Drawing group `id`
    pub fn drawing_group(&self, id: u16) -> Result<&DrawingGroup> {
        self.drawing_groups
            .get(&id)
            .ok_or_else(|| IffError::not_found(ChunkKind::Dgrp, id))
    }

    /// Sprite `id`, preferring SPR over SPR2 when both exist
    pub fn sprite(&self, id: u16) -> Result<SpriteView<'_>> {
        if let Some(sprite) = self.sprites.get(&id) {
            return Ok(SpriteView::new(self, ChunkKind::Spr, sprite));
        }
        if let Some(sprite) = self.depth_sprites.get(&id) {
            return Ok(SpriteView::new(self, ChunkKind::Spr2, sprite));
        }
        Err(IffError::not_found(ChunkKind::Spr, id))
    }

    /// Object definition stored under chunk id `id`
    pub fn object_definition(&self, id: u16) -> Result<&ObjectDefinition> {
        self.objects
            .iter()
            .find(|o| o.chunk_id == id)
            .ok_or_else(|| IffError::not_found(ChunkKind::Objd, id))
    }

    /// Object definitions in file order
    pub fn objects(&self) -> &[ObjectDefinition] {
        &self.objects
    }

    /// Embedded bitmap `id`, BMP_ before FBMP
    pub fn bitmap(&self, id: u16) -> Result<&Bitmap> {
        self.bitmaps
            .get(&(ChunkKind::Bmp, id))
            .or_else(|| self.bitmaps.get(&(ChunkKind::Fbmp, id)))
            .ok_or_else(|| IffError::not_found(ChunkKind::Bmp, id))
    }

    /// FWAV or GLOB name `id` of `kind`
    pub fn name_reference(&self, kind: ChunkKind, id: u16) -> Result<&NameReference> {
        self.names
            .get(&(kind, id))
            .ok_or_else(|| IffError::not_found(kind, id))
    }

    /// BCON constants `id`
    pub fn constants(&self, id: u16) -> Result<&Constants> {
        self.constants
            .get(&id)
            .ok_or_else(|| IffError::not_found(ChunkKind::Bcon, id))
    }

    /// FCNS constants `id`
    pub fn simulator_constants(&self, id: u16) -> Result<&SimulatorConstants> {
        self.simulator_constants
            .get(&id)
            .ok_or_else(|| IffError::not_found(ChunkKind::Fcns, id))
    }

    /// BHAV `id`
    pub fn behavior(&self, id: u16) -> Result<&Behavior> {
        self.behaviors
            .get(&id)
            .ok_or_else(|| IffError::not_found(ChunkKind::Bhav, id))
    }

    /// OBJf `id`
    pub fn function_table(&self, id: u16) -> Result<&FunctionTable> {
        self.function_tables
            .get(&id)
            .ok_or_else(|| IffError::not_found(ChunkKind::Objf, id))
    }

    /// Uninterpreted record `id` of `kind`
    pub fn opaque(&self, kind: ChunkKind, id: u16) -> Result<&OpaqueRecord> {
        self.opaque
            .get(&(kind, id))
            .ok_or_else(|| IffError::not_found(kind, id))
    }

    /// True if some master object definition spans several tiles
    pub fn is_multi_tile(&self) -> bool {
        self.objects
            .iter()
            .any(|o| o.is_master() && o.is_multi_tile())
    }

    /// The master record of a multi-tile object, otherwise the first object
    pub fn master_object(&self) -> Option<&ObjectDefinition> {
        if self.is_multi_tile() {
            self.objects
                .iter()
                .find(|o| o.is_master() && o.is_multi_tile())
        } else {
            self.objects.first()
        }
    }

    /// Decode every sprite frame drawn for one drawing group image
    pub fn drawing_group_frames(
        &self,
        id: u16,
        direction: Direction,
        zoom: u32,
    ) -> Result<Vec<PlacedFrame>> {
        let image = self
            .drawing_group(id)?
            .image(direction, zoom)
            .ok_or_else(|| IffError::not_found(ChunkKind::Dgrp, id))?;

        image
            .sprites
            .iter()
            .map(|reference| {
                let frame = self
                    .sprite(reference.sprite_id as u16)?
                    .frame(reference.frame as usize)?;
                Ok(PlacedFrame {
                    reference: *reference,
                    frame,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_is_case_insensitive() {
        let mut data = MAGIC.to_ascii_lowercase();
        data.extend_from_slice(&[0; 4]);
        assert!(Iff::has_magic(&data));
        assert!(Iff::load(&data).is_ok());
    }

    #[test]
    fn bad_magic_strict_and_lenient() {
        let data = vec![b'X'; 80];
        assert!(matches!(
            Iff::load(&data),
            Err(IffError::InvalidContainer { .. })
        ));
        let lenient = LoadOptions::new().strict_magic(false);
        assert!(Iff::load_with(&data, &lenient).unwrap().is_none());
    }

    #[test]
    fn missing_resource_map_offset_is_truncated() {
        assert!(matches!(
            Iff::load(MAGIC),
            Err(IffError::Truncated { .. })
        ));
    }

    #[test]
    fn header_only_record_at_the_end_is_read() {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(b"XXXX");
        data.extend_from_slice(&(CHUNK_HEADER_SIZE as u32).to_be_bytes());
        data.extend_from_slice(&71u16.to_be_bytes());
        data.extend_from_slice(&[0; 66]);

        let iff = Iff::load(&data).unwrap();
        assert_eq!(iff.chunks().len(), 1);
        assert!(iff.opaque(ChunkKind::Filler, 71).unwrap().data.is_empty());

        data[FILE_HEADER_SIZE..FILE_HEADER_SIZE + 4].copy_from_slice(b"NOPE");
        assert!(matches!(
            Iff::load(&data),
            Err(IffError::UnknownChunkType { .. })
        ));
    }

    #[test]
    fn empty_container_has_no_master() {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&[0; 4]);
        let iff = Iff::load(&data).unwrap();
        assert!(iff.chunks().is_empty());
        assert!(!iff.is_multi_tile());
        assert!(iff.master_object().is_none());
        assert!(iff.palette(1).unwrap_err().is_not_found());
    }
}

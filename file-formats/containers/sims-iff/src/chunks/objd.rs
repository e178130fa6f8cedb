//! OBJD - object definition
//!
//! A 32-bit version is followed by a fixed-order list of 16-bit fields. How
//! many fields are present depends on the version; later versions only
//! append fields, so a field index means the same thing in every version.

use crate::error::Result;
use crate::reader::ByteCursor;

/// Field indices within the OBJD field list
pub mod field {
    pub const STACK_SIZE: usize = 0;
    pub const BASE_GRAPHIC_ID: usize = 1;
    pub const NUM_GRAPHICS: usize = 2;
    pub const BHAV_MAIN_ID: usize = 3;
    pub const BHAV_GARDENING_ID: usize = 4;
    pub const TREE_TABLE_ID: usize = 5;
    pub const INTERACTION_GROUP_ID: usize = 6;
    pub const OBJECT_TYPE: usize = 7;
    pub const MASTER_ID: usize = 8;
    pub const SUB_INDEX: usize = 9;
    pub const BHAV_WASH_HANDS_ID: usize = 10;
    pub const ANIMATION_TABLE_ID: usize = 11;
    pub const GUID_LOW: usize = 12;
    pub const GUID_HIGH: usize = 13;
    pub const DISABLED: usize = 14;
    pub const BHAV_PORTAL: usize = 15;
    pub const PRICE: usize = 16;
    pub const BODY_STRING_ID: usize = 17;
    pub const SLOT_ID: usize = 18;
    pub const BHAV_ALLOW_INTERSECTION_ID: usize = 19;
    pub const USES_FN_TABLE: usize = 20;
    pub const BIT_FIELD_1: usize = 21;
    pub const BHAV_PREPARE_FOOD_ID: usize = 22;
    pub const BHAV_COOK_FOOD_ID: usize = 23;
    pub const BHAV_PLACE_SURFACE_ID: usize = 24;
    pub const BHAV_DISPOSE_ID: usize = 25;
    pub const BHAV_EAT_ID: usize = 26;
    pub const BHAV_PICKUP_FROM_SLOT_ID: usize = 27;
    pub const BHAV_WASH_DISH_ID: usize = 28;
    pub const BHAV_EATING_SURFACE_ID: usize = 29;
    pub const BHAV_SIT_ID: usize = 30;
    pub const BHAV_STAND_ID: usize = 31;
    pub const SALE_PRICE: usize = 32;
    pub const INITIAL_DEPRECIATION: usize = 33;
    pub const DAILY_DEPRECIATION: usize = 34;
    pub const SELF_DEPRECIATING: usize = 35;
    pub const DEPRECIATION_LIMIT: usize = 36;
    pub const ROOM_FLAGS: usize = 37;
    pub const FUNCTION_FLAGS: usize = 38;
    pub const CATALOG_STRINGS_ID: usize = 39;
    pub const GLOBAL: usize = 40;
    pub const BHAV_INIT: usize = 41;
    pub const BHAV_PLACE: usize = 42;
    pub const BHAV_USER_PICKUP: usize = 43;
    pub const WALL_STYLE: usize = 44;
    pub const BHAV_LOAD: usize = 45;
    pub const BHAV_USER_PLACE: usize = 46;
    pub const OBJECT_VERSION: usize = 47;
    pub const BHAV_ROOM_CHANGE: usize = 48;
    pub const MOTIVE_EFFECTS_ID: usize = 49;
    pub const BHAV_CLEANUP: usize = 50;
    pub const BHAV_LEVEL_INFO: usize = 51;
    pub const CATALOG_ID: usize = 52;
    pub const BHAV_SERVING_SURFACE: usize = 53;
    pub const LEVEL_OFFSET: usize = 54;
    pub const SHADOW: usize = 55;
    pub const NUM_ATTRIBUTES: usize = 56;
    pub const BHAV_CLEAN: usize = 57;
    pub const BHAV_QUEUE_SKIPPED: usize = 58;
    pub const FRONT_DIRECTION: usize = 59;
    pub const BHAV_WALL_ADJACENCY_CHANGED: usize = 60;
    pub const MY_LEAD_OBJECT: usize = 61;
    pub const DYNAMIC_SPRITE_BASE_ID: usize = 62;
    pub const NUM_DYNAMIC_SPRITES: usize = 63;
    pub const CHAIR_ENTRY_FLAGS: usize = 64;
    pub const TILE_WIDTH: usize = 65;
    pub const INHIBIT_SUIT_COPYING: usize = 66;
    pub const BUILD_MODE_TYPE: usize = 67;
    pub const ORIGINAL_GUID_LOW: usize = 68;
    pub const ORIGINAL_GUID_HIGH: usize = 69;
    pub const SUIT_GUID_LOW: usize = 70;
    pub const SUIT_GUID_HIGH: usize = 71;
    pub const BHAV_PICKUP: usize = 72;
    pub const THUMBNAIL_GRAPHIC: usize = 73;
    pub const SHADOW_FLAGS: usize = 74;
    pub const FOOTPRINT_MASK: usize = 75;
    pub const BHAV_DYNAMIC_MULTI_TILE_UPDATE: usize = 76;
    pub const SHADOW_BRIGHTNESS: usize = 77;
    pub const BHAV_REPAIR: usize = 78;
    pub const WALL_STYLE_SPRITE_ID: usize = 79;
    pub const RATING_HUNGER: usize = 80;
    pub const RATING_COMFORT: usize = 81;
    pub const RATING_HYGIENE: usize = 82;
    pub const RATING_BLADDER: usize = 83;
    pub const RATING_ENERGY: usize = 84;
    pub const RATING_FUN: usize = 85;
    pub const RATING_ROOM: usize = 86;
    pub const RATING_SKILL_FLAGS: usize = 87;
    pub const NUM_TYPE_ATTRIBUTES: usize = 88;
    pub const MISC_FLAGS: usize = 89;
    pub const TYPE_ATTR_GUID_LOW: usize = 90;
    pub const TYPE_ATTR_GUID_HIGH: usize = 91;
    pub const FUNCTION_SUBSORT: usize = 92;
    pub const DOWNTOWN_SORT: usize = 93;
    pub const KEEP_BUYING: usize = 94;
    pub const VACATION_SORT: usize = 95;
    pub const RESET_LOT_ACTION: usize = 96;
    pub const COMMUNITY_SORT: usize = 97;
    pub const DREAM_FLAGS: usize = 98;
    pub const RENDER_FLAGS: usize = 99;
    pub const VITABOY_FLAGS: usize = 100;
    pub const STUDIOTOWN_SORT: usize = 101;
    pub const MAGICTOWN_SORT: usize = 102;
    pub const RESERVED_1: usize = 103;
    pub const RESERVED_2: usize = 104;
}

/// Field count for records that predate the motive ratings
pub const BASE_FIELD_COUNT: usize = 80;

/// Number of 16-bit fields stored for an OBJD version.
///
/// Unknown versions use the base layout; the caller logs them.
pub fn field_count_for_version(version: u32) -> Option<usize> {
    match version {
        136 => Some(BASE_FIELD_COUNT),
        138 => Some(95),
        139 => Some(96),
        140 | 141 => Some(97),
        142 => Some(105),
        _ => None,
    }
}

/// Motive ratings advertised by an object (present from 81 fields on)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotiveRatings {
    pub hunger: u16,
    pub comfort: u16,
    pub hygiene: u16,
    pub bladder: u16,
    pub energy: u16,
    pub fun: u16,
    pub room: u16,
    pub skill_flags: u16,
}

/// OBJD record
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectDefinition {
    /// Chunk id the record was stored under
    pub chunk_id: u16,
    /// Format version
    pub version: u32,
    fields: Vec<u16>,
}

impl ObjectDefinition {
    /// Build a record from raw field values
    pub fn from_fields(chunk_id: u16, version: u32, fields: Vec<u16>) -> Self {
        Self {
            chunk_id,
            version,
            fields,
        }
    }

    pub(crate) fn decode(chunk_id: u16, cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let version = cursor.read_u32()?;
        let count = field_count_for_version(version).unwrap_or_else(|| {
            log::warn!(
                "OBJD {chunk_id}: unknown version {version}, reading {BASE_FIELD_COUNT} fields"
            );
            BASE_FIELD_COUNT
        });

        let mut fields = Vec::with_capacity(count);
        for _ in 0..count {
            fields.push(cursor.read_u16()?);
        }

        Ok(Self {
            chunk_id,
            version,
            fields,
        })
    }

    /// Number of fields populated by this record's version
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Raw field by index
    pub fn field(&self, index: usize) -> Option<u16> {
        self.fields.get(index).copied()
    }

    /// All raw fields in on-disk order
    pub fn fields(&self) -> &[u16] {
        &self.fields
    }

    fn get(&self, index: usize) -> u16 {
        self.field(index).unwrap_or(0)
    }

    /// Id shared by all tiles of a multi-tile object, 0 for single-tile objects
    pub fn master_id(&self) -> u16 {
        self.get(field::MASTER_ID)
    }

    /// Position of this tile within a multi-tile object; -1 marks the master
    pub fn sub_index(&self) -> i16 {
        self.get(field::SUB_INDEX) as i16
    }

    /// True for the master record of a (possibly multi-tile) object
    pub fn is_master(&self) -> bool {
        self.sub_index() == -1
    }

    /// True if the record belongs to a multi-tile object
    pub fn is_multi_tile(&self) -> bool {
        self.master_id() != 0
    }

    /// 32-bit object GUID
    pub fn guid(&self) -> u32 {
        (self.get(field::GUID_HIGH) as u32) << 16 | self.get(field::GUID_LOW) as u32
    }

    pub fn stack_size(&self) -> u16 {
        self.get(field::STACK_SIZE)
    }

    /// First sprite/drawing group id used by the object
    pub fn base_graphic_id(&self) -> u16 {
        self.get(field::BASE_GRAPHIC_ID)
    }

    pub fn num_graphics(&self) -> u16 {
        self.get(field::NUM_GRAPHICS)
    }

    pub fn main_behavior_id(&self) -> u16 {
        self.get(field::BHAV_MAIN_ID)
    }

    pub fn tree_table_id(&self) -> u16 {
        self.get(field::TREE_TABLE_ID)
    }

    pub fn object_type(&self) -> u16 {
        self.get(field::OBJECT_TYPE)
    }

    pub fn animation_table_id(&self) -> u16 {
        self.get(field::ANIMATION_TABLE_ID)
    }

    pub fn price(&self) -> u16 {
        self.get(field::PRICE)
    }

    pub fn sale_price(&self) -> u16 {
        self.get(field::SALE_PRICE)
    }

    pub fn body_string_id(&self) -> u16 {
        self.get(field::BODY_STRING_ID)
    }

    pub fn slot_id(&self) -> u16 {
        self.get(field::SLOT_ID)
    }

    pub fn catalog_strings_id(&self) -> u16 {
        self.get(field::CATALOG_STRINGS_ID)
    }

    pub fn room_flags(&self) -> u16 {
        self.get(field::ROOM_FLAGS)
    }

    pub fn function_flags(&self) -> u16 {
        self.get(field::FUNCTION_FLAGS)
    }

    pub fn my_lead_object(&self) -> u16 {
        self.get(field::MY_LEAD_OBJECT)
    }

    pub fn tile_width(&self) -> u16 {
        self.get(field::TILE_WIDTH)
    }

    /// Motive ratings, `None` when the version stores fewer than 81 fields
    pub fn ratings(&self) -> Option<MotiveRatings> {
        if self.fields.len() <= field::RATING_HUNGER {
            return None;
        }
        Some(MotiveRatings {
            hunger: self.get(field::RATING_HUNGER),
            comfort: self.get(field::RATING_COMFORT),
            hygiene: self.get(field::RATING_HYGIENE),
            bladder: self.get(field::RATING_BLADDER),
            energy: self.get(field::RATING_ENERGY),
            fun: self.get(field::RATING_FUN),
            room: self.get(field::RATING_ROOM),
            skill_flags: self.get(field::RATING_SKILL_FLAGS),
        })
    }
}

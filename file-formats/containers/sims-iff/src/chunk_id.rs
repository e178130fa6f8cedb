//! Closed set of chunk kinds recognised in an IFF container.
//!
//! Tags are stored on disk as four bytes padded with `#` (for example
//! `SPR#` and `STR#`) or NUL. The padding is trimmed before matching, so the
//! kinds below are keyed by their trimmed spelling.
//!
//! ```rust
//! use sims_iff::ChunkKind;
//!
//! assert_eq!(ChunkKind::from_tag("SPR"), Some(ChunkKind::Spr));
//! assert_eq!(ChunkKind::Spr.as_tag(), "SPR");
//! assert_eq!(ChunkKind::from_tag("NOPE"), None);
//! ```

use std::fmt;

/// Kind of a chunk, decided by its 4-character tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChunkKind {
    /// `BMP_` - embedded Windows bitmap
    Bmp,
    /// `FBMP` - embedded bitmap, alternative container
    Fbmp,
    /// `FWAV` - sound event name
    Fwav,
    /// `BCON` - behavior constants
    Bcon,
    /// `DGRP` - drawing group
    Dgrp,
    /// `OBJD` - object definition
    Objd,
    /// `BHAV` - behavior script (kept opaque)
    Bhav,
    /// `CST` - catalog strings
    Cst,
    /// `CTSS` - catalog text strings
    Ctss,
    /// `GLOB` - semi-global file reference
    Glob,
    /// `FCNS` - simulator constants
    Fcns,
    /// `TTAs` - pie menu strings
    TtaStrings,
    /// `TTAB` - interaction tree table
    Ttab,
    /// `TPRP` - tree parameter labels
    Tprp,
    /// `STR` - generic string table
    Str,
    /// `OBJf` - object function table
    Objf,
    /// `SLOT` - routing slots
    Slot,
    /// `SPR` - legacy paletted sprite
    Spr,
    /// `SPR2` - paletted sprite with depth and alpha channels
    Spr2,
    /// `PALT` - palette
    Palt,
    /// `XXXX` - filler chunk
    Filler,
    /// `rsmp` - resource map
    ResourceMap,
}

impl ChunkKind {
    /// Every known kind, in tag order of the format documentation
    pub const ALL: [Self; 22] = [
        Self::Bmp,
        Self::Fbmp,
        Self::Fwav,
        Self::Bcon,
        Self::Dgrp,
        Self::Objd,
        Self::Bhav,
        Self::Cst,
        Self::Ctss,
        Self::Glob,
        Self::Fcns,
        Self::TtaStrings,
        Self::Ttab,
        Self::Tprp,
        Self::Str,
        Self::Objf,
        Self::Slot,
        Self::Spr,
        Self::Spr2,
        Self::Palt,
        Self::Filler,
        Self::ResourceMap,
    ];

    /// Match a trimmed tag exactly (case-sensitive: `TTAs` and `TTAB` differ)
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "BMP_" => Self::Bmp,
            "FBMP" => Self::Fbmp,
            "FWAV" => Self::Fwav,
            "BCON" => Self::Bcon,
            "DGRP" => Self::Dgrp,
            "OBJD" => Self::Objd,
            "BHAV" => Self::Bhav,
            "CST" => Self::Cst,
            "CTSS" => Self::Ctss,
            "GLOB" => Self::Glob,
            "FCNS" => Self::Fcns,
            "TTAs" => Self::TtaStrings,
            "TTAB" => Self::Ttab,
            "TPRP" => Self::Tprp,
            "STR" => Self::Str,
            "OBJf" => Self::Objf,
            "SLOT" => Self::Slot,
            "SPR" => Self::Spr,
            "SPR2" => Self::Spr2,
            "PALT" => Self::Palt,
            "XXXX" => Self::Filler,
            "rsmp" => Self::ResourceMap,
            _ => return None,
        })
    }

    /// Trimmed tag spelling
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Bmp => "BMP_",
            Self::Fbmp => "FBMP",
            Self::Fwav => "FWAV",
            Self::Bcon => "BCON",
            Self::Dgrp => "DGRP",
            Self::Objd => "OBJD",
            Self::Bhav => "BHAV",
            Self::Cst => "CST",
            Self::Ctss => "CTSS",
            Self::Glob => "GLOB",
            Self::Fcns => "FCNS",
            Self::TtaStrings => "TTAs",
            Self::Ttab => "TTAB",
            Self::Tprp => "TPRP",
            Self::Str => "STR",
            Self::Objf => "OBJf",
            Self::Slot => "SLOT",
            Self::Spr => "SPR",
            Self::Spr2 => "SPR2",
            Self::Palt => "PALT",
            Self::Filler => "XXXX",
            Self::ResourceMap => "rsmp",
        }
    }

    /// True for the four kinds sharing the string table layout
    pub fn is_string_table(&self) -> bool {
        matches!(
            self,
            Self::Str | Self::Cst | Self::Ctss | Self::TtaStrings
        )
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Strip the `#` and NUL padding from a raw 4-byte tag
pub fn trim_tag(raw: &[u8; 4]) -> String {
    String::from_utf8_lossy(raw)
        .trim_matches(|c| c == '#' || c == '\0')
        .to_string()
}

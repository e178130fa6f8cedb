//! String table records (STR, CST, CTSS, TTAs)
//!
//! All four kinds share one layout, selected by a signed 16-bit format code:
//!
//! | Code | Count | Entry layout                                             |
//! |------|-------|----------------------------------------------------------|
//! |  0   | u16   | 8-bit length-prefixed value                              |
//! | -1   | u16   | NUL-terminated value                                     |
//! | -2   | u16   | NUL-terminated value + comment                           |
//! | -3   | u16   | u8 language, NUL-terminated value + comment              |
//! | -4   | u8 sets, then u16 per set | u8 language, var-length value + comment |
//!
//! Formats without a language byte store everything under
//! [`DEFAULT_LANGUAGE`]. Stored language bytes are zero-based; codes exposed
//! here are the stored value plus one.

use std::collections::BTreeMap;

use crate::chunk_id::ChunkKind;
use crate::error::Result;
use crate::reader::ByteCursor;

/// Language code used by formats that carry no language byte (US English)
pub const DEFAULT_LANGUAGE: u8 = 1;

/// One translated string and its designer comment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringEntry {
    /// Displayed text
    pub value: String,
    /// Designer comment, empty when the format has none
    pub comment: String,
}

impl StringEntry {
    fn new(value: String, comment: String) -> Self {
        Self { value, comment }
    }
}

/// On-disk layout of a string table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringTableFormat {
    /// Code 0
    Pascal,
    /// Code -1
    NullTerminated,
    /// Code -2
    NullTerminatedPairs,
    /// Code -3
    LanguageTagged,
    /// Code -4
    LanguageSets,
    /// Any other code; the table is left empty
    Unknown(i16),
}

impl From<i16> for StringTableFormat {
    fn from(code: i16) -> Self {
        match code {
            0 => Self::Pascal,
            -1 => Self::NullTerminated,
            -2 => Self::NullTerminatedPairs,
            -3 => Self::LanguageTagged,
            -4 => Self::LanguageSets,
            other => Self::Unknown(other),
        }
    }
}

/// Language code to ordered strings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringTable {
    /// Which of the four string kinds this record was stored as
    pub kind: ChunkKind,
    /// Layout the record used on disk
    pub format: StringTableFormat,
    languages: BTreeMap<u8, Vec<StringEntry>>,
}

impl StringTable {
    pub(crate) fn decode(kind: ChunkKind, cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let code = cursor.read_i16()?;
        let format = StringTableFormat::from(code);
        let mut table = Self {
            kind,
            format,
            languages: BTreeMap::new(),
        };

        match format {
            StringTableFormat::Pascal => {
                let count = cursor.read_u16()?;
                for _ in 0..count {
                    let value = cursor.read_pascal_string()?;
                    table.push(DEFAULT_LANGUAGE, StringEntry::new(value, String::new()));
                }
            }
            StringTableFormat::NullTerminated => {
                let count = cursor.read_u16()?;
                for _ in 0..count {
                    let value = cursor.read_null_terminated_string()?;
                    table.push(DEFAULT_LANGUAGE, StringEntry::new(value, String::new()));
                }
            }
            StringTableFormat::NullTerminatedPairs => {
                let count = cursor.read_u16()?;
                for _ in 0..count {
                    let value = cursor.read_null_terminated_string()?;
                    let comment = cursor.read_null_terminated_string()?;
                    table.push(DEFAULT_LANGUAGE, StringEntry::new(value, comment));
                }
            }
            StringTableFormat::LanguageTagged => {
                let count = cursor.read_u16()?;
                for _ in 0..count {
                    let language = cursor.read_u8()?.wrapping_add(1);
                    let value = cursor.read_null_terminated_string()?;
                    let comment = cursor.read_null_terminated_string()?;
                    table.push(language, StringEntry::new(value, comment));
                }
            }
            StringTableFormat::LanguageSets => {
                let sets = cursor.read_u8()?;
                for _ in 0..sets {
                    let count = cursor.read_u16()?;
                    for _ in 0..count {
                        let language = cursor.read_u8()?.wrapping_add(1);
                        let value = cursor.read_var_len_string()?;
                        let comment = cursor.read_var_len_string()?;
                        table.push(language, StringEntry::new(value, comment));
                    }
                }
            }
            StringTableFormat::Unknown(code) => {
                log::warn!("{kind} string table with unknown format code {code}, left empty");
            }
        }

        Ok(table)
    }

    fn push(&mut self, language: u8, entry: StringEntry) {
        self.languages.entry(language).or_default().push(entry);
    }

    /// String `index` for `language`
    pub fn get(&self, language: u8, index: usize) -> Option<&str> {
        self.entry(language, index).map(|e| e.value.as_str())
    }

    /// Comment paired with string `index` for `language`
    pub fn comment(&self, language: u8, index: usize) -> Option<&str> {
        self.entry(language, index).map(|e| e.comment.as_str())
    }

    /// Full entry `index` for `language`
    pub fn entry(&self, language: u8, index: usize) -> Option<&StringEntry> {
        self.languages.get(&language)?.get(index)
    }

    /// All entries for `language`, in stored order
    pub fn strings(&self, language: u8) -> &[StringEntry] {
        self.languages.get(&language).map_or(&[], Vec::as_slice)
    }

    /// Language codes present, ascending
    pub fn languages(&self) -> impl Iterator<Item = u8> + '_ {
        self.languages.keys().copied()
    }

    /// Total number of entries across all languages
    pub fn len(&self) -> usize {
        self.languages.values().map(Vec::len).sum()
    }

    /// True if no language holds any entry
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

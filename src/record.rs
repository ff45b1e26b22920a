//! Variation records: the engine's input.
//!
//! A [`VariationRecord`] names one IVS (base codepoint + selector) and the
//! external glyph that should be shown for it. Records are validated on
//! construction and immutable afterwards.
//!
//! Upstream character tables (the MJ character information tables) write
//! sequences as `845B_E0100` and base characters as `U+845B`; both notations
//! are parsed here.

use crate::codec::MAX_CODEPOINT;
use crate::error::{Error, Result};
use crate::key::SequenceKey;
use crate::selector::Selector;
use regex::Regex;
use serde::Deserialize;

/// One (base codepoint, selector, glyph id) triple.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RecordSource")]
pub struct VariationRecord {
    base_codepoint: u32,
    selector: Selector,
    glyph_id: String,
}

impl VariationRecord {
    /// Create a record.
    ///
    /// Fails with [`Error::InvalidSelectorIndex`] if `selector_index > 239` and
    /// with [`Error::InvalidCodepoint`] if the base is not a Unicode scalar value.
    pub fn new(base_codepoint: u32, selector_index: u32, glyph_id: impl Into<String>) -> Result<Self> {
        let selector = Selector::from_index(selector_index)?;
        Self::with_selector(base_codepoint, selector, glyph_id)
    }

    /// Create a record from an already validated selector.
    pub fn with_selector(
        base_codepoint: u32,
        selector: Selector,
        glyph_id: impl Into<String>,
    ) -> Result<Self> {
        if base_codepoint > MAX_CODEPOINT || (0xD800..=0xDFFF).contains(&base_codepoint) {
            return Err(Error::InvalidCodepoint(base_codepoint));
        }
        Ok(Self {
            base_codepoint,
            selector,
            glyph_id: glyph_id.into(),
        })
    }

    /// Create a record from `XXXX_E01XX` notation.
    ///
    /// MJ glyph names are stored lower-case in the source font, so the glyph id
    /// is lower-cased.
    ///
    /// # Examples
    ///
    /// ```
    /// use ivs_oxide::record::VariationRecord;
    ///
    /// let record = VariationRecord::from_notation("845B_E0102", "MJ000123").unwrap();
    /// assert_eq!(record.base_codepoint(), 0x845B);
    /// assert_eq!(record.selector().name(), "VS19");
    /// assert_eq!(record.glyph_id(), "mj000123");
    /// ```
    pub fn from_notation(notation: &str, glyph_id: &str) -> Result<Self> {
        let (base_codepoint, selector) = parse_ivs_notation(notation)?;
        Self::with_selector(base_codepoint, selector, glyph_id.to_lowercase())
    }

    /// Base ideograph codepoint.
    pub fn base_codepoint(&self) -> u32 {
        self.base_codepoint
    }

    /// Variation selector.
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Selector index (0 for VS17).
    pub fn selector_index(&self) -> u8 {
        self.selector.index()
    }

    /// External glyph identifier.
    pub fn glyph_id(&self) -> &str {
        &self.glyph_id
    }

    /// Uniqueness key of the record.
    pub fn pair(&self) -> (u32, u8) {
        (self.base_codepoint, self.selector.index())
    }

    /// Sequence key of the record.
    pub fn sequence_key(&self) -> Result<SequenceKey> {
        SequenceKey::new(self.base_codepoint, self.selector)
    }
}

/// Serialized forms accepted for a record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordSource {
    Fields {
        base_codepoint: u32,
        selector_index: u32,
        glyph_id: String,
    },
    Notation {
        ivs: String,
        glyph_id: String,
    },
}

impl TryFrom<RecordSource> for VariationRecord {
    type Error = Error;

    fn try_from(source: RecordSource) -> Result<Self> {
        match source {
            RecordSource::Fields {
                base_codepoint,
                selector_index,
                glyph_id,
            } => VariationRecord::new(base_codepoint, selector_index, glyph_id),
            RecordSource::Notation { ivs, glyph_id } => {
                VariationRecord::from_notation(&ivs, &glyph_id)
            },
        }
    }
}

/// Parse a `U+XXXX` codepoint label.
///
/// # Examples
///
/// ```
/// use ivs_oxide::record::parse_codepoint_label;
///
/// assert_eq!(parse_codepoint_label("U+4E08").unwrap(), 0x4E08);
/// assert_eq!(parse_codepoint_label("U+20B9F").unwrap(), 0x20B9F);
/// assert!(parse_codepoint_label("4E08").is_err());
/// ```
pub fn parse_codepoint_label(label: &str) -> Result<u32> {
    lazy_static::lazy_static! {
        static ref RE: Regex = Regex::new(r"^U\+([0-9A-Fa-f]{4,6})$").unwrap();
    }

    let caps = RE
        .captures(label.trim())
        .ok_or_else(|| Error::InvalidNotation(label.to_string()))?;
    let codepoint =
        u32::from_str_radix(&caps[1], 16).map_err(|_| Error::InvalidNotation(label.to_string()))?;
    if codepoint > MAX_CODEPOINT {
        return Err(Error::OutOfRange(codepoint));
    }
    Ok(codepoint)
}

/// Parse `XXXX_E01XX` IVS notation into a base codepoint and selector.
///
/// The selector half must lie in the VS17..=VS256 block (`E0100`..=`E01EF`).
pub fn parse_ivs_notation(notation: &str) -> Result<(u32, Selector)> {
    lazy_static::lazy_static! {
        static ref RE: Regex = Regex::new(r"^([0-9A-Fa-f]{4,6})_([0-9A-Fa-f]{5})$").unwrap();
    }

    let invalid = || Error::InvalidNotation(notation.to_string());
    let caps = RE.captures(notation.trim()).ok_or_else(invalid)?;

    let base = u32::from_str_radix(&caps[1], 16).map_err(|_| invalid())?;
    let selector_scalar = u32::from_str_radix(&caps[2], 16).map_err(|_| invalid())?;
    let selector = Selector::from_scalar(selector_scalar)?;
    Ok((base, selector))
}

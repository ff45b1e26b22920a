//! Sequence keys for Ideographic Variation Sequences.
//!
//! A [`SequenceKey`] is the UTF-16 form of `base + selector`: the base
//! character (one code unit or a surrogate pair) followed by the surrogate
//! pair of the variation selector. It is the primary key of both allocation
//! output maps and matches what a UTF-16 string search sees in running text.

use crate::codec::{self, CodeUnits};
use crate::error::{Error, Result};
use crate::selector::Selector;
use serde::{Serialize, Serializer};
use std::fmt;

/// Build the canonical key for `(base_codepoint, selector_index)`.
///
/// Equal pairs always produce equal keys and distinct pairs always produce
/// distinct keys.
///
/// # Examples
///
/// ```
/// use ivs_oxide::key::build_key;
///
/// let key = build_key(0x845B, 0).unwrap();
/// assert_eq!(key.units(), &[0x845B, 0xDB40, 0xDD00]);
/// assert_eq!(key.to_string(), "\u{845B}\u{E0100}");
/// ```
pub fn build_key(base_codepoint: u32, selector_index: u32) -> Result<SequenceKey> {
    let selector = Selector::from_index(selector_index)?;
    SequenceKey::new(base_codepoint, selector)
}

/// UTF-16 key of one IVS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceKey {
    units: Vec<u16>,
}

impl SequenceKey {
    /// Build the key for a base codepoint and a selector.
    pub fn new(base_codepoint: u32, selector: Selector) -> Result<Self> {
        let base = codec::render_scalar(base_codepoint)?;
        let (high, low) = codec::encode_surrogate_pair(selector.scalar())?;

        let mut units = Vec::with_capacity(base.len() + 2);
        base.push_to(&mut units);
        CodeUnits::Pair(high, low).push_to(&mut units);
        Ok(Self { units })
    }

    /// The raw UTF-16 code units.
    pub fn units(&self) -> &[u16] {
        &self.units
    }

    /// Decode the key back into its base codepoint and selector.
    pub fn components(&self) -> Result<(u32, Selector)> {
        let (base_units, vs_units) = match self.units.len() {
            3 | 4 => self.units.split_at(self.units.len() - 2),
            _ => return Err(Error::InvalidNotation(self.js_escape())),
        };

        let vs_scalar = codec::decode_surrogate_pair(vs_units[0], vs_units[1])?;
        let selector = Selector::from_scalar(vs_scalar)?;
        let base = match *base_units {
            [unit] => unit as u32,
            [high, low] => codec::decode_surrogate_pair(high, low)?,
            _ => return Err(Error::InvalidNotation(self.js_escape())),
        };
        Ok((base, selector))
    }

    /// JavaScript escape form, e.g. `\u845B\uDB40\uDD00`.
    pub fn js_escape(&self) -> String {
        self.units.iter().map(|u| format!("\\u{:04X}", u)).collect()
    }

    /// Comma separated codepoint labels, e.g. `U+845B,U+E0100`.
    pub fn describe(&self) -> String {
        match self.components() {
            Ok((base, selector)) => format!(
                "{},{}",
                codec::format_codepoint(base),
                codec::format_codepoint(selector.scalar())
            ),
            Err(_) => self.js_escape(),
        }
    }
}

impl fmt::Display for SequenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in char::decode_utf16(self.units.iter().copied()) {
            write!(f, "{}", ch.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl Serialize for SequenceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

//! UTF-16 codepoint codec.
//!
//! Conversions between Unicode scalar values and their UTF-16 code unit form.
//! Sequence keys are built from code units rather than Rust `char`s because
//! the downstream consumers (JavaScript mapping tables, font tooling) index
//! them as UTF-16 strings.
//!
//! All functions are pure integer arithmetic.

use crate::error::{Error, Result};
use std::fmt;

/// Highest valid Unicode codepoint.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Highest codepoint representable as a single UTF-16 code unit.
pub const MAX_BMP_CODEPOINT: u32 = 0xFFFF;

const SURROGATE_OFFSET: u32 = 0x10000;
const HIGH_SURROGATE_START: u16 = 0xD800;
const HIGH_SURROGATE_END: u16 = 0xDBFF;
const LOW_SURROGATE_START: u16 = 0xDC00;
const LOW_SURROGATE_END: u16 = 0xDFFF;

/// Returns true if `unit` is a leading (high) surrogate.
#[inline]
pub fn is_high_surrogate(unit: u16) -> bool {
    (HIGH_SURROGATE_START..=HIGH_SURROGATE_END).contains(&unit)
}

/// Returns true if `unit` is a trailing (low) surrogate.
#[inline]
pub fn is_low_surrogate(unit: u16) -> bool {
    (LOW_SURROGATE_START..=LOW_SURROGATE_END).contains(&unit)
}

/// Encode a supplementary-plane codepoint as a UTF-16 surrogate pair.
///
/// Only codepoints in `0x10000..=0x10FFFF` have a surrogate form; anything
/// else fails with [`Error::OutOfRange`].
///
/// # Examples
///
/// ```
/// use ivs_oxide::codec::encode_surrogate_pair;
///
/// // VS17 (U+E0100)
/// assert_eq!(encode_surrogate_pair(0xE0100).unwrap(), (0xDB40, 0xDD00));
/// assert!(encode_surrogate_pair(0xFFFF).is_err());
/// ```
pub fn encode_surrogate_pair(codepoint: u32) -> Result<(u16, u16)> {
    if codepoint <= MAX_BMP_CODEPOINT || codepoint > MAX_CODEPOINT {
        return Err(Error::OutOfRange(codepoint));
    }

    let adjusted = codepoint - SURROGATE_OFFSET;
    let high = ((adjusted >> 10) + HIGH_SURROGATE_START as u32) as u16;
    let low = ((adjusted & 0x3FF) + LOW_SURROGATE_START as u32) as u16;
    Ok((high, low))
}

/// Decode a UTF-16 surrogate pair back to its scalar codepoint.
///
/// Fails with [`Error::InvalidSurrogate`] unless `high` is in `0xD800..=0xDBFF`
/// and `low` is in `0xDC00..=0xDFFF`.
///
/// # Examples
///
/// ```
/// use ivs_oxide::codec::decode_surrogate_pair;
///
/// assert_eq!(decode_surrogate_pair(0xDB40, 0xDD00).unwrap(), 0xE0100);
/// assert!(decode_surrogate_pair(0xDD00, 0xDB40).is_err());
/// ```
pub fn decode_surrogate_pair(high: u16, low: u16) -> Result<u32> {
    if !is_high_surrogate(high) || !is_low_surrogate(low) {
        return Err(Error::InvalidSurrogate { high, low });
    }

    let high_bits = ((high - HIGH_SURROGATE_START) as u32) << 10;
    let low_bits = (low - LOW_SURROGATE_START) as u32;
    Ok(high_bits + low_bits + SURROGATE_OFFSET)
}

/// Render a codepoint in its minimal UTF-16 form.
///
/// Codepoints up to U+FFFF become a single code unit, everything above
/// becomes a surrogate pair. Fails with [`Error::OutOfRange`] above U+10FFFF.
pub fn render_scalar(codepoint: u32) -> Result<CodeUnits> {
    if codepoint <= MAX_BMP_CODEPOINT {
        Ok(CodeUnits::Single(codepoint as u16))
    } else {
        let (high, low) = encode_surrogate_pair(codepoint)?;
        Ok(CodeUnits::Pair(high, low))
    }
}

/// Format a codepoint as a `U+XXXX` label (at least four hex digits).
pub fn format_codepoint(codepoint: u32) -> String {
    format!("U+{:04X}", codepoint)
}

/// The UTF-16 form of one codepoint: one code unit or a surrogate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeUnits {
    /// A Basic Multilingual Plane code unit
    Single(u16),
    /// High and low surrogate
    Pair(u16, u16),
}

impl CodeUnits {
    /// Build the pair form from two code units, checking that they really are
    /// a high and a low surrogate.
    pub fn from_pair(high: u16, low: u16) -> Result<Self> {
        decode_surrogate_pair(high, low)?;
        Ok(CodeUnits::Pair(high, low))
    }

    /// Number of UTF-16 code units (1 or 2).
    pub fn len(&self) -> usize {
        match self {
            CodeUnits::Single(_) => 1,
            CodeUnits::Pair(..) => 2,
        }
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append the code units to a UTF-16 buffer.
    pub fn push_to(&self, buffer: &mut Vec<u16>) {
        match *self {
            CodeUnits::Single(unit) => buffer.push(unit),
            CodeUnits::Pair(high, low) => {
                buffer.push(high);
                buffer.push(low);
            },
        }
    }

    /// The scalar codepoint these code units encode.
    ///
    /// A lone surrogate in `Single` form is returned as-is. A `Pair` that is
    /// not a high/low surrogate pair fails with [`Error::InvalidSurrogate`].
    pub fn scalar(&self) -> Result<u32> {
        match *self {
            CodeUnits::Single(unit) => Ok(unit as u32),
            CodeUnits::Pair(high, low) => decode_surrogate_pair(high, low),
        }
    }

    /// JavaScript string-literal escapes, e.g. `\uDB40\uDD00`.
    pub fn js_escape(&self) -> String {
        match *self {
            CodeUnits::Single(unit) => format!("\\u{:04X}", unit),
            CodeUnits::Pair(high, low) => format!("\\u{:04X}\\u{:04X}", high, low),
        }
    }
}

impl fmt::Display for CodeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = self
            .scalar()
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        write!(f, "{}", ch)
    }
}

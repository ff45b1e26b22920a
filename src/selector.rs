//! Ideographic variation selectors (VS17..=VS256).
//!
//! Selectors are identified by their index, the offset from U+E0100. The
//! published names count from VS17, so index 0 is `VS17` and index 239 is
//! `VS256`. Group names throughout the crate use this `VSnn` form.

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Scalar value of VS17, the first ideographic variation selector.
pub const VARIATION_SELECTOR_BASE: u32 = 0xE0100;

/// Scalar value of VS256, the last ideographic variation selector.
pub const VARIATION_SELECTOR_LAST: u32 = 0xE01EF;

/// Largest valid selector index (VS256).
pub const MAX_SELECTOR_INDEX: u8 = 239;

/// Selector number of index 0.
pub const FIRST_SELECTOR_NUMBER: u16 = 17;

/// Order in which selector groups are allocated.
///
/// This is a fixed policy: VS19 and VS18 are the most frequent selectors in
/// the MJ character set and get the BMP range first, VS20 is the boundary
/// group that is split between BMP and SMP. Reordering it changes every
/// previously generated mapping.
pub const PRIORITY_ORDER: [Selector; 16] = [
    Selector::numbered(19),
    Selector::numbered(18),
    Selector::numbered(20),
    Selector::numbered(17),
    Selector::numbered(21),
    Selector::numbered(22),
    Selector::numbered(23),
    Selector::numbered(24),
    Selector::numbered(25),
    Selector::numbered(26),
    Selector::numbered(27),
    Selector::numbered(28),
    Selector::numbered(29),
    Selector::numbered(30),
    Selector::numbered(31),
    Selector::numbered(32),
];

/// One ideographic variation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(u8);

impl Selector {
    /// VS17 (U+E0100)
    pub const VS17: Selector = Selector::numbered(17);
    /// VS18 (U+E0101)
    pub const VS18: Selector = Selector::numbered(18);
    /// VS19 (U+E0102)
    pub const VS19: Selector = Selector::numbered(19);
    /// VS20 (U+E0103)
    pub const VS20: Selector = Selector::numbered(20);

    // Only called with literals in 17..=256.
    const fn numbered(number: u16) -> Selector {
        Selector((number - FIRST_SELECTOR_NUMBER) as u8)
    }

    /// Selector from its index (offset from U+E0100).
    pub fn from_index(index: u32) -> Result<Self> {
        if index > MAX_SELECTOR_INDEX as u32 {
            return Err(Error::InvalidSelectorIndex(index));
        }
        Ok(Selector(index as u8))
    }

    /// Selector from its published number (17 for VS17).
    pub fn from_number(number: u32) -> Result<Self> {
        let first = FIRST_SELECTOR_NUMBER as u32;
        match number.checked_sub(first) {
            Some(index) => Self::from_index(index),
            // Report the index the caller effectively asked for.
            None => Err(Error::InvalidSelectorIndex(number.wrapping_sub(first))),
        }
    }

    /// Selector from its scalar value (U+E0100..=U+E01EF).
    pub fn from_scalar(scalar: u32) -> Result<Self> {
        if !(VARIATION_SELECTOR_BASE..=VARIATION_SELECTOR_LAST).contains(&scalar) {
            return Err(Error::InvalidSelectorIndex(
                scalar.wrapping_sub(VARIATION_SELECTOR_BASE),
            ));
        }
        Ok(Selector((scalar - VARIATION_SELECTOR_BASE) as u8))
    }

    /// Index of the selector (0 for VS17).
    pub fn index(self) -> u8 {
        self.0
    }

    /// Published selector number (17 for VS17).
    pub fn number(self) -> u16 {
        self.0 as u16 + FIRST_SELECTOR_NUMBER
    }

    /// Scalar codepoint of the selector.
    pub fn scalar(self) -> u32 {
        VARIATION_SELECTOR_BASE + self.0 as u32
    }

    /// Group name, e.g. `"VS19"`.
    pub fn name(self) -> String {
        self.to_string()
    }

    /// Position in [`PRIORITY_ORDER`], or `None` for selectors the table does not list.
    pub fn priority(self) -> Option<usize> {
        PRIORITY_ORDER.iter().position(|s| *s == self)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VS{}", self.number())
    }
}

impl FromStr for Selector {
    type Err = Error;

    /// Parse a `VSnn` group name.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("VS")
            .ok_or_else(|| Error::InvalidNotation(s.to_string()))?;
        let number: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidNotation(s.to_string()))?;
        Self::from_number(number)
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

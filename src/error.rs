//! Error types for the IVS allocation library.
//!
//! This module defines all error types that can occur while building sequence
//! keys, grouping variation records and allocating Private Use Area codepoints.

/// Result type alias for IVS library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during IVS allocation.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// Selector index outside 0..=239 (VS17..=VS256)
    #[error("Invalid variation selector index: {0} (expected 0..=239, VS17..=VS256)")]
    InvalidSelectorIndex(u32),

    /// Codepoint outside the domain of the requested conversion
    #[error("Codepoint out of range: U+{0:04X}")]
    OutOfRange(u32),

    /// Code units do not form a high/low surrogate pair
    #[error("Invalid surrogate pair: 0x{high:04X} 0x{low:04X}")]
    InvalidSurrogate {
        /// Leading code unit
        high: u16,
        /// Trailing code unit
        low: u16,
    },

    /// Base codepoint is not a Unicode scalar value
    #[error("Invalid base codepoint: U+{0:04X} is not a Unicode scalar value")]
    InvalidCodepoint(u32),

    /// A range ran out of codepoints and the current group has no fallback
    #[error("PUA capacity exhausted: {range} range is full while allocating {group}")]
    CapacityExhausted {
        /// Name of the exhausted range ("BMP" or "SMP")
        range: String,
        /// Name of the group being allocated (e.g. "VS17")
        group: String,
    },

    /// Same (base, selector) pair seen twice under the reject policy
    #[error("Duplicate variation sequence: U+{base_codepoint:04X} with selector index {selector_index}")]
    DuplicateRecord {
        /// Base codepoint of the repeated sequence
        base_codepoint: u32,
        /// Selector index of the repeated sequence
        selector_index: u8,
    },

    /// Malformed codepoint label or IVS notation
    #[error("Invalid IVS notation: '{0}'")]
    InvalidNotation(String),

    /// Custom allocation range with start after end or outside the Unicode range
    #[error("Invalid allocation range: 0x{start:X}-0x{end:X}")]
    InvalidRange {
        /// First codepoint of the range
        start: u32,
        /// Last codepoint of the range (inclusive)
        end: u32,
    },

    /// Configured BMP and SMP ranges share codepoints
    #[error(
        "Allocation ranges overlap: BMP 0x{bmp_start:X}-0x{bmp_end:X}, SMP 0x{smp_start:X}-0x{smp_end:X}"
    )]
    OverlappingRanges {
        /// First codepoint of the BMP range
        bmp_start: u32,
        /// Last codepoint of the BMP range
        bmp_end: u32,
        /// First codepoint of the SMP range
        smp_start: u32,
        /// Last codepoint of the SMP range
        smp_end: u32,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

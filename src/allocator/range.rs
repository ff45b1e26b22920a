//! Capacity-bounded codepoint ranges.

use crate::codec::MAX_CODEPOINT;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// BMP Private Use Area, U+E000..=U+F8FF (6,400 codepoints).
pub const BMP_PUA: RangeBounds = RangeBounds {
    start: 0xE000,
    end: 0xF8FF,
};

/// Supplementary Private Use Area-A (plane 15), U+F0000..=U+FFFFD (65,534 codepoints).
pub const SMP_PUA: RangeBounds = RangeBounds {
    start: 0xF0000,
    end: 0xFFFFD,
};

/// Inclusive codepoint interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeBounds {
    /// First codepoint
    pub start: u32,
    /// Last codepoint (inclusive)
    pub end: u32,
}

impl RangeBounds {
    /// Create a range, checking `start <= end <= U+10FFFF`.
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start > end || end > MAX_CODEPOINT {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of codepoints in the range.
    pub fn capacity(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// True if `codepoint` lies in the range.
    pub fn contains(&self, codepoint: u32) -> bool {
        (self.start..=self.end).contains(&codepoint)
    }

    /// True if both ranges share at least one codepoint.
    pub fn overlaps(&self, other: &RangeBounds) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for RangeBounds {
    /// `0xE000-0xF8FF`; four digits in the BMP, five above.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = if self.end > 0xFFFF { 5 } else { 4 };
        write!(f, "0x{:0w$X}-0x{:0w$X}", self.start, self.end, w = width)
    }
}

/// Which of the two ranges an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RangeName {
    /// Basic Multilingual Plane range
    #[serde(rename = "BMP")]
    Bmp,
    /// Supplementary plane range
    #[serde(rename = "SMP")]
    Smp,
}

impl RangeName {
    /// `"BMP"` or `"SMP"`.
    pub fn as_str(self) -> &'static str {
        match self {
            RangeName::Bmp => "BMP",
            RangeName::Smp => "SMP",
        }
    }
}

impl fmt::Display for RangeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A range with a cursor pointing at the next free codepoint.
///
/// The cursor only moves forward and never goes past `end + 1`.
#[derive(Debug, Clone)]
pub struct AllocationRange {
    name: RangeName,
    bounds: RangeBounds,
    cursor: u32,
}

impl AllocationRange {
    /// Fresh range with the cursor at `bounds.start`.
    pub fn new(name: RangeName, bounds: RangeBounds) -> Self {
        Self {
            name,
            bounds,
            cursor: bounds.start,
        }
    }

    /// Range name.
    pub fn name(&self) -> RangeName {
        self.name
    }

    /// Range bounds.
    pub fn bounds(&self) -> RangeBounds {
        self.bounds
    }

    /// Next codepoint to hand out.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// True once every codepoint has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.cursor > self.bounds.end
    }

    /// Codepoints still available.
    pub fn remaining(&self) -> usize {
        if self.is_exhausted() {
            0
        } else {
            (self.bounds.end - self.cursor) as usize + 1
        }
    }

    /// Codepoints handed out so far.
    pub fn allocated(&self) -> usize {
        (self.cursor - self.bounds.start) as usize
    }

    /// Hand out the next codepoint, or `None` if the range is exhausted.
    pub fn take(&mut self) -> Option<u32> {
        if self.is_exhausted() {
            return None;
        }
        let codepoint = self.cursor;
        self.cursor += 1;
        Some(codepoint)
    }

    /// Occupied sub-range `start..=cursor-1`, or `None` if nothing was allocated.
    pub fn used(&self) -> Option<RangeBounds> {
        if self.allocated() == 0 {
            None
        } else {
            Some(RangeBounds {
                start: self.bounds.start,
                end: self.cursor - 1,
            })
        }
    }
}

//! Configuration for an allocation run.

use crate::allocator::range::{RangeBounds, BMP_PUA, SMP_PUA};
use crate::error::Result;

/// What to do when the same (base, selector) pair appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first occurrence and drop later ones (counted in the report)
    #[default]
    KeepFirst,
    /// Fail the run with [`crate::Error::DuplicateRecord`]
    Reject,
}

/// What to do with selector groups that the priority table does not list
/// (VS33..=VS256).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnlistedGroupPolicy {
    /// Allocate them after the listed groups, in ascending selector order, in SMP
    #[default]
    AppendToSmp,
    /// Leave them out of the run (reported as skipped)
    Skip,
}

/// Allocation run configuration.
///
/// # Example
///
/// ```
/// use ivs_oxide::config::{AllocatorConfig, DuplicatePolicy};
///
/// let config = AllocatorConfig::new().with_duplicate_policy(DuplicatePolicy::Reject);
/// assert_eq!(config.bmp_range.capacity(), 6400);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Duplicate record handling
    pub duplicate_policy: DuplicatePolicy,

    /// Handling of groups outside the priority table
    pub unlisted_groups: UnlistedGroupPolicy,

    /// Range used for the high-priority selectors (default U+E000..=U+F8FF)
    pub bmp_range: RangeBounds,

    /// Range used for everything else (default U+F0000..=U+FFFFD)
    pub smp_range: RangeBounds,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocatorConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::KeepFirst,
            unlisted_groups: UnlistedGroupPolicy::AppendToSmp,
            bmp_range: BMP_PUA,
            smp_range: SMP_PUA,
        }
    }

    /// Strict mode: duplicates are an error, every group is allocated.
    pub fn strict() -> Self {
        Self::new().with_duplicate_policy(DuplicatePolicy::Reject)
    }

    /// Compatibility mode: keep-first duplicates and unlisted groups skipped,
    /// matching tables built from the sixteen-entry priority list alone.
    pub fn compatible() -> Self {
        Self::new().with_unlisted_groups(UnlistedGroupPolicy::Skip)
    }

    /// Set the duplicate policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Set the unlisted group policy.
    pub fn with_unlisted_groups(mut self, policy: UnlistedGroupPolicy) -> Self {
        self.unlisted_groups = policy;
        self
    }

    /// Use a custom BMP range.
    pub fn with_bmp_range(mut self, start: u32, end: u32) -> Result<Self> {
        self.bmp_range = RangeBounds::new(start, end)?;
        Ok(self)
    }

    /// Use a custom SMP range.
    pub fn with_smp_range(mut self, start: u32, end: u32) -> Result<Self> {
        self.smp_range = RangeBounds::new(start, end)?;
        Ok(self)
    }
}

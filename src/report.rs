//! Allocation statistics.
//!
//! An [`AllocationReport`] is a read-only summary of a finished run: how many
//! codepoints each range handed out, which sub-ranges are occupied, and how
//! each selector group was placed. Field order and map order are fixed, so the
//! JSON rendering is byte-for-byte reproducible for a given input.

use crate::allocator::range::{AllocationRange, RangeBounds};
use crate::error::Result;
use crate::selector::Selector;
use indexmap::IndexMap;
use serde::Serialize;

/// Placement counts of one selector group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    /// Records placed in the BMP range
    pub bmp: usize,
    /// Records placed in the SMP range
    pub smp: usize,
}

impl GroupCount {
    /// Records placed in total.
    pub fn total(&self) -> usize {
        self.bmp + self.smp
    }

    /// True if the group spans both ranges.
    pub fn is_split(&self) -> bool {
        self.bmp > 0 && self.smp > 0
    }
}

/// A selector group left out of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedGroup {
    /// Group selector
    pub selector: Selector,
    /// Number of records not allocated
    pub records: usize,
}

/// Summary of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationReport {
    /// Configured BMP range
    pub bmp_range: RangeBounds,
    /// Codepoints handed out from the BMP range
    pub bmp_allocated_count: usize,
    /// Occupied BMP sub-range, `None` if unused
    pub bmp_used_range: Option<RangeBounds>,
    /// Capacity of the BMP range
    pub bmp_capacity: usize,
    /// Configured SMP range
    pub smp_range: RangeBounds,
    /// Codepoints handed out from the SMP range
    pub smp_allocated_count: usize,
    /// Occupied SMP sub-range, `None` if unused
    pub smp_used_range: Option<RangeBounds>,
    /// Capacity of the SMP range
    pub smp_capacity: usize,
    /// Number of allocation entries
    pub total_entries: usize,
    /// Per-group placement in processing order
    pub per_group_counts: IndexMap<Selector, GroupCount>,
    /// Duplicate records dropped before allocation
    pub duplicates_dropped: usize,
    /// Groups not allocated under the skip policy
    pub skipped_groups: Vec<SkippedGroup>,
}

impl AllocationReport {
    /// Build the report from the final range state.
    pub(crate) fn from_state(
        bmp: &AllocationRange,
        smp: &AllocationRange,
        per_group_counts: IndexMap<Selector, GroupCount>,
        duplicates_dropped: usize,
        skipped_groups: Vec<SkippedGroup>,
    ) -> Self {
        Self {
            bmp_range: bmp.bounds(),
            bmp_allocated_count: bmp.allocated(),
            bmp_used_range: bmp.used(),
            bmp_capacity: bmp.bounds().capacity(),
            smp_range: smp.bounds(),
            smp_allocated_count: smp.allocated(),
            smp_used_range: smp.used(),
            smp_capacity: smp.bounds().capacity(),
            total_entries: bmp.allocated() + smp.allocated(),
            per_group_counts,
            duplicates_dropped,
            skipped_groups,
        }
    }

    /// Placement of one group, if it was allocated.
    pub fn group(&self, selector: Selector) -> Option<GroupCount> {
        self.per_group_counts.get(&selector).copied()
    }

    /// Groups that ended up in both ranges.
    pub fn split_groups(&self) -> Vec<Selector> {
        self.per_group_counts
            .iter()
            .filter(|(_, count)| count.is_split())
            .map(|(selector, _)| *selector)
            .collect()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable multi-line summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for (selector, count) in &self.per_group_counts {
            let line = match (count.bmp, count.smp) {
                (bmp, 0) => format!("{}: {} -> BMP\n", selector, bmp),
                (0, smp) => format!("{}: {} -> SMP\n", selector, smp),
                (bmp, smp) => format!("{}: {} -> BMP, {} -> SMP\n", selector, bmp, smp),
            };
            out.push_str(&line);
        }
        for skipped in &self.skipped_groups {
            out.push_str(&format!("{}: {} skipped\n", skipped.selector, skipped.records));
        }
        out.push_str(&format!(
            "BMP: {}/{} ({})\n",
            self.bmp_allocated_count,
            self.bmp_capacity,
            format_used(self.bmp_used_range)
        ));
        out.push_str(&format!(
            "SMP: {}/{} ({})\n",
            self.smp_allocated_count,
            self.smp_capacity,
            format_used(self.smp_used_range)
        ));
        out.push_str(&format!("Total: {}", self.total_entries));
        out
    }
}

fn format_used(range: Option<RangeBounds>) -> String {
    range.map_or_else(|| "unused".to_string(), |r| r.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::range::{RangeName, BMP_PUA, SMP_PUA};

    fn report_with(bmp_taken: usize, smp_taken: usize) -> AllocationReport {
        let mut bmp = AllocationRange::new(RangeName::Bmp, BMP_PUA);
        let mut smp = AllocationRange::new(RangeName::Smp, SMP_PUA);
        for _ in 0..bmp_taken {
            bmp.take();
        }
        for _ in 0..smp_taken {
            smp.take();
        }
        let mut counts = IndexMap::new();
        counts.insert(Selector::VS20, GroupCount { bmp: bmp_taken, smp: smp_taken });
        AllocationReport::from_state(&bmp, &smp, counts, 0, Vec::new())
    }

    #[test]
    fn test_counts_and_ranges() {
        let report = report_with(3, 7);
        assert_eq!(report.bmp_allocated_count, 3);
        assert_eq!(report.smp_allocated_count, 7);
        assert_eq!(report.total_entries, 10);
        assert_eq!(report.bmp_used_range, Some(RangeBounds { start: 0xE000, end: 0xE002 }));
        assert_eq!(report.smp_used_range, Some(RangeBounds { start: 0xF0000, end: 0xF0006 }));
        assert_eq!(report.split_groups(), vec![Selector::VS20]);
    }

    #[test]
    fn test_unused_ranges() {
        let report = report_with(0, 0);
        assert_eq!(report.bmp_used_range, None);
        assert_eq!(report.smp_used_range, None);
        assert!(report.summary().contains("BMP: 0/6400 (unused)"));
    }

    #[test]
    fn test_summary() {
        let summary = report_with(3, 7).summary();
        assert!(summary.contains("VS20: 3 -> BMP, 7 -> SMP"));
        assert!(summary.contains("BMP: 3/6400 (0xE000-0xE002)"));
        assert!(summary.contains("SMP: 7/65534 (0xF0000-0xF0006)"));
        assert!(summary.ends_with("Total: 10"));
    }

    #[test]
    fn test_summary_exact_text() {
        let mut report = report_with(3, 7);
        report.skipped_groups.push(SkippedGroup {
            selector: Selector::from_number(40).unwrap(),
            records: 2,
        });
        assert_eq!(
            report.summary(),
            "VS20: 3 -> BMP, 7 -> SMP\n\
             VS40: 2 skipped\n\
             BMP: 3/6400 (0xE000-0xE002)\n\
             SMP: 7/65534 (0xF0000-0xF0006)\n\
             Total: 10"
        );
    }

    #[test]
    fn test_json_is_stable() {
        let first = report_with(3, 7).to_json().unwrap();
        let second = report_with(3, 7).to_json().unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"VS20\""));
        assert!(first.contains("\"bmp_allocated_count\": 3"));
    }
}

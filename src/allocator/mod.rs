//! Staged Private Use Area allocation.
//!
//! The allocator walks the selector groups in [`PRIORITY_ORDER`] and hands out
//! codepoints from two ranges:
//!
//! - **VS19, VS18**: BMP range; once it is full the rest of the group
//!   overflows into the SMP range.
//! - **VS20**: the boundary group. The first `min(len, remaining BMP)` records
//!   go to BMP, the rest to SMP.
//! - **everything else**: SMP range only, whatever BMP capacity is left.
//!
//! Within a range, codepoints are assigned in processing order. A run either
//! produces an entry for every accepted record or fails without output.
//!
//! A [`StagedAllocator`] holds the cursor state of exactly one run and is
//! consumed by it; construct a fresh one for every run.
//!
//! # Example
//!
//! ```
//! use ivs_oxide::allocator::StagedAllocator;
//! use ivs_oxide::config::AllocatorConfig;
//! use ivs_oxide::record::VariationRecord;
//!
//! let records = vec![
//!     VariationRecord::new(0x845B, 0, "mj000001").unwrap(), // VS17
//!     VariationRecord::new(0x845B, 2, "mj000002").unwrap(), // VS19
//! ];
//! let allocation = StagedAllocator::new(AllocatorConfig::default())
//!     .unwrap()
//!     .allocate(records)
//!     .unwrap();
//!
//! let vs19 = allocation.lookup(0x845B, 2).unwrap();
//! assert_eq!(vs19.codepoint, 0xE000);
//! let vs17 = allocation.lookup(0x845B, 0).unwrap();
//! assert_eq!(vs17.codepoint, 0xF0000);
//! ```

pub mod range;

use crate::codec;
use crate::collector::{self, VariationGroup, VariationGroups};
use crate::config::{AllocatorConfig, UnlistedGroupPolicy};
use crate::error::{Error, Result};
use crate::key::SequenceKey;
use crate::record::VariationRecord;
use crate::report::{AllocationReport, GroupCount, SkippedGroup};
use crate::selector::{Selector, PRIORITY_ORDER};
use indexmap::IndexMap;
use range::{AllocationRange, RangeName};
use serde::Serialize;

/// How a group is placed across the two ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// BMP while it lasts, then SMP (VS19, VS18)
    BmpWithOverflow,
    /// Split at the remaining BMP capacity (VS20)
    Boundary,
    /// SMP only
    SmpOnly,
}

impl Placement {
    /// Placement policy of a selector group.
    pub fn for_selector(selector: Selector) -> Self {
        match selector {
            Selector::VS19 | Selector::VS18 => Placement::BmpWithOverflow,
            Selector::VS20 => Placement::Boundary,
            _ => Placement::SmpOnly,
        }
    }
}

/// The codepoint assigned to one IVS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationEntry {
    /// Key of the sequence
    pub sequence_key: SequenceKey,
    /// Assigned PUA codepoint
    pub codepoint: u32,
    /// Range the codepoint came from
    pub range: RangeName,
    /// Selector group of the sequence
    pub selector: Selector,
    /// Base ideograph of the sequence
    pub base_codepoint: u32,
    /// External glyph to show at `codepoint`
    pub glyph_id: String,
}

impl AllocationEntry {
    /// `U+E000` / `U+F0000` label of the assigned codepoint.
    pub fn codepoint_label(&self) -> String {
        codec::format_codepoint(self.codepoint)
    }

    /// The assigned codepoint as a `char`.
    pub fn pua_char(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }
}

/// Output of one allocation run.
#[derive(Debug, Clone)]
pub struct Allocation {
    entries: IndexMap<SequenceKey, AllocationEntry>,
    report: AllocationReport,
}

impl Allocation {
    /// Entries in processing order.
    pub fn entries(&self) -> impl Iterator<Item = &AllocationEntry> {
        self.entries.values()
    }

    /// Entry for a sequence key.
    pub fn get(&self, key: &SequenceKey) -> Option<&AllocationEntry> {
        self.entries.get(key)
    }

    /// Entry for a (base codepoint, selector index) pair.
    pub fn lookup(&self, base_codepoint: u32, selector_index: u32) -> Option<&AllocationEntry> {
        let selector = Selector::from_index(selector_index).ok()?;
        let key = SequenceKey::new(base_codepoint, selector).ok()?;
        self.entries.get(&key)
    }

    /// Sequence key to assigned codepoint.
    pub fn codepoint_map(&self) -> IndexMap<SequenceKey, u32> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.codepoint))
            .collect()
    }

    /// Sequence key to external glyph id.
    pub fn glyph_map(&self) -> IndexMap<SequenceKey, String> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.glyph_id.clone()))
            .collect()
    }

    /// Statistics of the run.
    pub fn report(&self) -> &AllocationReport {
        &self.report
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was allocated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cursor state of one staged allocation run.
#[derive(Debug)]
pub struct StagedAllocator {
    config: AllocatorConfig,
    bmp: AllocationRange,
    smp: AllocationRange,
    entries: IndexMap<SequenceKey, AllocationEntry>,
    group_counts: IndexMap<Selector, GroupCount>,
}

impl StagedAllocator {
    /// Create an allocator with both cursors at the start of their range.
    ///
    /// Fails with [`Error::OverlappingRanges`] if the configured ranges overlap.
    pub fn new(config: AllocatorConfig) -> Result<Self> {
        let (bmp, smp) = (config.bmp_range, config.smp_range);
        if bmp.overlaps(&smp) {
            return Err(Error::OverlappingRanges {
                bmp_start: bmp.start,
                bmp_end: bmp.end,
                smp_start: smp.start,
                smp_end: smp.end,
            });
        }

        Ok(Self {
            bmp: AllocationRange::new(RangeName::Bmp, config.bmp_range),
            smp: AllocationRange::new(RangeName::Smp, config.smp_range),
            config,
            entries: IndexMap::new(),
            group_counts: IndexMap::new(),
        })
    }

    /// Group `records` and allocate them.
    pub fn allocate<I>(self, records: I) -> Result<Allocation>
    where
        I: IntoIterator<Item = VariationRecord>,
    {
        let groups = collector::collect(records, self.config.duplicate_policy)?;
        self.allocate_groups(&groups)
    }

    /// Allocate pre-built groups.
    pub fn allocate_groups(mut self, groups: &VariationGroups) -> Result<Allocation> {
        let mut skipped = Vec::new();

        for selector in PRIORITY_ORDER {
            if let Some(group) = groups.get(selector) {
                self.allocate_group(group)?;
            }
        }

        let mut unlisted: Vec<&VariationGroup> = groups
            .iter()
            .filter(|g| g.selector().priority().is_none())
            .collect();
        unlisted.sort_by_key(|g| g.selector());

        for group in unlisted {
            match self.config.unlisted_groups {
                UnlistedGroupPolicy::AppendToSmp => self.allocate_group(group)?,
                UnlistedGroupPolicy::Skip => {
                    log::warn!(
                        "{}: {} records skipped (not in priority table)",
                        group.selector(),
                        group.len()
                    );
                    skipped.push(SkippedGroup {
                        selector: group.selector(),
                        records: group.len(),
                    });
                },
            }
        }

        let report = AllocationReport::from_state(
            &self.bmp,
            &self.smp,
            self.group_counts,
            groups.duplicates_dropped(),
            skipped,
        );
        log::debug!(
            "Allocation complete: BMP {} ({}), SMP {} ({}), total {}",
            report.bmp_allocated_count,
            self.bmp.cursor(),
            report.smp_allocated_count,
            self.smp.cursor(),
            report.total_entries
        );

        Ok(Allocation {
            entries: self.entries,
            report,
        })
    }

    fn allocate_group(&mut self, group: &VariationGroup) -> Result<()> {
        let selector = group.selector();
        let records = group.records();

        match Placement::for_selector(selector) {
            Placement::BmpWithOverflow => {
                for record in records {
                    let slot = match self.bmp.take() {
                        Some(codepoint) => (RangeName::Bmp, codepoint),
                        None => {
                            if self.group_smp_count(selector) == 0 {
                                log::warn!("{}: BMP range exhausted, overflowing into SMP", selector);
                            }
                            (RangeName::Smp, self.take_smp(selector)?)
                        },
                    };
                    self.push_entry(record, slot)?;
                }
            },
            Placement::Boundary => {
                let bmp_portion = records.len().min(self.bmp.remaining());
                let (head, tail) = records.split_at(bmp_portion);
                for record in head {
                    let codepoint = self.take_bmp(selector)?;
                    self.push_entry(record, (RangeName::Bmp, codepoint))?;
                }
                for record in tail {
                    let codepoint = self.take_smp(selector)?;
                    self.push_entry(record, (RangeName::Smp, codepoint))?;
                }
            },
            Placement::SmpOnly => {
                for record in records {
                    let codepoint = self.take_smp(selector)?;
                    self.push_entry(record, (RangeName::Smp, codepoint))?;
                }
            },
        }

        let count = self.group_counts.get(&selector).copied().unwrap_or_default();
        log::debug!("{}: {} -> BMP, {} -> SMP", selector, count.bmp, count.smp);
        Ok(())
    }

    fn group_smp_count(&self, selector: Selector) -> usize {
        self.group_counts.get(&selector).map_or(0, |c| c.smp)
    }

    fn take_bmp(&mut self, selector: Selector) -> Result<u32> {
        self.bmp.take().ok_or_else(|| exhausted(RangeName::Bmp, selector))
    }

    fn take_smp(&mut self, selector: Selector) -> Result<u32> {
        self.smp.take().ok_or_else(|| exhausted(RangeName::Smp, selector))
    }

    fn push_entry(
        &mut self,
        record: &VariationRecord,
        (range, codepoint): (RangeName, u32),
    ) -> Result<()> {
        let sequence_key = record.sequence_key()?;
        log::trace!(
            "{} -> {} ({})",
            sequence_key.describe(),
            codec::format_codepoint(codepoint),
            range
        );

        let count = self.group_counts.entry(record.selector()).or_default();
        match range {
            RangeName::Bmp => count.bmp += 1,
            RangeName::Smp => count.smp += 1,
        }

        let entry = AllocationEntry {
            sequence_key: sequence_key.clone(),
            codepoint,
            range,
            selector: record.selector(),
            base_codepoint: record.base_codepoint(),
            glyph_id: record.glyph_id().to_string(),
        };
        // Groups are deduplicated, so a key can only repeat if the caller
        // bypassed the collector's bookkeeping.
        if self.entries.insert(sequence_key, entry).is_some() {
            let (base_codepoint, selector_index) = record.pair();
            return Err(Error::DuplicateRecord {
                base_codepoint,
                selector_index,
            });
        }
        Ok(())
    }
}

fn exhausted(range: RangeName, selector: Selector) -> Error {
    Error::CapacityExhausted {
        range: range.to_string(),
        group: selector.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;

    fn records(selector_index: u32, count: u32, first_base: u32) -> Vec<VariationRecord> {
        (0..count)
            .map(|i| {
                VariationRecord::new(first_base + i, selector_index, format!("mj{:06}", i)).unwrap()
            })
            .collect()
    }

    fn allocate(records: Vec<VariationRecord>) -> Allocation {
        StagedAllocator::new(AllocatorConfig::default())
            .unwrap()
            .allocate(records)
            .unwrap()
    }

    #[test]
    fn test_placement_policy() {
        assert_eq!(Placement::for_selector(Selector::VS19), Placement::BmpWithOverflow);
        assert_eq!(Placement::for_selector(Selector::VS18), Placement::BmpWithOverflow);
        assert_eq!(Placement::for_selector(Selector::VS20), Placement::Boundary);
        assert_eq!(Placement::for_selector(Selector::VS17), Placement::SmpOnly);
        assert_eq!(
            Placement::for_selector(Selector::from_number(40).unwrap()),
            Placement::SmpOnly
        );
    }

    #[test]
    fn test_priority_order_across_groups() {
        // Input order VS17, VS20, VS18, VS19; allocation order VS19, VS18, VS20, VS17
        let mut input = records(0, 2, 0x5000);
        input.extend(records(3, 2, 0x5100));
        input.extend(records(1, 2, 0x5200));
        input.extend(records(2, 2, 0x5300));
        let allocation = allocate(input);

        let order: Vec<(String, u32)> = allocation
            .entries()
            .map(|e| (e.selector.name(), e.codepoint))
            .collect();
        assert_eq!(
            order,
            vec![
                ("VS19".to_string(), 0xE000),
                ("VS19".to_string(), 0xE001),
                ("VS18".to_string(), 0xE002),
                ("VS18".to_string(), 0xE003),
                ("VS20".to_string(), 0xE004),
                ("VS20".to_string(), 0xE005),
                ("VS17".to_string(), 0xF0000),
                ("VS17".to_string(), 0xF0001),
            ]
        );
    }

    #[test]
    fn test_smp_only_groups_ignore_bmp_headroom() {
        let allocation = allocate(records(0, 5, 0x4E00));
        assert!(allocation.entries().all(|e| e.range == RangeName::Smp));
        assert_eq!(allocation.report().bmp_allocated_count, 0);
        assert_eq!(allocation.report().smp_allocated_count, 5);
    }

    #[test]
    fn test_overflow_with_small_bmp_range() {
        let config = AllocatorConfig::new().with_bmp_range(0xE000, 0xE001).unwrap();
        let allocation = StagedAllocator::new(config)
            .unwrap()
            .allocate(records(2, 3, 0x4E00))
            .unwrap();

        let codepoints: Vec<u32> = allocation.entries().map(|e| e.codepoint).collect();
        assert_eq!(codepoints, vec![0xE000, 0xE001, 0xF0000]);
        assert_eq!(
            allocation.report().group(Selector::VS19),
            Some(GroupCount { bmp: 2, smp: 1 })
        );
    }

    #[test]
    fn test_vs20_gets_nothing_after_full_bmp() {
        let config = AllocatorConfig::new().with_bmp_range(0xE000, 0xE001).unwrap();
        let mut input = records(2, 2, 0x4E00);
        input.extend(records(3, 2, 0x4F00));
        let allocation = StagedAllocator::new(config).unwrap().allocate(input).unwrap();

        assert_eq!(
            allocation.report().group(Selector::VS20),
            Some(GroupCount { bmp: 0, smp: 2 })
        );
    }

    #[test]
    fn test_smp_capacity_exhausted() {
        let config = AllocatorConfig::new().with_smp_range(0xF0000, 0xF0001).unwrap();
        let result = StagedAllocator::new(config).unwrap().allocate(records(0, 3, 0x4E00));
        match result {
            Err(Error::CapacityExhausted { range, group }) => {
                assert_eq!(range, "SMP");
                assert_eq!(group, "VS17");
            },
            other => panic!("expected CapacityExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_overlapping_ranges_rejected() {
        let config = AllocatorConfig::new().with_smp_range(0xF000, 0xF0FF).unwrap();
        match StagedAllocator::new(config) {
            Err(Error::OverlappingRanges {
                bmp_start,
                bmp_end,
                smp_start,
                smp_end,
            }) => {
                assert_eq!((bmp_start, bmp_end), (0xE000, 0xF8FF));
                assert_eq!((smp_start, smp_end), (0xF000, 0xF0FF));
            },
            other => panic!("expected OverlappingRanges, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unlisted_groups_appended_in_ascending_order() {
        // VS40 then VS33 in input; VS33 is allocated first, after the listed VS21
        let mut input = records(23, 1, 0x6000);
        input.extend(records(16, 1, 0x6100));
        input.extend(records(4, 1, 0x6200));
        let allocation = allocate(input);

        let order: Vec<(String, u32)> = allocation
            .entries()
            .map(|e| (e.selector.name(), e.codepoint))
            .collect();
        assert_eq!(
            order,
            vec![
                ("VS21".to_string(), 0xF0000),
                ("VS33".to_string(), 0xF0001),
                ("VS40".to_string(), 0xF0002),
            ]
        );
    }

    #[test]
    fn test_unlisted_groups_skipped() {
        let mut input = records(23, 2, 0x6000);
        input.extend(records(2, 1, 0x6100));
        let allocation = StagedAllocator::new(AllocatorConfig::compatible())
            .unwrap()
            .allocate(input)
            .unwrap();

        assert_eq!(allocation.len(), 1);
        let report = allocation.report();
        assert_eq!(report.skipped_groups.len(), 1);
        assert_eq!(report.skipped_groups[0].selector.name(), "VS40");
        assert_eq!(report.skipped_groups[0].records, 2);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let input = vec![
            VariationRecord::new(0x845B, 2, "first").unwrap(),
            VariationRecord::new(0x845B, 2, "second").unwrap(),
        ];
        let allocation = allocate(input);
        assert_eq!(allocation.len(), 1);
        assert_eq!(allocation.lookup(0x845B, 2).unwrap().glyph_id, "first");
        assert_eq!(allocation.report().duplicates_dropped, 1);
    }

    #[test]
    fn test_duplicates_rejected_in_strict_mode() {
        let input = vec![
            VariationRecord::new(0x845B, 2, "first").unwrap(),
            VariationRecord::new(0x845B, 2, "second").unwrap(),
        ];
        let config = AllocatorConfig::new().with_duplicate_policy(DuplicatePolicy::Reject);
        let result = StagedAllocator::new(config).unwrap().allocate(input);
        assert!(matches!(result, Err(Error::DuplicateRecord { .. })));
    }

    #[test]
    fn test_output_maps() {
        let allocation = allocate(records(2, 2, 0x4E00));
        let key = SequenceKey::new(0x4E01, Selector::VS19).unwrap();
        assert_eq!(allocation.codepoint_map().get(&key), Some(&0xE001));
        assert_eq!(allocation.glyph_map().get(&key).map(String::as_str), Some("mj000001"));
    }

    #[test]
    fn test_entry_helpers() {
        let allocation = allocate(records(0, 1, 0x4E00));
        let entry = allocation.lookup(0x4E00, 0).unwrap();
        assert_eq!(entry.codepoint_label(), "U+F0000");
        assert_eq!(entry.pua_char(), Some('\u{F0000}'));
        assert!(allocation.lookup(0x4E00, 1).is_none());
        assert!(allocation.lookup(0x4E00, 999).is_none());
    }

    #[test]
    fn test_empty_input() {
        let allocation = allocate(Vec::new());
        assert!(allocation.is_empty());
        assert_eq!(allocation.report().total_entries, 0);
    }
}

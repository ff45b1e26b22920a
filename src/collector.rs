//! Grouping of variation records by selector.
//!
//! Records are grouped by their variation selector in first-seen order, and
//! within a group in input order. Duplicate (base, selector) pairs are handled
//! according to [`DuplicatePolicy`].

use crate::config::DuplicatePolicy;
use crate::error::{Error, Result};
use crate::record::VariationRecord;
use crate::selector::Selector;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Group all records by selector.
///
/// # Examples
///
/// ```
/// use ivs_oxide::collector::collect;
/// use ivs_oxide::config::DuplicatePolicy;
/// use ivs_oxide::record::VariationRecord;
///
/// let records = vec![
///     VariationRecord::new(0x845B, 2, "mj000001").unwrap(),
///     VariationRecord::new(0x845B, 1, "mj000002").unwrap(),
///     VariationRecord::new(0x8FBB, 2, "mj000003").unwrap(),
/// ];
/// let groups = collect(records, DuplicatePolicy::KeepFirst).unwrap();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups.get_by_name("VS19").unwrap().len(), 2);
/// ```
pub fn collect<I>(records: I, policy: DuplicatePolicy) -> Result<VariationGroups>
where
    I: IntoIterator<Item = VariationRecord>,
{
    let mut groups = VariationGroups::new(policy);
    for record in records {
        groups.push(record)?;
    }

    log::debug!(
        "Collected {} records into {} selector groups ({} duplicates dropped)",
        groups.record_count(),
        groups.len(),
        groups.duplicates_dropped()
    );
    Ok(groups)
}

/// Records sharing one selector, in first-observed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationGroup {
    selector: Selector,
    records: Vec<VariationRecord>,
}

impl VariationGroup {
    fn new(selector: Selector) -> Self {
        Self {
            selector,
            records: Vec::new(),
        }
    }

    /// Selector shared by every record of the group.
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Group name, e.g. `"VS20"`.
    pub fn name(&self) -> String {
        self.selector.name()
    }

    /// Records in group order.
    pub fn records(&self) -> &[VariationRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the group has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// All selector groups of one run.
///
/// Can be filled record by record when the caller already streams records
/// grouped; [`collect`] is the one-shot form.
#[derive(Debug, Clone)]
pub struct VariationGroups {
    policy: DuplicatePolicy,
    groups: IndexMap<Selector, VariationGroup>,
    seen: HashSet<(u32, u8)>,
    duplicates_dropped: usize,
}

impl VariationGroups {
    /// Create an empty set of groups.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            groups: IndexMap::new(),
            seen: HashSet::new(),
            duplicates_dropped: 0,
        }
    }

    /// Add a record to its group.
    ///
    /// Returns `Ok(false)` when the record was a duplicate and was dropped.
    pub fn push(&mut self, record: VariationRecord) -> Result<bool> {
        let (base_codepoint, selector_index) = record.pair();
        if !self.seen.insert((base_codepoint, selector_index)) {
            return match self.policy {
                DuplicatePolicy::KeepFirst => {
                    log::warn!(
                        "Dropping duplicate U+{:04X} {} (glyph {})",
                        base_codepoint,
                        record.selector(),
                        record.glyph_id()
                    );
                    self.duplicates_dropped += 1;
                    Ok(false)
                },
                DuplicatePolicy::Reject => Err(Error::DuplicateRecord {
                    base_codepoint,
                    selector_index,
                }),
            };
        }

        let selector = record.selector();
        self.groups
            .entry(selector)
            .or_insert_with(|| VariationGroup::new(selector))
            .records
            .push(record);
        Ok(true)
    }

    /// Group for a selector.
    pub fn get(&self, selector: Selector) -> Option<&VariationGroup> {
        self.groups.get(&selector)
    }

    /// Group for a `VSnn` name.
    pub fn get_by_name(&self, name: &str) -> Option<&VariationGroup> {
        name.parse::<Selector>().ok().and_then(|s| self.get(s))
    }

    /// Groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &VariationGroup> {
        self.groups.values()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if no record was accepted.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of accepted records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.values().map(VariationGroup::len).sum()
    }

    /// Number of duplicates dropped under [`DuplicatePolicy::KeepFirst`].
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(base: u32, index: u32, glyph: &str) -> VariationRecord {
        VariationRecord::new(base, index, glyph).unwrap()
    }

    #[test]
    fn test_groups_by_selector_in_input_order() {
        let groups = collect(
            vec![
                record(0x4E08, 0, "a"),
                record(0x4E09, 2, "b"),
                record(0x4E0A, 0, "c"),
                record(0x4E0B, 2, "d"),
            ],
            DuplicatePolicy::KeepFirst,
        )
        .unwrap();

        let names: Vec<String> = groups.iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["VS17", "VS19"]);

        let vs17: Vec<&str> = groups
            .get(Selector::VS17)
            .unwrap()
            .records()
            .iter()
            .map(|r| r.glyph_id())
            .collect();
        assert_eq!(vs17, vec!["a", "c"]);
    }

    #[test]
    fn test_keep_first_drops_duplicates() {
        let groups = collect(
            vec![record(0x4E08, 0, "first"), record(0x4E08, 0, "second"), record(0x4E08, 1, "other")],
            DuplicatePolicy::KeepFirst,
        )
        .unwrap();

        assert_eq!(groups.record_count(), 2);
        assert_eq!(groups.duplicates_dropped(), 1);
        assert_eq!(groups.get(Selector::VS17).unwrap().records()[0].glyph_id(), "first");
    }

    #[test]
    fn test_reject_duplicates() {
        let result = collect(
            vec![record(0x4E08, 0, "first"), record(0x4E08, 0, "second")],
            DuplicatePolicy::Reject,
        );
        assert!(matches!(
            result,
            Err(Error::DuplicateRecord {
                base_codepoint: 0x4E08,
                selector_index: 0
            })
        ));
    }

    #[test]
    fn test_push_reports_acceptance() {
        let mut groups = VariationGroups::new(DuplicatePolicy::KeepFirst);
        assert!(groups.push(record(0x4E08, 3, "a")).unwrap());
        assert!(!groups.push(record(0x4E08, 3, "b")).unwrap());
        assert_eq!(groups.get_by_name("VS20").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let groups = collect(Vec::new(), DuplicatePolicy::KeepFirst).unwrap();
        assert!(groups.is_empty());
        assert_eq!(groups.record_count(), 0);
        assert!(groups.get_by_name("VS19").is_none());
    }
}

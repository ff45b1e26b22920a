//! Replacing IVS in text with their assigned PUA codepoints.
//!
//! Once an allocation exists, text that contains `base + VS17..VS256`
//! sequences can be rewritten for a font that only has the substitute glyphs
//! at the PUA codepoints. Sequences without an assignment are left as they are.

use crate::allocator::{Allocation, AllocationEntry};
use crate::key::SequenceKey;
use crate::selector::{Selector, VARIATION_SELECTOR_BASE, VARIATION_SELECTOR_LAST};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

/// One distinct IVS found in a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceDetail {
    /// Key of the sequence
    pub sequence_key: SequenceKey,
    /// Codepoints of the sequence, e.g. `U+845B,U+E0100`
    pub codepoints: String,
    /// Assigned PUA codepoint, e.g. `U+E000`
    pub pua_codepoint: String,
    /// The substitute character itself
    pub pua_char: String,
    /// Number of occurrences in the text
    pub count: usize,
}

/// Lookup table from (base, selector) to allocation entry.
pub struct Substituter<'a> {
    table: HashMap<(u32, Selector), &'a AllocationEntry>,
}

impl Allocation {
    /// Build a [`Substituter`] for this allocation.
    pub fn substituter(&self) -> Substituter<'_> {
        Substituter::new(self)
    }
}

impl<'a> Substituter<'a> {
    /// Index all entries of an allocation.
    pub fn new(allocation: &'a Allocation) -> Self {
        let table = allocation
            .entries()
            .map(|entry| ((entry.base_codepoint, entry.selector), entry))
            .collect();
        Self { table }
    }

    /// Replace every mapped IVS in `text` by its PUA character.
    ///
    /// # Examples
    ///
    /// ```
    /// use ivs_oxide::allocator::StagedAllocator;
    /// use ivs_oxide::config::AllocatorConfig;
    /// use ivs_oxide::record::VariationRecord;
    ///
    /// let records = vec![VariationRecord::new(0x845B, 2, "mj000001").unwrap()];
    /// let allocation = StagedAllocator::new(AllocatorConfig::default())
    ///     .unwrap()
    ///     .allocate(records)
    ///     .unwrap();
    ///
    /// let text = "\u{845B}\u{E0102}\u{57CE}";
    /// assert_eq!(allocation.substituter().substitute(text), "\u{E000}\u{57CE}");
    /// ```
    pub fn substitute(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.scan(text, |event| match event {
            Scan::Plain(ch) => out.push(ch),
            Scan::Sequence(entry) => match entry.pua_char() {
                Some(pua) => out.push(pua),
                // Custom ranges may cover surrogate codepoints
                None => out.push(char::REPLACEMENT_CHARACTER),
            },
        });
        out
    }

    /// True if `text` contains at least one mapped IVS.
    pub fn contains_sequences(&self, text: &str) -> bool {
        self.count_sequences(text) > 0
    }

    /// Number of mapped IVS occurrences in `text`.
    pub fn count_sequences(&self, text: &str) -> usize {
        let mut count = 0;
        self.scan(text, |event| {
            if let Scan::Sequence(_) = event {
                count += 1;
            }
        });
        count
    }

    /// Distinct mapped IVS in `text`, in order of first occurrence.
    pub fn sequence_details(&self, text: &str) -> Vec<SequenceDetail> {
        let mut details: IndexMap<SequenceKey, SequenceDetail> = IndexMap::new();
        self.scan(text, |event| {
            if let Scan::Sequence(entry) = event {
                details
                    .entry(entry.sequence_key.clone())
                    .or_insert_with(|| SequenceDetail {
                        sequence_key: entry.sequence_key.clone(),
                        codepoints: entry.sequence_key.describe(),
                        pua_codepoint: entry.codepoint_label(),
                        pua_char: entry
                            .pua_char()
                            .unwrap_or(char::REPLACEMENT_CHARACTER)
                            .to_string(),
                        count: 0,
                    })
                    .count += 1;
            }
        });
        details.into_values().collect()
    }

    fn scan<F>(&self, text: &str, mut visit: F)
    where
        F: FnMut(Scan<'a>),
    {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            let selector = chars.peek().and_then(|&next| variation_selector(next));
            let entry = selector.and_then(|s| self.table.get(&(ch as u32, s)).copied());
            match entry {
                Some(entry) => {
                    chars.next();
                    visit(Scan::Sequence(entry));
                },
                None => visit(Scan::Plain(ch)),
            }
        }
    }
}

enum Scan<'a> {
    Plain(char),
    Sequence(&'a AllocationEntry),
}

fn variation_selector(ch: char) -> Option<Selector> {
    let scalar = ch as u32;
    if (VARIATION_SELECTOR_BASE..=VARIATION_SELECTOR_LAST).contains(&scalar) {
        Selector::from_scalar(scalar).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::StagedAllocator;
    use crate::config::AllocatorConfig;
    use crate::record::VariationRecord;

    fn allocation() -> Allocation {
        let records = vec![
            VariationRecord::new(0x845B, 2, "mj000001").unwrap(), // VS19 -> U+E000
            VariationRecord::new(0x845B, 0, "mj000002").unwrap(), // VS17 -> U+F0000
            VariationRecord::new(0x20B9F, 1, "mj000003").unwrap(), // VS18 -> U+E001
        ];
        StagedAllocator::new(AllocatorConfig::default())
            .unwrap()
            .allocate(records)
            .unwrap()
    }

    #[test]
    fn test_substitute_mapped_sequences() {
        let allocation = allocation();
        let substituter = allocation.substituter();
        let text = "a\u{845B}\u{E0102}b\u{845B}\u{E0100}\u{20B9F}\u{E0101}";
        assert_eq!(
            substituter.substitute(text),
            "a\u{E000}b\u{F0000}\u{E001}"
        );
    }

    #[test]
    fn test_unmapped_sequences_pass_through() {
        let allocation = allocation();
        let substituter = allocation.substituter();
        // VS20 of U+845B has no assignment; bare base stays too
        let text = "\u{845B}\u{E0103}\u{845B}";
        assert_eq!(substituter.substitute(text), text);
        assert!(!substituter.contains_sequences(text));
    }

    #[test]
    fn test_count_sequences() {
        let allocation = allocation();
        let substituter = allocation.substituter();
        let text = "\u{845B}\u{E0102}x\u{845B}\u{E0102}\u{845B}\u{E0100}";
        assert_eq!(substituter.count_sequences(text), 3);
        assert!(substituter.contains_sequences(text));
        assert_eq!(substituter.count_sequences("plain text"), 0);
    }

    #[test]
    fn test_sequence_details() {
        let allocation = allocation();
        let substituter = allocation.substituter();
        let text = "\u{845B}\u{E0100}\u{845B}\u{E0102}\u{845B}\u{E0100}";
        let details = substituter.sequence_details(text);

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].codepoints, "U+845B,U+E0100");
        assert_eq!(details[0].pua_codepoint, "U+F0000");
        assert_eq!(details[0].pua_char, "\u{F0000}");
        assert_eq!(details[0].count, 2);
        assert_eq!(details[1].codepoints, "U+845B,U+E0102");
        assert_eq!(details[1].pua_codepoint, "U+E000");
        assert_eq!(details[1].pua_char, "\u{E000}");
        assert_eq!(details[1].count, 1);
    }

    #[test]
    fn test_trailing_selector_without_base() {
        let allocation = allocation();
        let text = "\u{E0102}";
        assert_eq!(allocation.substituter().substitute(text), text);
    }
}

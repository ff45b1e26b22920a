//! Serialized forms of an allocation for downstream tools.
//!
//! Two artifacts are produced:
//!
//! - a JSON mapping document (IVS text to PUA code, plane, selector and glyph)
//!   read by the glyph-extraction step that builds the substitute font,
//! - a JavaScript module exporting `ivsToExternalCharMap` and
//!   `puaAllocationStats` for the web front end.
//!
//! Both are written to caller-supplied writers or strings; file placement is
//! up to the caller.

use crate::allocator::range::{RangeBounds, RangeName};
use crate::allocator::{Allocation, AllocationEntry};
use crate::codec;
use crate::error::Result;
use indexmap::IndexMap;
use serde::Serialize;
use std::io;

/// Strategy identifier written into every export.
pub const MAPPING_STRATEGY: &str = "staged_pua_allocation";

/// JSON mapping document.
#[derive(Debug, Clone, Serialize)]
pub struct MappingDocument {
    /// Always [`MAPPING_STRATEGY`]
    pub mapping_strategy: &'static str,
    /// Aggregate counts
    pub statistics: MappingStatistics,
    /// IVS text to mapping, in allocation order
    pub mappings: IndexMap<String, MappingRecord>,
}

/// Counts section of a [`MappingDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingStatistics {
    /// Number of mapped sequences
    pub total_characters: usize,
    /// Sequences mapped into the BMP range
    pub bmp_pua_characters: usize,
    /// Sequences mapped into the SMP range
    pub smp_pua_characters: usize,
    /// Configured BMP range, e.g. `0xE000-0xF8FF`
    pub bmp_pua_range: String,
    /// Configured SMP range, e.g. `0xF0000-0xFFFFD`
    pub smp_pua_range: String,
}

/// One mapping of a [`MappingDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRecord {
    /// Assigned codepoint
    pub pua_code: u32,
    /// `U+E000` / `U+F0000`
    pub pua_hex: String,
    /// `BMP`, or `SMP_P15` for plane 15
    pub pua_plane: String,
    /// Selector group, e.g. `VS19`
    pub vs_name: String,
    /// Base character as text
    pub base_char: String,
    /// External glyph id
    pub glyph_id: String,
}

impl MappingRecord {
    fn from_entry(entry: &AllocationEntry) -> Self {
        let (pua_hex, pua_plane) = match entry.range {
            RangeName::Bmp => (format!("U+{:04X}", entry.codepoint), "BMP".to_string()),
            RangeName::Smp => (
                format!("U+{:05X}", entry.codepoint),
                format!("SMP_P{}", entry.codepoint >> 16),
            ),
        };
        let base_char = codec::render_scalar(entry.base_codepoint)
            .map(|units| units.to_string())
            .unwrap_or_default();

        Self {
            pua_code: entry.codepoint,
            pua_hex,
            pua_plane,
            vs_name: entry.selector.name(),
            base_char,
            glyph_id: entry.glyph_id.clone(),
        }
    }
}

impl MappingDocument {
    /// Build the document for an allocation.
    pub fn from_allocation(allocation: &Allocation) -> Self {
        let report = allocation.report();
        let mappings = allocation
            .entries()
            .map(|entry| (entry.sequence_key.to_string(), MappingRecord::from_entry(entry)))
            .collect();

        Self {
            mapping_strategy: MAPPING_STRATEGY,
            statistics: MappingStatistics {
                total_characters: report.total_entries,
                bmp_pua_characters: report.bmp_allocated_count,
                smp_pua_characters: report.smp_allocated_count,
                bmp_pua_range: report.bmp_range.to_string(),
                smp_pua_range: report.smp_range.to_string(),
            },
            mappings,
        }
    }

    /// Write pretty-printed JSON.
    pub fn write_json<W: io::Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Pretty-printed JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render the JavaScript mapping module.
///
/// Keys and values are written as escaped UTF-16 literals so the module stays
/// ASCII; each line carries the glyph id as a comment.
pub fn javascript_module(allocation: &Allocation) -> String {
    let report = allocation.report();
    let mut js = String::new();

    js.push_str("// IVS mapping table (staged PUA allocation)\n");
    js.push_str(&format!(
        "// BMP PUA: {} ({}) - high-frequency selectors first\n",
        report.bmp_range, report.bmp_capacity
    ));
    js.push_str(&format!(
        "// SMP PUA: {} ({}) - remaining selectors\n",
        report.smp_range, report.smp_capacity
    ));
    js.push('\n');

    js.push_str("export const ivsToExternalCharMap = {\n");
    for entry in allocation.entries() {
        let pua = codec::render_scalar(entry.codepoint)
            .map(|units| units.js_escape())
            .unwrap_or_default();
        js.push_str(&format!(
            "  '{}': '{}',  // {}\n",
            entry.sequence_key.js_escape(),
            pua,
            entry.glyph_id.replace(['\n', '\r'], " ")
        ));
    }
    js.push_str("};\n\n");

    js.push_str("// Allocation statistics (staged PUA strategy)\n");
    js.push_str("export const puaAllocationStats = {\n");
    js.push_str(&format!("    strategy: '{}',\n", MAPPING_STRATEGY));
    js.push_str(&range_stats(
        "bmpPUA",
        report.bmp_allocated_count,
        report.bmp_capacity,
        report.bmp_used_range,
    ));
    js.push_str(&range_stats(
        "smpPUA",
        report.smp_allocated_count,
        report.smp_capacity,
        report.smp_used_range,
    ));
    js.push_str(&format!("    totalCharacters: {}\n", report.total_entries));
    js.push_str("};\n");
    js
}

fn range_stats(name: &str, allocated: usize, capacity: usize, used: Option<RangeBounds>) -> String {
    let range = used.map_or_else(|| "null".to_string(), |r| format!("'{}'", r));
    format!(
        "    {}: {{\n        allocated: {},\n        capacity: {},\n        range: {}\n    }},\n",
        name, allocated, capacity, range
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::StagedAllocator;
    use crate::config::AllocatorConfig;
    use crate::record::VariationRecord;

    fn allocation() -> Allocation {
        let records = vec![
            VariationRecord::new(0x845B, 2, "mj000001").unwrap(),
            VariationRecord::new(0x845B, 0, "mj000002").unwrap(),
        ];
        StagedAllocator::new(AllocatorConfig::default())
            .unwrap()
            .allocate(records)
            .unwrap()
    }

    #[test]
    fn test_mapping_document_statistics() {
        let doc = MappingDocument::from_allocation(&allocation());
        assert_eq!(doc.mapping_strategy, "staged_pua_allocation");
        assert_eq!(doc.statistics.total_characters, 2);
        assert_eq!(doc.statistics.bmp_pua_characters, 1);
        assert_eq!(doc.statistics.smp_pua_characters, 1);
        assert_eq!(doc.statistics.bmp_pua_range, "0xE000-0xF8FF");
        assert_eq!(doc.statistics.smp_pua_range, "0xF0000-0xFFFFD");
    }

    #[test]
    fn test_mapping_records() {
        let doc = MappingDocument::from_allocation(&allocation());
        let bmp = &doc.mappings["\u{845B}\u{E0102}"];
        assert_eq!(bmp.pua_code, 0xE000);
        assert_eq!(bmp.pua_hex, "U+E000");
        assert_eq!(bmp.pua_plane, "BMP");
        assert_eq!(bmp.vs_name, "VS19");
        assert_eq!(bmp.base_char, "\u{845B}");
        assert_eq!(bmp.glyph_id, "mj000001");

        let smp = &doc.mappings["\u{845B}\u{E0100}"];
        assert_eq!(smp.pua_hex, "U+F0000");
        assert_eq!(smp.pua_plane, "SMP_P15");
        assert_eq!(smp.vs_name, "VS17");
    }

    #[test]
    fn test_write_json_matches_string() {
        let doc = MappingDocument::from_allocation(&allocation());
        let mut buffer = Vec::new();
        doc.write_json(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), doc.to_json_string().unwrap());
    }

    #[test]
    fn test_javascript_module() {
        let js = javascript_module(&allocation());
        assert!(js.contains("export const ivsToExternalCharMap = {"));
        assert!(js.contains("  '\\u845B\\uDB40\\uDD02': '\\uE000',  // mj000001"));
        assert!(js.contains("  '\\u845B\\uDB40\\uDD00': '\\uDB80\\uDC00',  // mj000002"));
        assert!(js.contains("strategy: 'staged_pua_allocation',"));
        assert!(js.contains("range: '0xE000-0xE000'"));
        assert!(js.contains("range: '0xF0000-0xF0000'"));
        assert!(js.contains("totalCharacters: 2"));
        assert!(js.is_ascii());
    }

    #[test]
    fn test_javascript_module_stats_block() {
        let js = javascript_module(&allocation());
        let stats = &js[js.find("export const puaAllocationStats").unwrap()..];
        assert_eq!(
            stats,
            "export const puaAllocationStats = {\n\
             \x20   strategy: 'staged_pua_allocation',\n\
             \x20   bmpPUA: {\n\
             \x20       allocated: 1,\n\
             \x20       capacity: 6400,\n\
             \x20       range: '0xE000-0xE000'\n\
             \x20   },\n\
             \x20   smpPUA: {\n\
             \x20       allocated: 1,\n\
             \x20       capacity: 65534,\n\
             \x20       range: '0xF0000-0xF0000'\n\
             \x20   },\n\
             \x20   totalCharacters: 2\n\
             };\n"
        );
    }

    #[test]
    fn test_javascript_module_unused_range() {
        let records = vec![VariationRecord::new(0x845B, 0, "mj000002").unwrap()];
        let allocation = StagedAllocator::new(AllocatorConfig::default())
            .unwrap()
            .allocate(records)
            .unwrap();
        let js = javascript_module(&allocation);
        assert!(js.contains("range: null"));
    }
}

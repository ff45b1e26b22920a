//! # IVS Oxide
//!
//! Staged Private Use Area allocation for Ideographic Variation Sequences.
//!
//! An Ideographic Variation Sequence (IVS) is a base ideograph followed by one
//! of the supplementary variation selectors VS17..VS256 (U+E0100..U+E01EF).
//! Many renderers ignore the selector, so each sequence is given a private
//! codepoint and a substitute font places the intended glyph there.
//!
//! ## Allocation
//!
//! - **Two ranges**: BMP PUA U+E000..U+F8FF (6,400) and plane 15 PUA
//!   U+F0000..U+FFFFD (65,534)
//! - **Priority order**: VS19, VS18, VS20, VS17, VS21..VS32
//! - **Staged placement**: VS19/VS18 fill the BMP range first, VS20 takes what
//!   is left of it, every other group goes to plane 15
//! - **Deterministic**: identical input gives byte-identical output
//!
//! ## Outputs
//!
//! - [`Allocation`]: sequence key to codepoint and glyph maps
//! - [`AllocationReport`]: per-range and per-group statistics
//! - [`export`]: JSON mapping document and JavaScript module
//! - [`substitute`]: rewriting IVS in text to their PUA characters
//!
//! ## Quick Start
//!
//! ```
//! use ivs_oxide::{AllocatorConfig, StagedAllocator, VariationRecord};
//!
//! # fn main() -> ivs_oxide::Result<()> {
//! let records = vec![
//!     VariationRecord::from_notation("845B_E0102", "MJ000001")?,
//!     VariationRecord::from_notation("845B_E0100", "MJ000002")?,
//! ];
//!
//! let allocation = StagedAllocator::new(AllocatorConfig::default())?.allocate(records)?;
//! assert_eq!(allocation.lookup(0x845B, 2).map(|e| e.codepoint), Some(0xE000));
//! assert_eq!(allocation.lookup(0x845B, 0).map(|e| e.codepoint), Some(0xF0000));
//! println!("{}", allocation.report().summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Unicode primitives
pub mod codec;
pub mod key;
pub mod selector;

// Input
pub mod collector;
pub mod record;

// Allocation
/// Allocator configuration options
pub mod config;
pub mod allocator;
pub mod report;

// Consumers
pub mod export;
pub mod substitute;

// Re-exports
pub use allocator::range::{RangeBounds, RangeName, BMP_PUA, SMP_PUA};
pub use allocator::{Allocation, AllocationEntry, StagedAllocator};
pub use codec::{decode_surrogate_pair, encode_surrogate_pair, render_scalar, CodeUnits};
pub use config::{AllocatorConfig, DuplicatePolicy, UnlistedGroupPolicy};
pub use error::{Error, Result};
pub use export::{javascript_module, MappingDocument};
pub use key::{build_key, SequenceKey};
pub use record::VariationRecord;
pub use report::AllocationReport;
pub use selector::{Selector, PRIORITY_ORDER};
pub use substitute::Substituter;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

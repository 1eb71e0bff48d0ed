#![forbid(unsafe_code)]

//! Label-to-dataset matching model for TUSCO anatomy maps (headless).
//!
//! Design goals:
//! - deterministic, testable outputs (candidate order is part of the contract)
//! - domain exceptions live in declarative rule tables, not inline logic
//! - no I/O: catalogs and scenes are handed in by the caller

pub mod catalog;
pub mod error;
pub mod geom;
pub mod normalize;
pub mod resolve;
pub mod rules;

pub use catalog::{Catalog, Species, TissueEntry};
pub use error::{Error, Result};
pub use normalize::{normalize_label, to_slug};
pub use resolve::{AliasMap, AvailableSlugSet, resolve_slug};
pub use rules::{FallbackRule, LabelMatcher, RuleTable, candidate_slugs_for_label};

#[cfg(test)]
mod tests;

//! Slug resolution against the set of datasets that actually exist.

use crate::normalize::normalize_label;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Normalized label variant -> slug. Insertion order is preserved so that
/// iteration (e.g. for diagnostics) is reproducible across runs.
pub type AliasMap = IndexMap<String, String>;

/// Slugs backed by a dataset file.
pub type AvailableSlugSet = FxHashSet<String>;

/// Picks the best candidate slug for a label.
///
/// An alias hit for the normalized label is inserted at the front of the
/// candidate order unless the slug is already a candidate (an alias overrides
/// priority but never removes other candidates).
///
/// - `available = Some(set)`: the first candidate present in the set, else
///   `None`. An empty set is a valid "no data available" state and yields
///   `None` for every label.
/// - `available = None`: the first candidate, unconditionally (best-effort
///   mode for callers that have no manifest).
///
/// Iteration follows candidate order, never map or set order, so the result
/// is fully deterministic for identical inputs.
pub fn resolve_slug(
    label: &str,
    candidates: &[String],
    available: Option<&AvailableSlugSet>,
    aliases: Option<&AliasMap>,
) -> Option<String> {
    let mut ordered: Vec<&str> = candidates.iter().map(String::as_str).collect();

    if let Some(slug) = aliases.and_then(|a| a.get(&normalize_label(label))) {
        if !ordered.iter().any(|c| *c == slug) {
            ordered.insert(0, slug);
        }
    }

    match available {
        Some(set) => ordered
            .iter()
            .find(|c| set.contains(**c))
            .map(|c| c.to_string()),
        None => ordered.first().map(|c| c.to_string()),
    }
}

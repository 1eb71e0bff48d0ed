//! Declarative fallback rules and candidate slug generation.
//!
//! A [`RuleTable`] is an ordered list of `(matcher, slugs)` pairs. Rules fire
//! in table order and every matching rule contributes its slugs, so the table
//! encodes priority the same way the detector registry in a diagram engine
//! does: register the most specific entry first.

use crate::normalize::{normalize_label, to_slug};
use rustc_hash::FxHashSet;

/// Predicate over a normalized label, expressed as data so that domain
/// exceptions stay independently testable from the generation algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMatcher {
    /// The whole normalized label equals the pattern.
    Exact(String),
    /// The normalized label equals any of the patterns.
    AnyOf(Vec<String>),
    /// The normalized label starts with the pattern.
    Prefix(String),
}

impl LabelMatcher {
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            LabelMatcher::Exact(pattern) => normalized == pattern,
            LabelMatcher::AnyOf(patterns) => patterns.iter().any(|p| normalized == p),
            LabelMatcher::Prefix(pattern) => normalized.starts_with(pattern.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FallbackRule {
    pub matcher: LabelMatcher,
    /// Slugs contributed when the matcher fires, most preferred first.
    pub slugs: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<FallbackRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, matcher: LabelMatcher, slugs: &[&str]) {
        self.rules.push(FallbackRule {
            matcher,
            slugs: slugs.iter().map(|s| s.to_string()).collect(),
        });
    }

    pub fn rules(&self) -> &[FallbackRule] {
        &self.rules
    }

    /// The rule table observed on the TUSCO body maps.
    pub fn default_tusco() -> Self {
        let mut table = Self::new();

        // The rule order is significant: exact organ-part entries must come
        // before the prefix entry for the same organ family.
        table.push(
            LabelMatcher::Exact("heart - left ventricle".to_string()),
            &["heart_left_ventricle", "heart"],
        );
        table.push(LabelMatcher::Prefix("heart".to_string()), &["heart"]);
        table.push(
            LabelMatcher::AnyOf(vec![
                "kidney - cortex".to_string(),
                "kidney - medulla".to_string(),
            ]),
            &["kidney"],
        );

        table
    }
}

/// Index of the first compound separator in a normalized label, if any.
///
/// A literal `" - "` run wins over `"/"`; a separator at position 0 yields no
/// base segment.
fn base_segment(normalized: &str) -> Option<&str> {
    let cut = match normalized.find(" - ") {
        Some(idx) => idx,
        None => normalized.find('/')?,
    };
    if cut == 0 {
        return None;
    }
    Some(normalized[..cut].trim())
}

/// Ordered, de-duplicated candidate slugs for one label.
///
/// Earlier candidates are preferred by the resolver, so ordering here is
/// load-bearing: rule contributions (table order), then the full-label slug,
/// then the base-segment fallback for compound labels.
pub fn candidate_slugs_for_label(label: &str, table: &RuleTable) -> Vec<String> {
    let norm = normalize_label(label);

    let mut candidates: Vec<String> = Vec::new();
    for rule in table.rules() {
        if rule.matcher.matches(&norm) {
            candidates.extend(rule.slugs.iter().cloned());
        }
    }

    let full = to_slug(&norm);
    if !full.is_empty() {
        candidates.push(full);
    }

    if let Some(base) = base_segment(&norm) {
        let base_slug = to_slug(base);
        if !base_slug.is_empty() {
            candidates.push(base_slug);
        }
    }

    let mut seen = FxHashSet::default();
    candidates.retain(|slug| seen.insert(slug.clone()));
    candidates
}

//! Dataset catalog: the per-species listing of tissue dataset files, and the
//! naming conventions tying slugs to files and download URLs.
//!
//! Canonical per-tissue files are named `tusco_{species}_{slug}.tsv` and are
//! served under `/data/{species}/`. The catalog derives two read-only views
//! used during linking: the set of slugs actually backed by a file, and an
//! alias table mapping normalized display names to file slugs.

use crate::error::{Error, Result};
use crate::normalize::{normalize_label, to_slug};
use crate::resolve::{AliasMap, AvailableSlugSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Human,
    Mouse,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Human => "human",
            Species::Mouse => "mouse",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Species::Human),
            "mouse" => Ok(Species::Mouse),
            other => Err(Error::UnknownSpecies {
                name: other.to_string(),
            }),
        }
    }
}

/// One row of the listing API response for a species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TissueEntry {
    #[serde(rename = "tissueName")]
    pub tissue_name: String,
    #[serde(rename = "uberonId", default)]
    pub uberon_id: Option<String>,
    #[serde(rename = "filename")]
    pub file_name: String,
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
}

/// A species' dataset catalog plus the derived matching views.
#[derive(Debug, Clone)]
pub struct Catalog {
    species: Species,
    entries: Vec<TissueEntry>,
    available: AvailableSlugSet,
    aliases: AliasMap,
}

impl Catalog {
    pub fn from_entries(species: Species, entries: Vec<TissueEntry>) -> Self {
        let mut available = AvailableSlugSet::default();
        let mut aliases = AliasMap::new();

        for entry in &entries {
            let Some(slug) = dataset_slug_from_file_name(species, &entry.file_name) else {
                tracing::debug!(
                    file_name = entry.file_name.as_str(),
                    "catalog entry has no canonical slug"
                );
                continue;
            };
            available.insert(slug.to_string());

            let norm = normalize_label(&entry.tissue_name);
            if norm.is_empty() {
                continue;
            }
            // An alias that only restates the label's own slug adds nothing:
            // candidate generation already yields it.
            if to_slug(&norm) == slug {
                continue;
            }
            // First entry wins on conflicting display names.
            aliases.entry(norm).or_insert_with(|| slug.to_string());
        }

        Self {
            species,
            entries,
            available,
            aliases,
        }
    }

    /// Parses a listing API response body (a JSON array of entries).
    pub fn from_json(species: Species, text: &str) -> Result<Self> {
        let entries: Vec<TissueEntry> = serde_json::from_str(text)?;
        Ok(Self::from_entries(species, entries))
    }

    /// Merges domain-specific alias overrides; an override wins over a seed
    /// alias for the same normalized label.
    pub fn with_aliases<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (label, slug) in overrides {
            self.aliases.insert(normalize_label(&label), slug);
        }
        self
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn entries(&self) -> &[TissueEntry] {
        &self.entries
    }

    pub fn available_slugs(&self) -> &AvailableSlugSet {
        &self.available
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }
}

/// Extracts the slug from a canonical `tusco_{species}_{slug}.tsv` file name.
/// Non-conforming names yield `None`.
pub fn dataset_slug_from_file_name(species: Species, file_name: &str) -> Option<&str> {
    let rest = file_name.strip_prefix("tusco_")?;
    let rest = rest.strip_prefix(species.as_str())?;
    let rest = rest.strip_prefix('_')?;
    let slug = rest.strip_suffix(".tsv")?;
    if slug.is_empty() {
        return None;
    }
    Some(slug)
}

/// Canonical file name for a slug: `tusco_{species}_{slug}.tsv`.
pub fn dataset_file_name(species: Species, slug: &str) -> String {
    format!("tusco_{species}_{slug}.tsv")
}

/// Download URL for a slug. Slugs match `[a-z0-9_]+`, so the result needs no
/// escaping; the suggested download name is the last path segment.
pub fn dataset_href(species: Species, slug: &str) -> String {
    format!("/data/{species}/{}", dataset_file_name(species, slug))
}

fn header_tissue_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)#\s*Gene IDs passing expressed in\s+(.+)\s+\(UBERON:[^)]+\)\s+filter")
            .expect("valid regex")
    })
}

/// Recovers the tissue display name from a dataset's first header line:
/// `# Gene IDs passing expressed in <tissue> (UBERON:xxxxx) filter`.
pub fn tissue_name_from_header(line: &str) -> Option<String> {
    header_tissue_regex()
        .captures(line)
        .map(|caps| caps[1].trim().to_string())
}

/// The rename rule for legacy `UBERON:*.tsv` exports: header tissue name ->
/// canonical `tusco_{species}_{slug}.tsv`.
pub fn canonical_dataset_name(species: Species, header_line: &str) -> Option<String> {
    let name = tissue_name_from_header(header_line)?;
    let slug = to_slug(&normalize_label(&name));
    if slug.is_empty() {
        return None;
    }
    Some(dataset_file_name(species, &slug))
}

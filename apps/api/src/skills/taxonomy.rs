//! Taxonomy Store: maps lowercase skill aliases to canonical skill names.
//!
//! Loaded once at startup and shared read-only behind an `Arc`.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::errors::DataLoadError;
use crate::skills::normalizer::clean_skill;

#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    aliases: HashMap<String, String>,
}

impl Taxonomy {
    /// Reads and validates the alias map from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let raw = DataLoadError::read(path)?;
        let taxonomy = Self::from_json_str(&raw, &path.display().to_string())?;
        info!(
            aliases = taxonomy.len(),
            path = %path.display(),
            "Skill taxonomy loaded"
        );
        Ok(taxonomy)
    }

    /// Parses `{"alias": "Canonical", ...}`. `origin` names the source in errors.
    pub fn from_json_str(raw: &str, origin: &str) -> Result<Self, DataLoadError> {
        let map: HashMap<String, String> =
            serde_json::from_str(raw).map_err(|source| DataLoadError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        Self::from_pairs(map, origin)
    }

    /// Builds a taxonomy from alias/canonical pairs, rejecting anything that
    /// would make normalization unstable.
    pub fn from_pairs<I, K, V>(pairs: I, origin: &str) -> Result<Self, DataLoadError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let invalid = |reason: String| DataLoadError::Invalid {
            origin: origin.to_string(),
            reason,
        };

        let mut aliases = HashMap::new();
        for (alias, canonical) in pairs {
            let key = alias.as_ref().trim().to_lowercase();
            let canonical: String = canonical.into();
            if key.is_empty() {
                return Err(invalid("empty alias key".to_string()));
            }
            if canonical.trim().is_empty() {
                return Err(invalid(format!("alias '{key}' maps to an empty name")));
            }
            if clean_skill(&canonical).as_deref() != Some(canonical.as_str()) {
                return Err(invalid(format!(
                    "canonical name '{canonical}' contains characters removed by cleaning"
                )));
            }
            aliases.insert(key, canonical);
        }

        let taxonomy = Self { aliases };

        // Every canonical name must resolve to itself, otherwise normalizing
        // an already-normalized set would change it.
        for canonical in taxonomy.aliases.values() {
            let resolved = taxonomy.resolve_alias(canonical);
            if resolved != *canonical {
                return Err(invalid(format!(
                    "canonical name '{canonical}' is itself an alias of '{resolved}'"
                )));
            }
        }

        Ok(taxonomy)
    }

    /// Returns the canonical name for `raw`, or `raw` unchanged if it is not a known alias.
    pub fn resolve_alias(&self, raw: &str) -> String {
        self.aliases
            .get(&raw.trim().to_lowercase())
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Distinct canonical names, sorted.
    pub fn canonical_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.aliases.values().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

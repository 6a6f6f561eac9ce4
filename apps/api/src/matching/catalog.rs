//! Occupation Catalog: weighted skill requirements per occupation.
//!
//! Records are validated at the load boundary: raw JSON rows are parsed into
//! loosely typed `Raw*` structs first, then checked and converted into
//! `Occupation` values. Nothing downstream re-validates.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::DataLoadError;

pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill: String,
    /// Importance, 1 (secondary) to 5 (critical).
    pub weight: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupation {
    pub name: String,
    pub skills_required: Vec<SkillRequirement>,
}

impl Occupation {
    pub fn total_weight(&self) -> u32 {
        self.skills_required.iter().map(|r| u32::from(r.weight)).sum()
    }
}

#[derive(Debug, Deserialize)]
struct RawOccupation {
    #[serde(alias = "occupation")]
    name: String,
    #[serde(default)]
    skills_required: Vec<RawRequirement>,
}

#[derive(Debug, Deserialize)]
struct RawRequirement {
    skill: String,
    // wide enough that out-of-range weights reach validation
    weight: i64,
}

/// The validated, immutable occupation list, in file order.
#[derive(Debug, Clone, Default)]
pub struct OccupationCatalog {
    occupations: Vec<Occupation>,
}

impl OccupationCatalog {
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let raw = DataLoadError::read(path)?;
        Self::from_json_str(&raw, &path.display().to_string())
    }

    pub fn from_json_str(raw: &str, origin: &str) -> Result<Self, DataLoadError> {
        let rows: Vec<RawOccupation> =
            serde_json::from_str(raw).map_err(|source| DataLoadError::Parse {
                origin: origin.to_string(),
                source,
            })?;

        let invalid = |reason: String| DataLoadError::Invalid {
            origin: origin.to_string(),
            reason,
        };

        let mut names = HashSet::new();
        let mut occupations = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            let name = row.name.trim().to_string();
            if name.is_empty() {
                return Err(invalid(format!("occupation #{index} has an empty name")));
            }
            if !names.insert(name.to_lowercase()) {
                return Err(invalid(format!("occupation '{name}' is listed twice")));
            }
            if row.skills_required.is_empty() {
                return Err(invalid(format!("occupation '{name}' has no required skills")));
            }

            let mut skills = HashSet::new();
            let mut skills_required = Vec::with_capacity(row.skills_required.len());
            for req in row.skills_required {
                let skill = req.skill.trim().to_string();
                if skill.is_empty() {
                    return Err(invalid(format!("occupation '{name}' has an empty skill")));
                }
                let weight = u8::try_from(req.weight)
                    .ok()
                    .filter(|w| (MIN_WEIGHT..=MAX_WEIGHT).contains(w))
                    .ok_or_else(|| {
                        invalid(format!(
                            "occupation '{name}': weight {} for '{skill}' is outside {MIN_WEIGHT}-{MAX_WEIGHT}",
                            req.weight
                        ))
                    })?;
                if !skills.insert(skill.clone()) {
                    return Err(invalid(format!(
                        "occupation '{name}' lists '{skill}' more than once"
                    )));
                }
                skills_required.push(SkillRequirement { skill, weight });
            }

            occupations.push(Occupation {
                name,
                skills_required,
            });
        }

        Ok(Self { occupations })
    }

    pub fn occupations(&self) -> &[Occupation] {
        &self.occupations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Occupation> {
        self.occupations.iter()
    }

    pub fn len(&self) -> usize {
        self.occupations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupations.is_empty()
    }

    /// Case-insensitive lookup by occupation name.
    pub fn find(&self, name: &str) -> Option<&Occupation> {
        let name = name.trim().to_lowercase();
        self.occupations
            .iter()
            .find(|o| o.name.to_lowercase() == name)
    }

    /// Distinct required skills across the catalog, first-seen order.
    pub fn skill_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.occupations
            .iter()
            .flat_map(|o| o.skills_required.iter())
            .map(|r| r.skill.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

/// Lazily loads the catalog once and hands out the cached copy afterwards.
#[derive(Debug)]
pub struct CatalogSource {
    path: PathBuf,
    cell: OnceLock<Arc<OccupationCatalog>>,
}

impl CatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    /// Returns the catalog, reading the file only on the first successful call.
    pub fn load_occupations(&self) -> Result<Arc<OccupationCatalog>, DataLoadError> {
        if let Some(catalog) = self.cell.get() {
            return Ok(Arc::clone(catalog));
        }
        let catalog = Arc::new(OccupationCatalog::load(&self.path)?);
        info!(
            occupations = catalog.len(),
            path = %self.path.display(),
            "Occupation catalog loaded"
        );
        Ok(Arc::clone(self.cell.get_or_init(|| catalog)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"[
        {"name": "Data Scientist", "skills_required": [
            {"skill": "Python", "weight": 5},
            {"skill": "SQL", "weight": 4},
            {"skill": "Statistics", "weight": 3}
        ]},
        {"occupation": "DevOps Engineer", "skills_required": [
            {"skill": "Docker", "weight": 5},
            {"skill": "Python", "weight": 2}
        ]}
    ]"#;

    fn invalid_reason(json: &str) -> String {
        match OccupationCatalog::from_json_str(json, "test").unwrap_err() {
            DataLoadError::Invalid { reason, .. } => reason,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_parses_valid_catalog_in_order() {
        let catalog = OccupationCatalog::from_json_str(VALID, "test").unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.occupations()[0].name, "Data Scientist");
        assert_eq!(catalog.occupations()[1].name, "DevOps Engineer");
        assert_eq!(catalog.occupations()[0].total_weight(), 12);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = OccupationCatalog::from_json_str(VALID, "test").unwrap();
        assert_eq!(catalog.find(" devops engineer ").unwrap().name, "DevOps Engineer");
        assert!(catalog.find("Astronaut").is_none());
    }

    #[test]
    fn test_skill_names_distinct_in_catalog_order() {
        let catalog = OccupationCatalog::from_json_str(VALID, "test").unwrap();
        assert_eq!(catalog.skill_names(), vec!["Python", "SQL", "Statistics", "Docker"]);
    }

    #[test]
    fn test_rejects_weight_out_of_range() {
        for weight in [0, 6, -1, 300] {
            let json = format!(
                r#"[{{"name": "X", "skills_required": [{{"skill": "Go", "weight": {weight}}}]}}]"#
            );
            assert!(invalid_reason(&json).contains("weight"));
        }
    }

    #[test]
    fn test_rejects_empty_name() {
        let json = r#"[{"name": "  ", "skills_required": [{"skill": "Go", "weight": 3}]}]"#;
        assert!(invalid_reason(json).contains("empty name"));
    }

    #[test]
    fn test_rejects_empty_requirements() {
        assert!(invalid_reason(r#"[{"name": "X", "skills_required": []}]"#)
            .contains("no required skills"));
        assert!(invalid_reason(r#"[{"name": "X"}]"#).contains("no required skills"));
    }

    #[test]
    fn test_rejects_duplicate_skill_and_occupation() {
        let dup_skill = r#"[{"name": "X", "skills_required": [
            {"skill": "Go", "weight": 3}, {"skill": "Go", "weight": 1}]}]"#;
        assert!(invalid_reason(dup_skill).contains("more than once"));

        let dup_occ = r#"[
            {"name": "X", "skills_required": [{"skill": "Go", "weight": 3}]},
            {"name": "x", "skills_required": [{"skill": "Go", "weight": 3}]}]"#;
        assert!(invalid_reason(dup_occ).contains("listed twice"));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let err = OccupationCatalog::from_json_str(r#"{"name": "X"}"#, "test").unwrap_err();
        assert!(matches!(err, DataLoadError::Parse { .. }));
        let err = OccupationCatalog::from_json_str(
            r#"[{"name": "X", "skills_required": [{"skill": "Go", "weight": "high"}]}]"#,
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, DataLoadError::Parse { .. }));
    }

    #[test]
    fn test_source_reads_file_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();
        let source = CatalogSource::new(file.path());

        let first = source.load_occupations().unwrap();

        // Breaking the file after the first load must not matter.
        std::fs::write(file.path(), "not json").unwrap();
        let second = source.load_occupations().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_source_missing_file_is_error() {
        let source = CatalogSource::new("/no/such/occupations.json");
        assert!(matches!(
            source.load_occupations().unwrap_err(),
            DataLoadError::Missing { .. }
        ));
    }

    #[test]
    fn test_shipped_catalog_is_valid() {
        let catalog = OccupationCatalog::from_json_str(
            include_str!("../../data/occupations.json"),
            "occupations.json",
        )
        .unwrap();
        assert!(catalog.len() >= 10);
        assert!(catalog.find("Data Scientist").is_some());
    }
}

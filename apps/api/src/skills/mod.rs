//! Skill handling: alias taxonomy, similarity, normalization and extraction.
//!
//! Everything here is synchronous and free of shared mutable state except
//! the extraction adapters, which talk to the outside world.

pub mod extraction;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
pub mod resume_text;
pub mod similarity;
pub mod taxonomy;

use serde::{Deserialize, Serialize};

/// A set of canonical skills in case-insensitive alphabetical order.
///
/// No two entries are equal ignoring case; the first spelling inserted wins.
/// Membership is exact string equality, which is what occupation requirements
/// are matched against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet {
    skills: Vec<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.skills
    }

    /// Inserts a skill unless an entry equal ignoring case is already present.
    /// Returns whether the set changed.
    pub fn insert(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        let key = skill.to_lowercase();
        match self
            .skills
            .binary_search_by(|probe| probe.to_lowercase().cmp(&key))
        {
            Ok(_) => false,
            Err(pos) => {
                self.skills.insert(pos, skill);
                true
            }
        }
    }
}

impl FromIterator<String> for SkillSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for SkillSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(skills: Vec<String>) -> Self {
        skills.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.skills
    }
}

impl IntoIterator for SkillSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.skills.into_iter()
    }
}

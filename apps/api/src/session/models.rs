use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::scorer::MatchResult;
use crate::skills::SkillSet;

/// What the user told us about themselves, minus the raw text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub experience_years: Option<u8>,
    pub interests: Vec<String>,
    /// Length of the submitted profile text, in chars.
    pub text_chars: usize,
}

/// Per-user working state. Owned by exactly one session id; never shared.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub profile: Option<Profile>,
    pub skills: SkillSet,
    /// Result of the latest ranking call; replaced on every call and
    /// cleared whenever the skill set changes.
    pub matches: Vec<MatchResult>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile: None,
            skills: SkillSet::new(),
            matches: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    /// Replaces the skill set; previous matches no longer apply.
    pub fn set_skills(&mut self, skills: SkillSet) {
        self.skills = skills;
        self.matches.clear();
    }
}

//! Match Scorer: weighted coverage of an occupation's requirements by a skill set.
//!
//! Algorithm, per occupation:
//! 1. total = Σ weight over all requirements
//! 2. covered = Σ weight over requirements whose skill is in the user's set
//! 3. score = covered / max(1, total), rounded to 3 decimals
//! 4. gaps = uncovered requirements, in requirement order
//!
//! Ranking sorts by score descending with a stable sort, so ties keep catalog order.

use serde::{Deserialize, Serialize};

use crate::matching::catalog::Occupation;
use crate::skills::SkillSet;

/// Result of scoring one occupation. Derived on every call, never stored
/// anywhere but the requesting session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub occupation: Occupation,
    /// 0.0 – 1.0, three decimals
    pub score: f64,
    pub matched_weight: u32,
    pub total_weight: u32,
    pub gaps: Vec<String>,
}

impl MatchResult {
    /// Whole-number percentage, truncated.
    pub fn score_percent(&self) -> u32 {
        (self.score * 100.0).floor() as u32
    }
}

pub fn score_occupation(occupation: &Occupation, user_skills: &SkillSet) -> MatchResult {
    let total_weight = occupation.total_weight();
    let matched_weight: u32 = occupation
        .skills_required
        .iter()
        .filter(|r| user_skills.contains(&r.skill))
        .map(|r| u32::from(r.weight))
        .sum();

    let score = round3(f64::from(matched_weight) / f64::from(total_weight.max(1)));

    MatchResult {
        occupation: occupation.clone(),
        score,
        matched_weight,
        total_weight,
        gaps: gaps_for(occupation, user_skills),
    }
}

/// Scores every occupation and returns the best `top_k`.
pub fn rank(user_skills: &SkillSet, occupations: &[Occupation], top_k: usize) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = occupations
        .iter()
        .map(|o| score_occupation(o, user_skills))
        .collect();

    // sort_by is stable: equal scores stay in catalog order
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(top_k);
    results
}

/// Required skills the user does not have, in the occupation's requirement order.
pub fn gaps_for(occupation: &Occupation, user_skills: &SkillSet) -> Vec<String> {
    occupation
        .skills_required
        .iter()
        .filter(|r| !user_skills.contains(&r.skill))
        .map(|r| r.skill.clone())
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

//! Skill Extraction: pluggable adapters that turn free text into raw skill candidates.
//!
//! Default: `LlmSkillExtractor` (asks the text-generation service for a JSON array).
//! Offline: `KeywordSkillExtractor` (scans for known aliases and catalog skills).
//!
//! `AppState` holds an `Arc<dyn SkillExtractor>`, chosen at startup via `SKILL_EXTRACTOR`.
//! Adapters never fail because a reply is unparseable; they return what they
//! could salvage, possibly nothing.

use std::collections::HashSet;

use aho_corasick::{AhoCorasick, BuildError, MatchKind};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_code_fences, LlmClient, LlmError};
use crate::skills::prompts::SKILL_EXTRACTION_PROMPT;

/// Cap on skills salvaged from a reply that is not a JSON array.
const FALLBACK_LINE_LIMIT: usize = 15;
/// Bullet characters stripped from fallback lines.
const BULLET_CHARS: &[char] = &['-', '*', '•', '\t', ' '];
/// Keyword patterns shorter than this are too ambiguous to scan for.
const MIN_KEYWORD_CHARS: usize = 2;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("text-generation service failed: {0}")]
    Service(#[from] LlmError),

    #[error("could not build keyword matcher: {0}")]
    Matcher(#[from] BuildError),
}

#[async_trait]
pub trait SkillExtractor: Send + Sync {
    /// Short label for logs and responses.
    fn backend(&self) -> &'static str;

    async fn extract(&self, text: &str) -> Result<Vec<String>, ExtractionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmSkillExtractor
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmSkillExtractor(pub LlmClient);

#[async_trait]
impl SkillExtractor for LlmSkillExtractor {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn extract(&self, text: &str) -> Result<Vec<String>, ExtractionError> {
        let prompt = SKILL_EXTRACTION_PROMPT.replace("{text}", text);
        let reply = self.0.complete(&prompt, JSON_ONLY_SYSTEM).await?;
        let skills = parse_skill_list(&reply);
        info!(count = skills.len(), model = self.0.model(), "LLM skill extraction finished");
        Ok(skills)
    }
}

/// Salvages a skill list from an LLM reply.
///
/// A JSON array (or an object with a `skills` array) yields its string and
/// number items. Anything else falls back to one skill per non-blank line,
/// bullets stripped, at most `FALLBACK_LINE_LIMIT` lines.
pub fn parse_skill_list(reply: &str) -> Vec<String> {
    let body = strip_code_fences(reply);

    let items = match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => Some(items),
        Ok(Value::Object(mut map)) => match map.remove("skills") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    };

    match items {
        Some(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        None => {
            debug!("Extraction reply is not a JSON array, falling back to lines");
            body.lines()
                .map(|line| line.trim_matches(BULLET_CHARS).trim())
                .filter(|line| !line.is_empty())
                .take(FALLBACK_LINE_LIMIT)
                .map(str::to_string)
                .collect()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordSkillExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic extractor: finds whole-term, case-insensitive occurrences of
/// known skill terms (taxonomy aliases, canonical names, catalog skills).
pub struct KeywordSkillExtractor {
    matcher: AhoCorasick,
    patterns: usize,
}

impl KeywordSkillExtractor {
    pub fn new<I, S>(terms: I) -> Result<Self, ExtractionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let patterns: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| t.chars().count() >= MIN_KEYWORD_CHARS)
            .filter(|t| seen.insert(t.clone()))
            .collect();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)?;

        Ok(Self {
            matcher,
            patterns: patterns.len(),
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns
    }

    /// Matched spans as written in `text`, first occurrence order, deduped ignoring case.
    pub fn scan(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for m in self.matcher.find_iter(text) {
            if !is_term_boundary(text, m.start(), m.end()) {
                continue;
            }
            let term = &text[m.start()..m.end()];
            if seen.insert(term.to_lowercase()) {
                found.push(term.to_string());
            }
        }
        found
    }
}

#[async_trait]
impl SkillExtractor for KeywordSkillExtractor {
    fn backend(&self) -> &'static str {
        "keyword"
    }

    async fn extract(&self, text: &str) -> Result<Vec<String>, ExtractionError> {
        let skills = self.scan(text);
        info!(count = skills.len(), "Keyword skill extraction finished");
        Ok(skills)
    }
}

fn is_term_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json_array() {
        let skills = parse_skill_list(r#"["Python", " SQL ", "Excel"]"#);
        assert_eq!(skills, vec!["Python", "SQL", "Excel"]);
    }

    #[test]
    fn test_parse_fenced_json_array() {
        let skills = parse_skill_list("```json\n[\"Docker\", \"Kubernetes\"]\n```");
        assert_eq!(skills, vec!["Docker", "Kubernetes"]);
    }

    #[test]
    fn test_parse_keeps_numbers_and_drops_other_items() {
        let skills = parse_skill_list(r#"["Python", 3, null, {"x": 1}, "", true]"#);
        assert_eq!(skills, vec!["Python", "3"]);
    }

    #[test]
    fn test_parse_object_with_skills_key() {
        let skills = parse_skill_list(r#"{"skills": ["Go", "Rust"]}"#);
        assert_eq!(skills, vec!["Go", "Rust"]);
    }

    #[test]
    fn test_parse_falls_back_to_lines() {
        let reply = "Here are the skills:\n- Python\n* SQL\n• Tableau\n\n  -  \n";
        let skills = parse_skill_list(reply);
        assert_eq!(skills, vec!["Here are the skills:", "Python", "SQL", "Tableau"]);
    }

    #[test]
    fn test_parse_fallback_is_capped() {
        let reply: String = (0..40).map(|i| format!("- skill {i}\n")).collect();
        assert_eq!(parse_skill_list(&reply).len(), FALLBACK_LINE_LIMIT);
    }

    #[test]
    fn test_parse_empty_reply_is_empty_list() {
        assert!(parse_skill_list("").is_empty());
        assert!(parse_skill_list("[]").is_empty());
    }

    fn keyword_extractor() -> KeywordSkillExtractor {
        KeywordSkillExtractor::new([
            "ms excel",
            "Excel",
            "SQL",
            "PostgreSQL",
            "Python",
            "Machine Learning",
            "machine",
            "C++",
            "R",
        ])
        .unwrap()
    }

    #[test]
    fn test_keyword_scan_finds_terms_case_insensitively() {
        let found = keyword_extractor().scan("Built dashboards in MS Excel and python; heavy SQL.");
        assert_eq!(found, vec!["MS Excel", "python", "SQL"]);
    }

    #[test]
    fn test_keyword_scan_respects_word_boundaries() {
        // "SQL" inside "PostgreSQL" and "NoSQL" must not match on its own
        let found = keyword_extractor().scan("PostgreSQL and NoSQL stores");
        assert_eq!(found, vec!["PostgreSQL"]);
    }

    #[test]
    fn test_keyword_scan_prefers_longest_term() {
        let found = keyword_extractor().scan("Applied machine learning to C++ services");
        assert_eq!(found, vec!["machine learning", "C++"]);
    }

    #[test]
    fn test_keyword_scan_dedupes_and_skips_single_letters() {
        let extractor = keyword_extractor();
        assert_eq!(extractor.pattern_count(), 8);
        let found = extractor.scan("R, Python, PYTHON and python again");
        assert_eq!(found, vec!["Python"]);
    }

    #[tokio::test]
    async fn test_keyword_extract_empty_text() {
        let skills = keyword_extractor().extract("").await.unwrap();
        assert!(skills.is_empty());
    }
}

//! Skill Normalizer: turns noisy skill mentions into a canonical `SkillSet`.
//!
//! Pipeline:
//! 1. clean each entry against the character allow-list (ASCII letters and
//!    digits plus `+ # . / -`), dropping empty or punctuation-only results
//! 2. resolve aliases through the taxonomy
//! 3. fuzzy dedupe in first-seen order: a candidate scoring above the
//!    threshold against any accepted entry is dropped
//! 4. case-insensitive dedupe and sort
//!
//! Step 3 is order-sensitive: of two near-duplicates, whichever arrives first
//! is the one kept.

use std::sync::Arc;

use tracing::debug;

use crate::skills::similarity::{SimilarityMetric, DEDUPE_THRESHOLD};
use crate::skills::taxonomy::Taxonomy;
use crate::skills::SkillSet;

/// Characters kept besides letters, digits and whitespace.
const ALLOWED_PUNCTUATION: &[char] = &['+', '#', '.', '/', '-'];

#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    taxonomy: Arc<Taxonomy>,
    metric: SimilarityMetric,
    threshold: f64,
}

impl SkillNormalizer {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            taxonomy,
            metric: SimilarityMetric::default(),
            threshold: DEDUPE_THRESHOLD,
        }
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn normalize<I, S>(&self, raw_skills: I) -> SkillSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted: Vec<String> = Vec::new();

        for raw in raw_skills {
            let raw = raw.as_ref();
            let Some(cleaned) = clean_skill(raw) else {
                debug!(raw, "Dropping skill with no usable characters");
                continue;
            };
            let candidate = self.taxonomy.resolve_alias(&cleaned);

            if let Some(kept) = accepted
                .iter()
                .find(|kept| self.metric.score(&candidate, kept) > self.threshold)
            {
                debug!(candidate = %candidate, kept = %kept, "Dropping near-duplicate skill");
                continue;
            }
            accepted.push(candidate);
        }

        accepted.into_iter().collect()
    }
}

/// Strips characters outside the allow-list and collapses whitespace.
///
/// Returns `None` when nothing remains or only punctuation remains.
pub fn clean_skill(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(c))
        .collect();
    let cleaned = kept.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.chars().any(|c| c.is_ascii_alphanumeric()) {
        Some(cleaned)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::similarity::indel_ratio;

    fn normalizer(pairs: &[(&str, &str)]) -> SkillNormalizer {
        let taxonomy = Taxonomy::from_pairs(pairs.iter().copied(), "test").unwrap();
        SkillNormalizer::new(Arc::new(taxonomy))
    }

    fn default_normalizer() -> SkillNormalizer {
        normalizer(&[
            ("ms excel", "Excel"),
            ("microsoft excel", "Excel"),
            ("postgresql", "SQL"),
            ("postgres", "SQL"),
            ("js", "JavaScript"),
            ("ml", "Machine Learning"),
        ])
    }

    #[test]
    fn test_clean_skill_strips_disallowed_characters() {
        assert_eq!(clean_skill("C++ (advanced)!").as_deref(), Some("C++ advanced"));
        assert_eq!(clean_skill("  Node.js  ").as_deref(), Some("Node.js"));
        assert_eq!(clean_skill("CI/CD").as_deref(), Some("CI/CD"));
        assert_eq!(clean_skill("C#").as_deref(), Some("C#"));
        assert_eq!(clean_skill("machine\t\tlearning").as_deref(), Some("machine learning"));
    }

    #[test]
    fn test_clean_skill_drops_blank_and_punctuation_only() {
        assert_eq!(clean_skill(""), None);
        assert_eq!(clean_skill("   "), None);
        assert_eq!(clean_skill("!!!"), None);
        assert_eq!(clean_skill("--"), None);
        assert_eq!(clean_skill("#"), None);
    }

    #[test]
    fn test_clean_skill_keeps_only_ascii_letters_and_digits() {
        assert_eq!(clean_skill("Français").as_deref(), Some("Franais"));
        assert_eq!(clean_skill("日本語"), None);
        assert_eq!(clean_skill("Go 1.22 – modules").as_deref(), Some("Go 1.22 modules"));
        assert_eq!(clean_skill("ms   excel").as_deref(), Some("ms excel"));
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        let out = default_normalizer().normalize(Vec::<String>::new());
        assert!(out.is_empty());
    }

    #[test]
    fn test_alias_resolution() {
        let out = default_normalizer().normalize(["MS Excel"]);
        assert!(out.contains("Excel"));
        assert!(!out.contains("MS Excel"));
    }

    #[test]
    fn test_alias_and_blank_scenario() {
        let n = normalizer(&[("ms excel", "Excel"), ("postgresql", "SQL")]);
        let out = n.normalize(["ms excel", "PostgreSQL", "  "]);
        assert_eq!(out.as_slice(), &["Excel", "SQL"]);
    }

    #[test]
    fn test_aliases_collapse_to_one_entry() {
        let out = default_normalizer().normalize(["Postgres", "postgresql", "SQL"]);
        assert_eq!(out.as_slice(), &["SQL"]);
    }

    #[test]
    fn test_fuzzy_duplicate_dropped_first_seen_wins() {
        let n = default_normalizer();
        let out = n.normalize(["Microsoft Azure", "Microsoft Azures"]);
        assert_eq!(out.as_slice(), &["Microsoft Azure"]);

        let out = n.normalize(["Microsoft Azures", "Microsoft Azure"]);
        assert_eq!(out.as_slice(), &["Microsoft Azures"]);
    }

    #[test]
    fn test_case_variants_deduped_case_insensitively() {
        // "Python" vs "python" scores ~83, below the threshold,
        // so the final case-insensitive pass is what removes it.
        let out = default_normalizer().normalize(["Python", "python", "PYTHON"]);
        assert_eq!(out.as_slice(), &["Python"]);
    }

    #[test]
    fn test_output_sorted_case_insensitively() {
        let out = default_normalizer().normalize(["sql", "Airflow", "docker", "Bash"]);
        assert_eq!(out.as_slice(), &["Airflow", "Bash", "docker", "sql"]);
    }

    #[test]
    fn test_distinct_short_skills_survive() {
        let out = default_normalizer().normalize(["C", "C++", "C#", "R", "Go"]);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = default_normalizer();
        let inputs: Vec<Vec<&str>> = vec![
            vec!["ms excel", "PostgreSQL", "  ", "Python", "python3", "js"],
            vec!["Machine Learning", "ML", "machine-learning", "Deep Learning"],
            vec!["Data Analysis", "Data Analyst", "Data Analytics", "!!", "Tableau"],
            vec!["React", "React.js", "ReactJS", "Vue", "Angular"],
        ];
        for input in inputs {
            let once = n.normalize(&input);
            let twice = n.normalize(once.iter());
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_no_near_duplicates_in_output() {
        let n = default_normalizer();
        let out = n.normalize([
            "Data Analysis",
            "Data Analysis.",
            "Data Analyses",
            "Project Management",
            "Project Manager",
            "Project-Management",
            "Communication",
            "Communications",
        ]);
        let skills = out.as_slice();
        for (i, a) in skills.iter().enumerate() {
            for b in &skills[i + 1..] {
                assert!(
                    indel_ratio(a, b) <= DEDUPE_THRESHOLD,
                    "{a} and {b} are near-duplicates"
                );
            }
        }
    }

    #[test]
    fn test_custom_threshold() {
        let strict = default_normalizer().with_threshold(50.0);
        let out = strict.normalize(["Python", "Pythonic"]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_alternate_metric() {
        let n = default_normalizer().with_metric(SimilarityMetric::JaroWinkler);
        assert_eq!(n.metric(), SimilarityMetric::JaroWinkler);
        let out = n.normalize(["Kubernetes", "Kubernetess"]);
        assert_eq!(out.as_slice(), &["Kubernetes"]);
    }
}

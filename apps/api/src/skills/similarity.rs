//! String similarity on a 0–100 scale, used to spot near-duplicate skills.

use std::str::FromStr;

use anyhow::bail;

/// Above this score two skill strings are treated as the same skill.
pub const DEDUPE_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimilarityMetric {
    /// Normalized InDel ratio: `100 * (1 - indel / (len_a + len_b))`.
    #[default]
    Indel,
    /// `strsim::normalized_levenshtein`, scaled to 100.
    Levenshtein,
    /// `strsim::jaro_winkler`, scaled to 100.
    JaroWinkler,
}

impl SimilarityMetric {
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::Indel => indel_ratio(a, b),
            SimilarityMetric::Levenshtein => strsim::normalized_levenshtein(a, b) * 100.0,
            SimilarityMetric::JaroWinkler => strsim::jaro_winkler(a, b) * 100.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimilarityMetric::Indel => "indel",
            SimilarityMetric::Levenshtein => "levenshtein",
            SimilarityMetric::JaroWinkler => "jaro_winkler",
        }
    }
}

impl FromStr for SimilarityMetric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indel" | "ratio" => Ok(Self::Indel),
            "levenshtein" => Ok(Self::Levenshtein),
            "jaro_winkler" | "jaro-winkler" => Ok(Self::JaroWinkler),
            other => bail!(
                "SIMILARITY_METRIC must be one of indel, levenshtein, jaro_winkler; got '{other}'"
            ),
        }
    }
}

/// Case-sensitive InDel similarity counted in chars. Two empty strings score 100.
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let lcs = lcs_len(&a, &b);
    let indel = total - 2 * lcs;
    100.0 * (1.0 - indel as f64 / total as f64)
}

/// Length of the longest common subsequence, two-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_strings_score_100() {
        for metric in [
            SimilarityMetric::Indel,
            SimilarityMetric::Levenshtein,
            SimilarityMetric::JaroWinkler,
        ] {
            assert!(approx(metric.score("Python", "Python"), 100.0));
        }
    }

    #[test]
    fn test_indel_ratio_known_values() {
        // one insertion over 11 chars
        assert!(approx(indel_ratio("Excel", "Excels"), 100.0 * (1.0 - 1.0 / 11.0)));
        // case differences count: P/p substitution = 2 indels over 12 chars
        assert!(approx(indel_ratio("Python", "python"), 100.0 * (1.0 - 2.0 / 12.0)));
        assert!(approx(indel_ratio("abc", "xyz"), 0.0));
        assert!(approx(indel_ratio("", ""), 100.0));
        assert!(approx(indel_ratio("", "SQL"), 0.0));
    }

    #[test]
    fn test_indel_ratio_is_symmetric() {
        let pairs = [("Machine Learning", "Machine-Learning"), ("C++", "C#"), ("SQL", "NoSQL")];
        for (a, b) in pairs {
            assert!(approx(indel_ratio(a, b), indel_ratio(b, a)));
        }
    }

    #[test]
    fn test_indel_counts_chars_not_bytes() {
        assert!(approx(indel_ratio("Résumé", "Résumé"), 100.0));
        assert!(approx(indel_ratio("é", "e"), 0.0));
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("INDEL".parse::<SimilarityMetric>().unwrap(), SimilarityMetric::Indel);
        assert_eq!(
            "jaro-winkler".parse::<SimilarityMetric>().unwrap(),
            SimilarityMetric::JaroWinkler
        );
        assert!("cosine".parse::<SimilarityMetric>().is_err());
    }

    #[test]
    fn test_near_duplicates_exceed_threshold() {
        assert!(indel_ratio("Microsoft Excel", "Microsoft Excels") > DEDUPE_THRESHOLD);
        assert!(indel_ratio("Python", "Pandas") <= DEDUPE_THRESHOLD);
    }
}

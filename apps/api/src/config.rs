use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::skills::similarity::SimilarityMetric;

/// Which backend turns profile text into raw skill candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorBackend {
    Llm,
    Keyword,
}

impl FromStr for ExtractorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Ok(Self::Llm),
            "keyword" => Ok(Self::Keyword),
            other => bail!("SKILL_EXTRACTOR must be 'llm' or 'keyword', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub taxonomy_path: PathBuf,
    pub occupations_path: PathBuf,
    pub extractor: ExtractorBackend,
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub similarity_metric: SimilarityMetric,
    /// Two skills scoring above this (0-100) count as duplicates.
    pub similarity_threshold: f64,
    pub match_top_k: usize,
    pub session_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let extractor: ExtractorBackend = env_or("SKILL_EXTRACTOR", "llm").parse()?;
        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        if extractor == ExtractorBackend::Llm && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY is required when SKILL_EXTRACTOR=llm");
        }

        Ok(Config {
            port: parse_env("PORT", "8080")?,
            rust_log: env_or("RUST_LOG", "info"),
            taxonomy_path: PathBuf::from(env_or("TAXONOMY_PATH", "data/skills_taxonomy.json")),
            occupations_path: PathBuf::from(env_or("OCCUPATIONS_PATH", "data/occupations.json")),
            extractor,
            anthropic_api_key,
            llm_model: env_or("LLM_MODEL", crate::llm_client::DEFAULT_MODEL),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", "120")?,
            similarity_metric: env_or("SIMILARITY_METRIC", "indel").parse()?,
            similarity_threshold: similarity_threshold(parse_env("SIMILARITY_THRESHOLD", "90")?)?,
            match_top_k: parse_env("MATCH_TOP_K", "5")?,
            session_ttl_minutes: parse_env("SESSION_TTL_MINUTES", "120")?,
        })
    }
}

/// Similarity scores live on a 0-100 scale; anything else disables or breaks dedupe.
fn similarity_threshold(value: f64) -> Result<f64> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        bail!("SIMILARITY_THRESHOLD must be a number between 0 and 100, got '{value}'");
    }
    Ok(value)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_or(key, default)
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value"))
}

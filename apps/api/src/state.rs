use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::catalog::OccupationCatalog;
use crate::session::store::SessionStore;
use crate::skills::extraction::SkillExtractor;
use crate::skills::normalizer::SkillNormalizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Loaded once at startup; read-only afterwards.
    pub catalog: Arc<OccupationCatalog>,
    pub normalizer: Arc<SkillNormalizer>,
    /// Pluggable extractor. Default: LlmSkillExtractor. Swap via SKILL_EXTRACTOR.
    pub extractor: Arc<dyn SkillExtractor>,
    /// None when no ANTHROPIC_API_KEY is configured; roadmaps are then unavailable.
    pub llm: Option<LlmClient>,
    pub sessions: SessionStore,
}

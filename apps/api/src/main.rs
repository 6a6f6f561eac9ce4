mod config;
mod errors;
mod guidance;
mod llm_client;
mod matching;
mod routes;
mod session;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ExtractorBackend};
use crate::llm_client::LlmClient;
use crate::matching::catalog::{CatalogSource, OccupationCatalog};
use crate::routes::build_router;
use crate::session::store::SessionStore;
use crate::skills::extraction::{KeywordSkillExtractor, LlmSkillExtractor, SkillExtractor};
use crate::skills::normalizer::SkillNormalizer;
use crate::skills::taxonomy::Taxonomy;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pathfinder API v{}", env!("CARGO_PKG_VERSION"));

    // Reference data: a missing or malformed file is fatal
    let taxonomy = Arc::new(
        Taxonomy::load(&config.taxonomy_path).context("Failed to load skill taxonomy")?,
    );
    let catalog = CatalogSource::new(&config.occupations_path)
        .load_occupations()
        .context("Failed to load occupation catalog")?;

    let normalizer = Arc::new(
        SkillNormalizer::new(Arc::clone(&taxonomy))
            .with_metric(config.similarity_metric)
            .with_threshold(config.similarity_threshold),
    );
    info!(
        metric = normalizer.metric().as_str(),
        threshold = config.similarity_threshold,
        "Skill normalizer ready"
    );
    if taxonomy.is_empty() {
        warn!("Skill taxonomy is empty; only cleaning and fuzzy dedupe will apply");
    }
    if catalog.is_empty() {
        warn!("Occupation catalog is empty; every ranking will be empty");
    }

    // Initialize LLM client (optional without a key; roadmaps then return 501)
    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(
                key.clone(),
                config.llm_model.clone(),
                Duration::from_secs(config.llm_timeout_secs),
            )?;
            info!("LLM client initialized (model: {})", client.model());
            Some(client)
        }
        None => {
            info!("No ANTHROPIC_API_KEY set; roadmap generation disabled");
            None
        }
    };

    let extractor = build_extractor(&config, llm.as_ref(), &taxonomy, &catalog)?;
    info!(backend = extractor.backend(), "Skill extractor initialized");

    let state = AppState {
        config: config.clone(),
        catalog,
        normalizer,
        extractor,
        llm,
        sessions: SessionStore::new(config.session_ttl_minutes),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the frontend host is fixed
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the extractor named by `SKILL_EXTRACTOR`.
///
/// The keyword backend scans for every alias, canonical name and catalog skill.
fn build_extractor(
    config: &Config,
    llm: Option<&LlmClient>,
    taxonomy: &Taxonomy,
    catalog: &OccupationCatalog,
) -> Result<Arc<dyn SkillExtractor>> {
    match (config.extractor, llm) {
        (ExtractorBackend::Llm, Some(client)) => {
            Ok(Arc::new(LlmSkillExtractor(client.clone())))
        }
        (ExtractorBackend::Llm, None) => {
            anyhow::bail!("SKILL_EXTRACTOR=llm needs ANTHROPIC_API_KEY")
        }
        (ExtractorBackend::Keyword, _) => {
            let terms = taxonomy
                .aliases()
                .map(|(alias, _)| alias)
                .chain(taxonomy.canonical_names())
                .chain(catalog.skill_names());
            let extractor = KeywordSkillExtractor::new(terms)
                .context("Failed to build keyword skill extractor")?;
            info!(patterns = extractor.pattern_count(), "Keyword matcher built");
            Ok(Arc::new(extractor))
        }
    }
}

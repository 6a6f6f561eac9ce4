use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and loaded data sizes.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "pathfinder-api",
        "occupations": state.catalog.len(),
        "taxonomy_aliases": state.normalizer.taxonomy().len(),
        "extractor": state.extractor.backend(),
        "active_sessions": state.sessions.len().await,
    }))
}

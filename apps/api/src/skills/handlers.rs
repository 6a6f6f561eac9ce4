use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::skills::SkillSet;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeResponse {
    pub skills: SkillSet,
    pub metric: String,
}

/// POST /api/v1/skills/normalize
///
/// Stateless: cleans, canonicalizes and dedupes a raw list without touching any session.
pub async fn handle_normalize(
    State(state): State<AppState>,
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    Ok(Json(NormalizeResponse {
        skills: state.normalizer.normalize(&request.skills),
        metric: state.normalizer.metric().as_str().to_string(),
    }))
}

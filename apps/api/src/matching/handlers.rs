use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::matching::catalog::SkillRequirement;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct OccupationSummary {
    pub name: String,
    pub total_weight: u32,
    pub skills_required: Vec<SkillRequirement>,
}

/// GET /api/v1/occupations
pub async fn handle_list_occupations(State(state): State<AppState>) -> Json<Vec<OccupationSummary>> {
    Json(
        state
            .catalog
            .iter()
            .map(|o| OccupationSummary {
                name: o.name.clone(),
                total_weight: o.total_weight(),
                skills_required: o.skills_required.clone(),
            })
            .collect(),
    )
}

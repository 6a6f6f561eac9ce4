pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::session::handlers as session;
use crate::skills::handlers as skills;
use crate::state::AppState;

/// Upper bound on a resume upload, PDF plus form fields.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Reference data
        .route("/api/v1/occupations", get(matching::handle_list_occupations))
        .route("/api/v1/skills/normalize", post(skills::handle_normalize))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            post(session::handle_submit_profile),
        )
        .route(
            "/api/v1/sessions/:id/profile/resume",
            post(session::handle_submit_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/sessions/:id/skills",
            axum::routing::put(session::handle_replace_skills).patch(session::handle_edit_skills),
        )
        .route(
            "/api/v1/sessions/:id/matches",
            get(session::handle_get_matches),
        )
        .route("/api/v1/sessions/:id/gaps", get(session::handle_get_gaps))
        .route(
            "/api/v1/sessions/:id/roadmap",
            post(session::handle_generate_roadmap),
        )
        .with_state(state)
}

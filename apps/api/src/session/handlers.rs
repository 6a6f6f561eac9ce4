//! Axum route handlers for the session-scoped API.
//!
//! Handlers take a snapshot of the session, run the (pure) core or the
//! extraction adapter outside the lock, then write the result back.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::guidance::resources::{job_links, links_for_gap, ResourceLink};
use crate::guidance::roadmap::generate_roadmap;
use crate::matching::catalog::Occupation;
use crate::matching::scorer::{gaps_for, rank, score_occupation, MatchResult};
use crate::session::models::{Profile, Session};
use crate::skills::normalizer::clean_skill;
use crate::skills::resume_text::text_from_upload;
use crate::skills::SkillSet;
use crate::state::AppState;

const MAX_EXPERIENCE_YEARS: i64 = 60;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Wider than the stored `u8` so out-of-range values reach validation.
    #[serde(default)]
    pub experience_years: Option<i64>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub skills: SkillSet,
    /// True when nothing usable came out of the text; the caller may ask for more.
    pub extraction_empty: bool,
    pub extracted_count: usize,
    pub extractor: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceSkillsRequest {
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditSkillsRequest {
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillsResponse {
    pub skills: SkillSet,
}

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchView {
    pub occupation: String,
    pub score: f64,
    pub score_percent: u32,
    pub matched_weight: u32,
    pub total_weight: u32,
    pub gaps: Vec<String>,
    pub job_links: Vec<ResourceLink>,
}

impl From<&MatchResult> for MatchView {
    fn from(m: &MatchResult) -> Self {
        Self {
            occupation: m.occupation.name.clone(),
            score: m.score,
            score_percent: m.score_percent(),
            matched_weight: m.matched_weight,
            total_weight: m.total_weight,
            gaps: m.gaps.clone(),
            job_links: job_links(&m.occupation.name),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub skills: SkillSet,
    pub matches: Vec<MatchView>,
}

#[derive(Debug, Deserialize)]
pub struct GapsQuery {
    pub occupation: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GapDetail {
    pub skill: String,
    pub weight: u8,
    pub links: Vec<ResourceLink>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GapsResponse {
    pub occupation: String,
    pub score: f64,
    pub gaps: Vec<GapDetail>,
}

#[derive(Debug, Deserialize)]
pub struct RoadmapRequest {
    pub occupation: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoadmapResponse {
    pub occupation: String,
    pub gaps: Vec<String>,
    pub roadmap: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(require_session(&state, id).await?))
}

/// DELETE /api/v1/sessions/:id
///
/// Drops everything the session held.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// POST /api/v1/sessions/:id/profile
///
/// Extracts skills from pasted profile text and replaces the session's skill set.
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    Ok(Json(ingest_profile(&state, id, request).await?))
}

/// POST /api/v1/sessions/:id/profile/resume
///
/// Multipart form: `file` (PDF, optional), `text` (fallback), `name`,
/// `experience_years`, `interests` (comma-separated, may repeat).
pub async fn handle_submit_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut pdf: Option<Bytes> = None;
    let mut request = ProfileRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            pdf = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?,
            );
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))?;
        match name.as_str() {
            "text" => request.text = value,
            "name" => request.name = Some(value),
            "experience_years" if !value.trim().is_empty() => {
                request.experience_years = Some(value.trim().parse().map_err(|_| {
                    AppError::Validation("experience_years must be a whole number".to_string())
                })?);
            }
            "interests" => request.interests.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            ),
            _ => {}
        }
    }

    request.text = text_from_upload(pdf, &request.text).await?;
    Ok(Json(ingest_profile(&state, id, request).await?))
}

/// PUT /api/v1/sessions/:id/skills
pub async fn handle_replace_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReplaceSkillsRequest>,
) -> Result<Json<SkillsResponse>, AppError> {
    let skills = state.normalizer.normalize(&request.skills);
    store_skills(&state, id, skills).await
}

/// PATCH /api/v1/sessions/:id/skills
///
/// Removes (after aliasing, case-insensitively) then adds; existing skills keep priority
/// over added ones during dedupe.
pub async fn handle_edit_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<EditSkillsRequest>,
) -> Result<Json<SkillsResponse>, AppError> {
    let current = require_session(&state, id).await?.skills;
    // removals go through the same cleaning and aliasing as additions
    let taxonomy = state.normalizer.taxonomy();
    let removed: Vec<String> = request
        .remove
        .iter()
        .filter_map(|s| clean_skill(s))
        .map(|s| taxonomy.resolve_alias(&s).to_lowercase())
        .collect();

    let merged = current
        .iter()
        .filter(|s| !removed.contains(&s.to_lowercase()))
        .map(str::to_string)
        .chain(request.add);
    let skills = state.normalizer.normalize(merged);
    store_skills(&state, id, skills).await
}

/// GET /api/v1/sessions/:id/matches?top_k=
///
/// Ranks the catalog against the session's skills and remembers the result.
pub async fn handle_get_matches(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MatchesQuery>,
) -> Result<Json<MatchesResponse>, AppError> {
    let skills = require_session(&state, id).await?.skills;
    let top_k = query.top_k.unwrap_or(state.config.match_top_k);

    let matches = rank(&skills, state.catalog.occupations(), top_k);
    let views = matches.iter().map(MatchView::from).collect();

    let snapshot = skills.clone();
    state
        .sessions
        .update(id, move |s| {
            // skills edited meanwhile: these matches are already stale
            if s.skills == snapshot {
                s.matches = matches;
            }
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(Json(MatchesResponse {
        skills,
        matches: views,
    }))
}

/// GET /api/v1/sessions/:id/gaps?occupation=
///
/// Gaps for one occupation, with where to learn each one.
pub async fn handle_get_gaps(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<GapsQuery>,
) -> Result<Json<GapsResponse>, AppError> {
    let skills = require_session(&state, id).await?.skills;
    let occupation = require_occupation(&state, &query.occupation)?;

    let result = score_occupation(occupation, &skills);
    let gaps = result
        .gaps
        .iter()
        .map(|skill| GapDetail {
            weight: requirement_weight(occupation, skill),
            links: links_for_gap(skill),
            skill: skill.clone(),
        })
        .collect();

    Ok(Json(GapsResponse {
        occupation: occupation.name.clone(),
        score: result.score,
        gaps,
    }))
}

/// POST /api/v1/sessions/:id/roadmap
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RoadmapRequest>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::NotImplemented("Roadmap generation needs ANTHROPIC_API_KEY".to_string())
    })?;
    let skills = require_session(&state, id).await?.skills;
    let occupation = require_occupation(&state, &request.occupation)?;

    let gaps = gaps_by_weight(occupation, &skills);

    let roadmap = generate_roadmap(llm, &skills, &occupation.name, &gaps).await?;

    Ok(Json(RoadmapResponse {
        occupation: occupation.name.clone(),
        gaps,
        roadmap,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn ingest_profile(
    state: &AppState,
    id: Uuid,
    request: ProfileRequest,
) -> Result<ProfileResponse, AppError> {
    // fail fast before paying for an extraction call
    require_session(state, id).await?;

    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Profile text cannot be empty: paste some background text or upload a PDF".to_string(),
        ));
    }
    let experience_years = request
        .experience_years
        .map(|y| {
            u8::try_from(y)
                .ok()
                .filter(|y| i64::from(*y) <= MAX_EXPERIENCE_YEARS)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "experience_years must be between 0 and {MAX_EXPERIENCE_YEARS}"
                    ))
                })
        })
        .transpose()?;

    let raw = state.extractor.extract(text).await?;
    let skills = state.normalizer.normalize(&raw);
    let extraction_empty = skills.is_empty();
    if extraction_empty {
        info!(session_id = %id, raw = raw.len(), "No usable skills extracted from profile");
    } else {
        info!(session_id = %id, skills = skills.len(), "Profile ingested");
    }

    let profile = Profile {
        name: request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        experience_years,
        interests: request.interests,
        text_chars: text.chars().count(),
    };

    let stored = skills.clone();
    state
        .sessions
        .update(id, move |s| {
            s.profile = Some(profile);
            s.set_skills(stored);
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    Ok(ProfileResponse {
        skills,
        extraction_empty,
        extracted_count: raw.len(),
        extractor: state.extractor.backend().to_string(),
    })
}

async fn store_skills(
    state: &AppState,
    id: Uuid,
    skills: SkillSet,
) -> Result<Json<SkillsResponse>, AppError> {
    let stored = skills.clone();
    state
        .sessions
        .update(id, move |s| s.set_skills(stored))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(SkillsResponse { skills }))
}

async fn require_session(state: &AppState, id: Uuid) -> Result<Session, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| session_not_found(id))
}

fn require_occupation<'a>(state: &'a AppState, name: &str) -> Result<&'a Occupation, AppError> {
    state
        .catalog
        .find(name)
        .ok_or_else(|| AppError::NotFound(format!("Occupation '{}' not found", name.trim())))
}

/// Gaps heaviest first so a plan starts with what matters most.
/// Equal weights keep requirement order.
fn gaps_by_weight(occupation: &Occupation, skills: &SkillSet) -> Vec<String> {
    let mut gaps = gaps_for(occupation, skills);
    gaps.sort_by_key(|skill| std::cmp::Reverse(requirement_weight(occupation, skill)));
    gaps
}

fn requirement_weight(occupation: &Occupation, skill: &str) -> u8 {
    occupation
        .skills_required
        .iter()
        .find(|r| r.skill == skill)
        .map_or(0, |r| r.weight)
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found or expired"))
}

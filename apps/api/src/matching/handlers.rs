//! Axum route handlers for the matching pipeline.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingestion::{ingest_postings, IngestReport};
use crate::matching::formatter::{format_recommendations, JobRecommendation};
use crate::matching::matcher::find_matches;
use crate::matching::resume_structurer::structure_resume;
use crate::models::job::{fetch_active_postings, upsert_postings, JobPosting};
use crate::models::resume::fetch_latest_resume_text;
use crate::state::AppState;

const DEFAULT_TOP_K: usize = 5;
const MAX_TOP_K: usize = 20;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub user_id: Uuid,
    pub country: String,
    pub job_title: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<JobRecommendation>,
}

#[derive(Debug, Deserialize)]
pub struct IngestJobsRequest {
    /// Postings supplied by the scraping trigger. An empty list means
    /// "re-index everything active in the database" — the scheduled path.
    #[serde(default)]
    pub postings: Vec<JobPosting>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations
///
/// Full matching pipeline for one user: resume fetch → structuring → query
/// building → query embedding → vector search → formatting. Each stage
/// failure is terminal — no retries, no partial delivery.
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    if request.country.trim().is_empty() {
        return Err(AppError::Validation("country cannot be empty".to_string()));
    }
    if request.job_title.trim().is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }
    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K).clamp(1, MAX_TOP_K);

    let raw_text = fetch_latest_resume_text(&state.db, request.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No resume stored for user {}", request.user_id))
        })?;

    debug!("structuring resume for user {}", request.user_id);
    let resume = structure_resume(&raw_text, &state.llm).await?;

    let raw_matches = find_matches(
        &resume,
        &request.job_title,
        &request.country,
        top_k,
        state.embedder.as_ref(),
        state.vectors.as_ref(),
    )
    .await?;

    let recommendations = format_recommendations(&raw_matches, &state.llm).await?;

    Ok(Json(RecommendationsResponse { recommendations }))
}

/// POST /api/v1/jobs/ingest
///
/// Manual ingestion trigger. Supplied postings are persisted first, so the
/// scheduled refresh keeps re-indexing them later; with no postings in the
/// body, the active set from the database is re-indexed instead.
pub async fn handle_ingest_jobs(
    State(state): State<AppState>,
    Json(request): Json<IngestJobsRequest>,
) -> Result<Json<IngestReport>, AppError> {
    let postings = if request.postings.is_empty() {
        fetch_active_postings(&state.db).await?
    } else {
        upsert_postings(&state.db, &request.postings).await?;
        request.postings
    };

    let report = ingest_postings(
        &postings,
        state.embedder.as_ref(),
        state.vectors.as_ref(),
        state.config.chunking(),
    )
    .await?;

    Ok(Json(report))
}

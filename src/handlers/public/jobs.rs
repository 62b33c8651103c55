// handlers/public/jobs.rs - read-only job browsing

use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::Job;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/jobs - All job postings
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Job>> {
    let jobs = state.jobs.list().await?;
    Ok(ApiResponse::success("Jobs fetched successfully", jobs))
}

/// GET /api/jobs/recent - The newest postings by creation time
pub async fn recent(State(state): State<AppState>) -> ApiResult<Vec<Job>> {
    let jobs = state.jobs.recent().await?;
    Ok(ApiResponse::success("Recent jobs fetched successfully", jobs))
}

/// GET /api/jobs/:id - A single posting
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Job> {
    let job = state.jobs.get(&id).await?;
    Ok(ApiResponse::success("Job fetched successfully", job))
}

// handlers/protected/jobs.rs - job creation and owner-only mutation

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::{Job, JobDraft, JobPatch};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Owned};

/// POST /api/jobs - Post a job owned by the authenticated identity
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<JobDraft>, JsonRejection>,
) -> ApiResult<Job> {
    let Json(draft) = body?;
    let job = state.jobs.create(user.identity_id, draft).await?;
    Ok(ApiResponse::created("Job created successfully", job))
}

/// GET /api/jobs/company - Jobs owned by the authenticated identity
pub async fn by_company(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Job>> {
    let jobs = state.jobs.by_company(user.identity_id).await?;
    Ok(ApiResponse::success("Jobs fetched successfully", jobs))
}

/// PUT|PATCH /api/jobs/:id - Sparse update; only supplied fields change
pub async fn update(
    State(state): State<AppState>,
    Extension(Owned(job)): Extension<Owned<Job>>,
    body: Result<Json<JobPatch>, JsonRejection>,
) -> ApiResult<Job> {
    let Json(patch) = body?;
    let updated = state.jobs.update(job.id, &patch).await?;
    Ok(ApiResponse::success("Job updated successfully", updated))
}

/// DELETE /api/jobs/:id
pub async fn delete(State(state): State<AppState>, Extension(Owned(job)): Extension<Owned<Job>>) -> ApiResult<()> {
    state.jobs.delete(job.id).await?;
    Ok(ApiResponse::message("Job deleted successfully"))
}

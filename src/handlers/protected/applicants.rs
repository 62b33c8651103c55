// handlers/protected/applicants.rs - job applications

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::{Applicant, ApplicantStatusPatch};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ApplicationForm;

/// POST /api/jobs/:id/applicants - Apply to a job as the authenticated identity
pub async fn apply(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(job_id): Path<String>,
    body: Result<Json<ApplicationForm>, JsonRejection>,
) -> ApiResult<Applicant> {
    let Json(form) = body?;
    let applicant = state.applicants.apply(&job_id, user.identity_id, form).await?;
    Ok(ApiResponse::created("Application submitted successfully", applicant))
}

/// GET /api/applicants/job/:id - Applications for one job
pub async fn by_job(State(state): State<AppState>, Path(job_id): Path<String>) -> ApiResult<Vec<Applicant>> {
    let applicants = state.applicants.by_job(&job_id).await?;
    Ok(ApiResponse::success("Applicants fetched successfully", applicants))
}

/// GET /api/applicants/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Applicant> {
    let applicant = state.applicants.get(&id).await?;
    Ok(ApiResponse::success("Applicant fetched successfully", applicant))
}

/// PUT|PATCH /api/applicants/:id - Change the application status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ApplicantStatusPatch>, JsonRejection>,
) -> ApiResult<Applicant> {
    let Json(patch) = body?;
    let applicant = state.applicants.update_status(&id, &patch).await?;
    Ok(ApiResponse::success("Applicant status updated successfully", applicant))
}

// handlers/protected/companies.rs - company profiles

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::database::models::Company;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::CompanyProfile;

/// POST /api/companies - Create a profile linked to the authenticated identity
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CompanyProfile>, JsonRejection>,
) -> ApiResult<Company> {
    let Json(profile) = body?;
    let company = state.companies.create(user.identity_id, profile).await?;
    Ok(ApiResponse::created("Company created successfully", company))
}

/// GET /api/companies/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Company> {
    let company = state.companies.get(&id).await?;
    Ok(ApiResponse::success("Company fetched successfully", company))
}

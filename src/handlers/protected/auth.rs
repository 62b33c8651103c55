// handlers/protected/auth.rs - session management for authenticated identities

use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// POST /api/auth/logout - Clear the stored session; the presented token stops working immediately
pub async fn logout(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<()> {
    state.auth.logout(user.identity_id).await?;
    Ok(ApiResponse::message("Logged out successfully"))
}

/// GET /api/auth/whoami - The authenticated context for this request
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success("Authenticated", user))
}

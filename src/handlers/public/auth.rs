// handlers/public/auth.rs - POST /auth/register, POST /auth/login

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{LoginRequest, RegisterRequest, SessionGrant};

/// POST /auth/register - Create an identity with no active session
///
/// Input: `{ "email": "...", "password": "...", "role"?: "applicant" | "company" }`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = body?;
    let user = state.auth.register(request).await?;

    Ok(ApiResponse::created(
        "User registered successfully",
        json!({ "id": user.id, "email": user.email, "role": user.role }),
    ))
}

/// POST /auth/login - Issue a session token, replacing any previous session
///
/// Output `data`: `{ "token", "userId", "email", "role" }`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<SessionGrant> {
    let Json(request) = body?;
    let grant = state.auth.login(request).await?;
    Ok(ApiResponse::success("Logged in successfully", grant))
}

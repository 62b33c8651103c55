use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::auth::{AuthError, IdentityResolver, SessionTokens};
use crate::database::models::{Role, User};
use crate::error::ApiError;

/// Authenticated identity attached to the request for downstream stages
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub identity_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Credential verifier plus identity resolver, run as one pipeline stage
#[derive(Clone)]
pub struct AuthGate {
    tokens: SessionTokens,
    resolver: IdentityResolver,
}

impl AuthGate {
    pub fn new(tokens: SessionTokens, resolver: IdentityResolver) -> Self {
        Self { tokens, resolver }
    }

    /// Verify the bearer token, then require it to be the identity's current session.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = bearer_token(headers)?;

        match self.verify_and_resolve(token).await {
            Ok(user) => {
                tracing::debug!("Authenticated identity {} (token {})", user.id, fingerprint(token));
                Ok(AuthUser {
                    identity_id: user.id,
                    email: user.email,
                    role: user.role,
                })
            }
            Err(err) => {
                tracing::warn!("Rejected token {}: {}", fingerprint(token), err);
                Err(err)
            }
        }
    }

    async fn verify_and_resolve(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify(token)?;
        self.resolver.resolve(&claims, token).await
    }
}

/// Extract the token from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingCredentials)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedCredentials)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() && token.trim() == token => Ok(token),
        _ => Err(AuthError::MalformedCredentials),
    }
}

/// Short, non-reversible token id for logs
fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest[..6].iter().map(|b| format!("{:02x}", b)).collect()
}

/// Authentication middleware: fails closed, so nothing downstream runs on any error.
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = gate.authenticate(request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

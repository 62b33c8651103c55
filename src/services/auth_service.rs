use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{validation, ServiceError};
use crate::auth::{CredentialHasher, SessionTokens};
use crate::database::models::{Role, User};
use crate::database::Repository;

pub const MIN_PASSWORD_LENGTH: usize = 6;

const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A freshly issued session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGrant {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Registration, login and logout. Login replaces the stored session token, logout clears it.
#[derive(Clone)]
pub struct AuthService {
    users: Repository<User>,
    tokens: SessionTokens,
    hasher: Arc<dyn CredentialHasher>,
}

impl AuthService {
    pub fn new(users: Repository<User>, tokens: SessionTokens, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, tokens, hasher }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, ServiceError> {
        validation::email(&request.email)?;
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        if self.users.find_one_by("email", &request.email).await?.is_some() {
            return Err(ServiceError::Conflict("email is already registered".to_string()));
        }

        let hasher = self.hasher.clone();
        let password = request.password;
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: request.email,
            password_digest: digest,
            role: request.role.unwrap_or_default(),
            session_token: None,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(&user).await?;

        tracing::info!("Registered {} identity {}", user.role, user.id);
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<SessionGrant, ServiceError> {
        let Some(user) = self.users.find_one_by("email", &request.email).await? else {
            tracing::warn!("Login rejected: unknown email");
            return Err(ServiceError::Unauthorized(BAD_CREDENTIALS));
        };

        let hasher = self.hasher.clone();
        let digest = user.password_digest.clone();
        let password = request.password;
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&digest, &password))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        if !verified {
            tracing::warn!("Login rejected: wrong password for identity {}", user.id);
            return Err(ServiceError::Unauthorized(BAD_CREDENTIALS));
        }

        let token = self.tokens.issue(&user)?;
        self.store_session(user.id, Value::String(token.clone())).await?;

        tracing::info!("Identity {} logged in", user.id);
        Ok(SessionGrant {
            token,
            user_id: user.id,
            email: user.email,
            role: user.role,
        })
    }

    pub async fn logout(&self, identity_id: Uuid) -> Result<(), ServiceError> {
        self.store_session(identity_id, Value::Null).await?;
        tracing::info!("Identity {} logged out", identity_id);
        Ok(())
    }

    async fn store_session(&self, identity_id: Uuid, token: Value) -> Result<(), ServiceError> {
        let mut fields = Map::new();
        fields.insert("token".to_string(), token);
        fields.insert("updatedAt".to_string(), serde_json::json!(Utc::now()));

        if !self.users.set_fields(identity_id, fields).await? {
            return Err(ServiceError::NotFound("user"));
        }
        Ok(())
    }
}

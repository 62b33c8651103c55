use super::{AuthError, SessionClaims};
use crate::database::models::User;
use crate::database::Repository;

/// Maps verified claims to the live identity, enforcing single-active-session.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Repository<User>,
}

impl IdentityResolver {
    pub fn new(users: Repository<User>) -> Self {
        Self { users }
    }

    /// The presented token must be exactly the identity's current session token; a
    /// superseded or logged-out token is rejected even before it expires.
    pub async fn resolve(&self, claims: &SessionClaims, presented_token: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .find_one_by("email", &claims.email)
            .await?
            .ok_or(AuthError::IdentityNotFound)?;

        match user.session_token.as_deref() {
            Some(current) if current == presented_token => Ok(user),
            _ => Err(AuthError::SessionMismatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionTokens;
    use crate::database::models::Role;
    use crate::database::MemoryDocumentStore;
    use chrono::{Duration, Utc};
    use serde_json::{json, Map};
    use std::sync::Arc;
    use uuid::Uuid;

    async fn setup() -> (Repository<User>, User, String) {
        let users: Repository<User> =
            Repository::new(Arc::new(MemoryDocumentStore::new()), std::time::Duration::from_secs(1));
        let mut user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            password_digest: "digest".to_string(),
            role: Role::Applicant,
            session_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let token = SessionTokens::new(b"secret", Duration::hours(1)).issue(&user).unwrap();
        user.session_token = Some(token.clone());
        users.insert(&user).await.unwrap();
        (users, user, token)
    }

    fn claims_for(user: &User) -> SessionClaims {
        SessionClaims::for_user(user, Duration::hours(1))
    }

    #[tokio::test]
    async fn resolves_current_session() {
        let (users, user, token) = setup().await;
        let resolved = IdentityResolver::new(users).resolve(&claims_for(&user), &token).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let (users, mut user, token) = setup().await;
        user.email = "ghost@x.com".to_string();
        let err = IdentityResolver::new(users).resolve(&claims_for(&user), &token).await.unwrap_err();
        assert!(matches!(err, AuthError::IdentityNotFound));
    }

    #[tokio::test]
    async fn superseded_token_is_a_mismatch() {
        let (users, user, token) = setup().await;
        let mut fields = Map::new();
        fields.insert("token".into(), json!("a-newer-token"));
        users.set_fields(user.id, fields).await.unwrap();

        let err = IdentityResolver::new(users).resolve(&claims_for(&user), &token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionMismatch));
    }

    #[tokio::test]
    async fn cleared_session_is_a_mismatch() {
        let (users, user, token) = setup().await;
        let mut fields = Map::new();
        fields.insert("token".into(), serde_json::Value::Null);
        users.set_fields(user.id, fields).await.unwrap();

        let err = IdentityResolver::new(users).resolve(&claims_for(&user), &token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionMismatch));
    }
}

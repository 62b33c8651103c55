use chrono::{Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::AuthError;
use crate::config::SecurityConfig;
use crate::database::models::{Role, User};

/// Only symmetric HMAC signatures are accepted
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
    pub role: Role,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    /// Makes every issued token distinct, even two logins within the same second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Uuid>,
}

impl SessionClaims {
    pub fn for_user(user: &User, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            email: user.email.clone(),
            role: user.role,
            user_id: user.id,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            jti: Some(Uuid::new_v4()),
        }
    }
}

/// Issues and verifies signed session tokens with one shared secret
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl SessionTokens {
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            security.jwt_secret.as_bytes(),
            Duration::hours(security.jwt_expiry_hours as i64),
        )
    }

    /// Sign a fresh HS256 token for `user`
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.sign(&SessionClaims::for_user(user, self.lifetime))
    }

    pub fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Check expiry, signature and claim shape against the current time
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) with an explicit clock. A token is valid only while `now < exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<SessionClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            tracing::warn!("Rejected token signed with unexpected algorithm {:?}", header.alg);
            return Err(AuthError::MalformedToken);
        }

        // Expiry wins over a bad signature
        if unverified_exp(token, header.alg).is_some_and(|exp| now >= exp) {
            return Err(AuthError::ExpiredToken);
        }

        let mut validation = Validation::new(header.alg);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Value>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::MalformedToken)?;

        let claims: SessionClaims =
            serde_json::from_value(data.claims).map_err(|e| AuthError::InvalidClaims(e.to_string()))?;

        if now >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }
}

/// The `exp` claim read from the payload without checking the signature
fn unverified_exp(token: &str, alg: Algorithm) -> Option<i64> {
    let mut validation = Validation::new(alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    data.claims.get("exp").and_then(Value::as_i64)
}

//! Credential verification, identity resolution and ownership checks.
//!
//! The HTTP pipeline stages that drive these live in `crate::middleware`.

pub mod ownership;
pub mod password;
pub mod resolver;
pub mod token;

use thiserror::Error;

use crate::database::DatabaseError;

pub use ownership::{OwnedResource, OwnershipGate};
pub use password::{Argon2Hasher, CredentialHasher, HashError};
pub use resolver::IdentityResolver;
pub use token::{SessionClaims, SessionTokens};

/// Every way authentication or authorization can reject a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is required")]
    MissingCredentials,

    #[error("authorization header must start with 'Bearer'")]
    MalformedCredentials,

    #[error("Invalid authorization token")]
    MalformedToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    #[error("user not found")]
    IdentityNotFound,

    #[error("session is no longer active")]
    SessionMismatch,

    #[error("Invalid {0} ID")]
    InvalidIdentifier(&'static str),

    #[error("{0} not found")]
    ResourceNotFound(&'static str),

    #[error("You are not authorized to perform this action on this {0}")]
    Forbidden(&'static str),

    #[error("could not sign session token: {0}")]
    Signing(String),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

//! Request-validate-persist operations behind the HTTP handlers.

pub mod applicant_service;
pub mod auth_service;
pub mod company_service;
pub mod job_service;
pub mod validation;

use thiserror::Error;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::patch::UpdateError;

pub use applicant_service::{ApplicantService, ApplicationForm};
pub use auth_service::{AuthService, LoginRequest, RegisterRequest, SessionGrant};
pub use company_service::{CompanyProfile, CompanyService};
pub use job_service::{JobService, RECENT_JOBS_LIMIT};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid {0} ID")]
    InvalidIdentifier(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error(transparent)]
    Storage(#[from] DatabaseError),

    #[error("{0}")]
    Internal(String),
}

/// Parse a client-supplied document id
pub fn parse_id(kind: &'static str, raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::InvalidIdentifier(kind))
}

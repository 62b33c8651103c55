use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::string_enum;
use crate::database::repository::Document;

string_enum! {
    /// What kind of account an identity is
    Role {
        Applicant => "applicant",
        Company => "company",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Applicant
    }
}

/// Registered identity. `session_token` holds the only token currently honored for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "password")]
    pub password_digest: String,
    pub role: Role,
    #[serde(rename = "token", default)]
    pub session_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const KIND: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }
}

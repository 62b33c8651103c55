use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::string_enum;
use crate::database::repository::Document;
use crate::patch::{is_one_of, present, PatchField, SparseUpdate};

string_enum! {
    /// Where an application is in the hiring pipeline
    ApplicationStatus {
        Pending => "Pending",
        UnderReview => "Under Review",
        Hold => "On Hold",
        Rejected => "Rejected",
        Scheduled => "Interview Scheduled",
    }
}

/// One identity's application to one job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub linkedin_profile: String,
    #[serde(default)]
    pub website_url: String,
    pub experience: String,
    pub current_job_title: String,
    pub current_employer_name: String,
    pub desired_salary: String,
    #[serde(default)]
    pub availability_date: String,
    pub summary: String,
    pub resume: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Applicant {
    const COLLECTION: &'static str = "applicants";
    const KIND: &'static str = "applicant";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Status change requested by the hiring side
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantStatusPatch {
    pub status: Option<String>,
}

const APPLICANT_PATCH_FIELDS: &[PatchField<ApplicantStatusPatch>] = &[PatchField::<ApplicantStatusPatch>::checked(
    "status",
    |p| present(&p.status),
    is_one_of::<ApplicationStatus>,
)];

impl SparseUpdate for ApplicantStatusPatch {
    type Target = Applicant;

    fn fields() -> &'static [PatchField<Self>] {
        APPLICANT_PATCH_FIELDS
    }
}

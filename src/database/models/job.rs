use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::string_enum;
use crate::auth::ownership::OwnedResource;
use crate::database::repository::Document;
use crate::patch::{is_one_of, present, PatchField, SparseUpdate};

string_enum! {
    JobStatus {
        Open => "Open",
        Closed => "Closed",
        OnHold => "On Hold",
        Draft => "Draft",
    }
}

string_enum! {
    WorkType {
        Remote => "Remote",
        HybridWork => "Hybrid Work",
        OnSite => "On Site",
    }
}

string_enum! {
    JobType {
        FullTime => "Full Time",
        Contract => "Contract",
        Temporary => "Temporary",
        Internship => "Internship",
        Fresher => "Fresher",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    #[serde(default)]
    pub negotiable: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub min: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub max: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub currency_type: String,
}

/// A job posting. `company` is the owning identity and never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: Uuid,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub work_type: Option<WorkType>,
    #[serde(default)]
    pub salary: Salary,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub applicants: i64,
    pub status: JobStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Job {
    const COLLECTION: &'static str = "jobs";
    const KIND: &'static str = "job";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedResource for Job {
    fn owner_id(&self) -> Uuid {
        self.company
    }
}

/// Body of a job creation request. The owner is never taken from the body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub work_type: Option<WorkType>,
    #[serde(default)]
    pub salary: Salary,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Sparse job update. Enumerated fields arrive as text and are checked before any write.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub work_type: Option<String>,
    pub salary: Option<Salary>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

type JobField = PatchField<JobPatch>;

const JOB_PATCH_FIELDS: &[JobField] = &[
    JobField::plain("title", |p| present(&p.title)),
    JobField::plain("location", |p| present(&p.location)),
    JobField::checked("jobType", |p| present(&p.job_type), is_one_of::<JobType>),
    JobField::checked("workType", |p| present(&p.work_type), is_one_of::<WorkType>),
    JobField::plain("salary", |p| present(&p.salary)),
    JobField::plain("summary", |p| present(&p.summary)),
    JobField::plain("description", |p| present(&p.description)),
    JobField::checked("status", |p| present(&p.status), is_one_of::<JobStatus>),
    JobField::plain("tags", |p| present(&p.tags)),
];

impl SparseUpdate for JobPatch {
    type Target = Job;

    fn fields() -> &'static [PatchField<Self>] {
        JOB_PATCH_FIELDS
    }
}

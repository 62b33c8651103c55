use chrono::Utc;
use uuid::Uuid;

use super::{parse_id, validation, ServiceError};
use crate::database::models::{Job, JobDraft, JobPatch, JobStatus};
use crate::database::Repository;
use crate::patch::apply_partial_update;

/// Size of the "recent jobs" listing
pub const RECENT_JOBS_LIMIT: usize = 10;

#[derive(Clone)]
pub struct JobService {
    jobs: Repository<Job>,
}

impl JobService {
    pub fn new(jobs: Repository<Job>) -> Self {
        Self { jobs }
    }

    /// The owner is always the authenticated identity, never a value from the request body.
    pub async fn create(&self, owner: Uuid, draft: JobDraft) -> Result<Job, ServiceError> {
        validation::required("title", &draft.title)?;

        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            title: draft.title,
            company: owner,
            location: draft.location,
            job_type: draft.job_type,
            work_type: draft.work_type,
            salary: draft.salary,
            summary: draft.summary,
            description: draft.description,
            applicants: 0,
            status: draft.status.unwrap_or(JobStatus::Open),
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };
        self.jobs.insert(&job).await?;

        tracing::info!("Identity {} posted job {}", owner, job.id);
        Ok(job)
    }

    pub async fn get(&self, raw_id: &str) -> Result<Job, ServiceError> {
        let id = parse_id("job", raw_id)?;
        self.jobs.find_by_id(id).await?.ok_or(ServiceError::NotFound("job"))
    }

    pub async fn list(&self) -> Result<Vec<Job>, ServiceError> {
        Ok(self.jobs.find_all().await?)
    }

    /// Newest first by creation time
    pub async fn recent(&self) -> Result<Vec<Job>, ServiceError> {
        Ok(self.jobs.find_recent("createdAt", RECENT_JOBS_LIMIT).await?)
    }

    pub async fn by_company(&self, owner: Uuid) -> Result<Vec<Job>, ServiceError> {
        Ok(self.jobs.find_by("company", owner).await?)
    }

    /// Callers must have passed the ownership check for `id`.
    pub async fn update(&self, id: Uuid, patch: &JobPatch) -> Result<Job, ServiceError> {
        let job = apply_partial_update(&self.jobs, id, patch).await?;
        tracing::info!("Updated job {}", id);
        Ok(job)
    }

    /// Callers must have passed the ownership check for `id`.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.jobs.delete(id).await? {
            return Err(ServiceError::NotFound("job"));
        }
        tracing::info!("Deleted job {}", id);
        Ok(())
    }
}

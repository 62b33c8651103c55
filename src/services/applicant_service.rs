use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::{parse_id, validation, ServiceError};
use crate::database::models::{Applicant, ApplicantStatusPatch, ApplicationStatus, Job};
use crate::database::Repository;
use crate::patch::apply_partial_update;

/// Body of a job application
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub linkedin_profile: String,
    pub website_url: String,
    pub experience: String,
    pub current_job_title: String,
    pub current_employer_name: String,
    pub desired_salary: String,
    pub availability_date: String,
    pub summary: String,
    pub resume: String,
}

impl ApplicationForm {
    fn validate(&self) -> Result<(), ServiceError> {
        validation::required("first name", &self.firstname)?;
        validation::required("last name", &self.lastname)?;
        validation::required("email", &self.email)?;
        validation::email(&self.email)?;
        if !self.phone.is_empty() {
            validation::phone(&self.phone)?;
        }
        if !self.linkedin_profile.is_empty() {
            validation::http_url("LinkedIn profile", &self.linkedin_profile)?;
        }
        if !self.website_url.is_empty() {
            validation::http_url("website", &self.website_url)?;
        }
        validation::required("experience", &self.experience)?;
        validation::required("current job title", &self.current_job_title)?;
        validation::required("current employer name", &self.current_employer_name)?;
        validation::required("desired salary", &self.desired_salary)?;
        if !self.availability_date.is_empty() {
            validation::date("availability date", &self.availability_date)?;
        }
        validation::required("summary", &self.summary)?;
        validation::required("resume", &self.resume)?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct ApplicantService {
    applicants: Repository<Applicant>,
    jobs: Repository<Job>,
}

impl ApplicantService {
    pub fn new(applicants: Repository<Applicant>, jobs: Repository<Job>) -> Self {
        Self { applicants, jobs }
    }

    /// Stores a pending application and bumps the job's applicant counter.
    pub async fn apply(
        &self,
        raw_job_id: &str,
        applicant_id: Uuid,
        form: ApplicationForm,
    ) -> Result<Applicant, ServiceError> {
        let job_id = parse_id("job", raw_job_id)?;
        form.validate()?;

        if self.jobs.find_by_id(job_id).await?.is_none() {
            return Err(ServiceError::NotFound("job"));
        }

        let now = Utc::now();
        let applicant = Applicant {
            id: Uuid::new_v4(),
            job_id,
            applicant_id,
            firstname: form.firstname,
            lastname: form.lastname,
            email: form.email,
            phone: form.phone,
            linkedin_profile: form.linkedin_profile,
            website_url: form.website_url,
            experience: form.experience,
            current_job_title: form.current_job_title,
            current_employer_name: form.current_employer_name,
            desired_salary: form.desired_salary,
            availability_date: form.availability_date,
            summary: form.summary,
            resume: form.resume,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.applicants.insert(&applicant).await?;

        // The application is already stored; a failed counter bump must not turn it into an error
        match self.jobs.increment(job_id, "applicants", 1).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!("Job {} disappeared before its applicant count was updated", job_id),
            Err(e) => tracing::error!("Could not update applicant count for job {}: {}", job_id, e),
        }

        tracing::info!("Identity {} applied to job {}", applicant_id, job_id);
        Ok(applicant)
    }

    pub async fn by_job(&self, raw_job_id: &str) -> Result<Vec<Applicant>, ServiceError> {
        let job_id = parse_id("job", raw_job_id)?;
        Ok(self.applicants.find_by("jobId", job_id).await?)
    }

    pub async fn get(&self, raw_id: &str) -> Result<Applicant, ServiceError> {
        let id = parse_id("applicant", raw_id)?;
        self.applicants
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("applicant"))
    }

    pub async fn update_status(&self, raw_id: &str, patch: &ApplicantStatusPatch) -> Result<Applicant, ServiceError> {
        let id = parse_id("applicant", raw_id)?;
        Ok(apply_partial_update(&self.applicants, id, patch).await?)
    }
}

use serde::Serialize;

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Company, Job, JobId, User, UserId, UserProfile,
    UserRole,
};

/// Job annotated with derived and referenced data for listings.
#[derive(Debug, Clone, Serialize)]
pub struct JobListing {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    pub applications: Vec<ApplicationId>,
    pub available_positions: u32,
}

/// Single job read with its applications resolved.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    pub applications: Vec<Application>,
    pub available_positions: u32,
}

/// Job paired with its company, used wherever a worker sees a job.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyJob {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

/// Applicant data an employer sees; never includes saved jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantSummary {
    pub id: UserId,
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub role: UserRole,
    pub profile: UserProfile,
}

impl From<User> for ApplicantSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            phone_number: user.phone_number,
            role: user.role,
            profile: user.profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
    pub position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

impl JobSummary {
    pub fn new(job: &Job, company: Option<Company>) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            position: job.position,
            company,
        }
    }
}

/// Result of an employer status change.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub id: ApplicationId,
    pub previous_status: ApplicationStatus,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ApplicantSummary>,
    pub job: JobSummary,
}

/// A worker's own application with the job it targets.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerApplication {
    #[serde(flatten)]
    pub application: Application,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<CompanyJob>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobApplicant {
    #[serde(flatten)]
    pub application: Application,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ApplicantSummary>,
}

/// Applicant roster for one job.
#[derive(Debug, Clone, Serialize)]
pub struct JobApplicants {
    pub job: Job,
    pub available_positions: u32,
    pub applicants: Vec<JobApplicant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployerApplication {
    #[serde(flatten)]
    pub application: Application,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ApplicantSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobSummary>,
}

/// Every application across an employer's jobs.
#[derive(Debug, Clone, Serialize)]
pub struct EmployerApplications {
    pub applications: Vec<EmployerApplication>,
    pub total: usize,
}

/// Saved-job listing. When the store cannot resolve references the raw ids are
/// returned instead and `population_failed` is set.
#[derive(Debug, Clone, Serialize)]
pub struct SavedJobsListing {
    pub saved_jobs: Vec<CompanyJob>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub saved_job_ids: Vec<JobId>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub population_failed: bool,
}

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::domain::{ApplicationId, Company, CompanyId, Job, JobId, User, UserId};
use super::repository::{
    ApplicationFilter, ApplicationRepository, BoardStore, CompanyRepository, JobRepository,
    RepositoryError, UserRepository,
};

/// Service composing postings, the application lifecycle, and saved-job bookmarks
/// over a single store. Operations are spread across the `postings`, `lifecycle`,
/// `saved`, and `accounts` modules.
pub struct JobBoardService<S> {
    pub(super) store: Arc<S>,
}

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static COMPANY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(super) fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

pub(super) fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

pub(super) fn next_user_id() -> UserId {
    let id = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    UserId(format!("user-{id:06}"))
}

pub(super) fn next_company_id() -> CompanyId {
    let id = COMPANY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CompanyId(format!("company-{id:06}"))
}

impl<S> JobBoardService<S>
where
    S: BoardStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub(super) fn require_job(&self, job_id: &JobId) -> Result<Job, BoardError> {
        self.store
            .job(job_id)?
            .ok_or(BoardError::NotFound(Entity::Job))
    }

    pub(super) fn require_user(&self, user_id: &UserId) -> Result<User, BoardError> {
        self.store
            .user(user_id)?
            .ok_or(BoardError::NotFound(Entity::User))
    }

    /// Enrichment lookup; a failure drops the company rather than the response.
    pub(super) fn company_or_none(&self, company_id: &CompanyId) -> Option<Company> {
        match self.store.company(company_id) {
            Ok(company) => company,
            Err(error) => {
                warn!(company_id = %company_id.0, %error, "company lookup failed");
                None
            }
        }
    }

    pub(super) fn user_or_none(&self, user_id: &UserId) -> Option<User> {
        match self.store.user(user_id) {
            Ok(user) => user,
            Err(error) => {
                warn!(user_id = %user_id.0, %error, "user lookup failed");
                None
            }
        }
    }

    pub(super) fn application_ids_for(&self, job_id: &JobId) -> Vec<ApplicationId> {
        match self
            .store
            .applications(&ApplicationFilter::for_job(job_id.clone()))
        {
            Ok(mut applications) => {
                newest_first(&mut applications, |application| {
                    (application.created_at, application.id.0.as_str())
                });
                applications
                    .into_iter()
                    .map(|application| application.id)
                    .collect()
            }
            Err(error) => {
                warn!(job_id = %job_id.0, %error, "application lookup failed");
                Vec::new()
            }
        }
    }
}

/// Sorts most-recent-first; the id breaks ties between records created in the same instant.
pub(super) fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (DateTime<Utc>, &str),
{
    items.sort_by(|left, right| key(right).cmp(&key(left)));
}

/// Entities that can fail to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Job,
    Application,
    User,
    Company,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Entity::Job => "Job",
            Entity::Application => "Application",
            Entity::User => "User",
            Entity::Company => "Company",
        };
        f.write_str(label)
    }
}

/// Coarse classification used to choose the HTTP status of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    Internal,
}

/// Error raised by the board service.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid status. Must be one of: {}", super::domain::ApplicationStatus::valid_labels())]
    InvalidStatus(String),
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("Only the employer who posted this job can update its applications")]
    Forbidden,
    #[error("No positions available for this job")]
    CapacityExceeded,
    #[error("You have already applied for this job")]
    DuplicateApplication,
    #[error("Job already saved")]
    AlreadySaved,
    #[error("Job not saved")]
    NotSaved,
    #[error("User already exists with this email")]
    EmailTaken,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BoardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::Validation(_) | BoardError::InvalidStatus(_) => ErrorKind::Validation,
            BoardError::NotFound(_) => ErrorKind::NotFound,
            BoardError::Forbidden => ErrorKind::Forbidden,
            BoardError::CapacityExceeded
            | BoardError::DuplicateApplication
            | BoardError::AlreadySaved
            | BoardError::NotSaved
            | BoardError::EmailTaken => ErrorKind::Conflict,
            BoardError::Repository(_) => ErrorKind::Internal,
        }
    }
}

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Company, CompanyId, Job, JobId, ProfileUpdate,
    SavedJobsChange, User, UserId,
};

/// Storage for job postings.
pub trait JobRepository: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, RepositoryError>;
}

/// Storage for applications. Implementations own the two atomic guarantees the
/// lifecycle relies on: one application per (job, applicant) pair, and the
/// capacity-conditional status write.
pub trait ApplicationRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the pair already has an application.
    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn application_for(
        &self,
        job_id: &JobId,
        applicant_id: &UserId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn applications(&self, filter: &ApplicationFilter)
        -> Result<Vec<Application>, RepositoryError>;
    fn count_accepted(&self, job_id: &JobId) -> Result<u32, RepositoryError>;
    /// Writes the status in one step. With [`StatusGuard::WithinCapacity`] the write
    /// only lands while the job's accepted count is below `position`, otherwise
    /// [`RepositoryError::CapacityExhausted`].
    fn write_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        guard: StatusGuard,
    ) -> Result<Application, RepositoryError>;
}

/// Storage for worker and employer accounts.
pub trait UserRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the email is already registered.
    fn insert_user(&self, user: User) -> Result<User, RepositoryError>;
    fn user(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    /// Applies the bookmark edit to the stored account in one step and returns
    /// what [`SavedJobsChange::apply`] reports. The set is only written when it changed.
    fn change_saved_jobs(
        &self,
        id: &UserId,
        change: SavedJobsChange,
    ) -> Result<bool, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when the new email belongs to another account.
    fn update_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<User, RepositoryError>;
}

pub trait CompanyRepository: Send + Sync {
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError>;
    fn company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError>;
}

/// Everything the board service needs from persistence.
pub trait BoardStore: JobRepository + ApplicationRepository + UserRepository + CompanyRepository {}

impl<T> BoardStore for T where
    T: JobRepository + ApplicationRepository + UserRepository + CompanyRepository
{
}

/// Precondition attached to a status write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusGuard {
    Unconditional,
    WithinCapacity { position: u32 },
}

/// Filter predicate for job queries. Empty filters match every job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub keyword: Option<String>,
    pub created_by: Option<UserId>,
}

impl JobFilter {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            created_by: None,
        }
    }

    pub fn created_by(employer: UserId) -> Self {
        Self {
            keyword: None,
            created_by: Some(employer),
        }
    }

    /// Keyword matches title or description, case-insensitively.
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(employer) = &self.created_by {
            if &job.created_by != employer {
                return false;
            }
        }

        match self.keyword.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(keyword) => {
                let needle = keyword.to_lowercase();
                job.title.to_lowercase().contains(&needle)
                    || job.description.to_lowercase().contains(&needle)
            }
        }
    }
}

/// Filter predicate for application queries. Empty filters match every application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub job_ids: Option<Vec<JobId>>,
    pub applicant_id: Option<UserId>,
}

impl ApplicationFilter {
    pub fn for_job(job_id: JobId) -> Self {
        Self {
            job_ids: Some(vec![job_id]),
            applicant_id: None,
        }
    }

    pub fn for_jobs(job_ids: Vec<JobId>) -> Self {
        Self {
            job_ids: Some(job_ids),
            applicant_id: None,
        }
    }

    pub fn for_applicant(applicant_id: UserId) -> Self {
        Self {
            job_ids: None,
            applicant_id: Some(applicant_id),
        }
    }

    pub fn matches(&self, application: &Application) -> bool {
        let job_matches = self
            .job_ids
            .as_ref()
            .map_or(true, |ids| ids.contains(&application.job_id));
        let applicant_matches = self
            .applicant_id
            .as_ref()
            .map_or(true, |id| id == &application.applicant_id);
        job_matches && applicant_matches
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("no capacity left for the requested status")]
    CapacityExhausted,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

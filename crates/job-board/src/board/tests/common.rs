use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::board::accounts::{NewCompany, NewUser};
use crate::board::domain::{
    Application, ApplicationId, ApplicationStatus, Company, CompanyId, Job, JobId, ProfileUpdate,
    SavedJobsChange, User, UserId, UserProfile, UserRole,
};
use crate::board::memory::InMemoryBoardStore;
use crate::board::postings::{FieldValue, JobPostingRequest};
use crate::board::repository::{
    ApplicationFilter, ApplicationRepository, CompanyRepository, JobFilter, JobRepository,
    RepositoryError, StatusGuard, UserRepository,
};
use crate::board::router::{board_router, BoardState};
use crate::board::service::JobBoardService;

pub(super) fn build_service() -> (JobBoardService<InMemoryBoardStore>, Arc<InMemoryBoardStore>) {
    let store = Arc::new(InMemoryBoardStore::default());
    let service = JobBoardService::new(store.clone());
    (service, store)
}

pub(super) fn build_faulty_service() -> (JobBoardService<FaultyStore>, Arc<FaultyStore>) {
    let store = Arc::new(FaultyStore::default());
    let service = JobBoardService::new(store.clone());
    (service, store)
}

pub(super) fn new_user(name: &str, role: UserRole) -> NewUser {
    let handle = name.to_lowercase().replace(' ', ".");
    NewUser {
        fullname: name.to_string(),
        email: format!("{handle}@example.com"),
        phone_number: "+15155550100".to_string(),
        role,
        profile: UserProfile {
            bio: Some(format!("{name} bio")),
            skills: vec!["Rust".to_string()],
            resume: Some(format!("https://files.example.com/{handle}.pdf")),
            resume_original_name: Some(format!("{handle}.pdf")),
            profile_photo: None,
        },
    }
}

pub(super) fn employer<S>(service: &JobBoardService<S>) -> UserId
where
    S: crate::board::repository::BoardStore + 'static,
{
    service
        .register_user(new_user("Erin Employer", UserRole::Employer))
        .expect("employer registers")
        .id
}

pub(super) fn worker<S>(service: &JobBoardService<S>, name: &str) -> UserId
where
    S: crate::board::repository::BoardStore + 'static,
{
    service
        .register_user(new_user(name, UserRole::Worker))
        .expect("worker registers")
        .id
}

pub(super) fn company<S>(service: &JobBoardService<S>, name: &str) -> CompanyId
where
    S: crate::board::repository::BoardStore + 'static,
{
    service
        .register_company(NewCompany {
            name: name.to_string(),
            website: Some("https://techcorp.example.com".to_string()),
            location: Some("Des Moines, IA".to_string()),
            ..NewCompany::default()
        })
        .expect("company registers")
        .id
}

pub(super) fn posting(company_id: &CompanyId, title: &str, position: u32) -> JobPostingRequest {
    JobPostingRequest {
        title: Some(title.to_string()),
        description: Some(format!("We are looking for a {title} to join the team.")),
        requirements: Some("Bachelor's degree, 2+ years of experience , Team player".to_string()),
        salary: Some(FieldValue::Number(85_000.0)),
        location: Some("Remote".to_string()),
        job_type: Some("Full-time".to_string()),
        experience: Some(FieldValue::from("Junior")),
        position: Some(FieldValue::Number(f64::from(position))),
        contact_number: Some("+15155550199".to_string()),
        company_id: Some(company_id.0.clone()),
    }
}

pub(super) fn post_job<S>(
    service: &JobBoardService<S>,
    employer: &UserId,
    company_id: &CompanyId,
    position: u32,
) -> Job
where
    S: crate::board::repository::BoardStore + 'static,
{
    service
        .post_job(employer, posting(company_id, "Backend Developer", position))
        .expect("job posts")
}

/// Employer, company, and one job with the given capacity.
pub(super) struct Board<S> {
    pub(super) service: JobBoardService<S>,
    pub(super) store: Arc<S>,
    pub(super) employer: UserId,
    pub(super) company: CompanyId,
    pub(super) job: Job,
}

pub(super) fn board_with_job(position: u32) -> Board<InMemoryBoardStore> {
    let (service, store) = build_service();
    let employer = employer(&service);
    let company = company(&service, "TechCorp Solutions");
    let job = post_job(&service, &employer, &company, position);
    Board {
        service,
        store,
        employer,
        company,
        job,
    }
}

pub(super) fn router_for<S>(service: JobBoardService<S>, expose_error_details: bool) -> axum::Router
where
    S: crate::board::repository::BoardStore + 'static,
{
    board_router(BoardState::new(Arc::new(service), expose_error_details))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

/// In-memory store with switchable faults, for degraded-path tests.
#[derive(Default)]
pub(super) struct FaultyStore {
    pub(super) inner: InMemoryBoardStore,
    /// `count_accepted` fails.
    pub(super) fail_counts: AtomicBool,
    /// `count_accepted` reports zero, as a read that lost a race would.
    pub(super) stale_counts: AtomicBool,
    /// `job` and `jobs` fail.
    pub(super) fail_job_reads: AtomicBool,
}

impl FaultyStore {
    pub(super) fn enable(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    fn is_set(flag: &AtomicBool) -> bool {
        flag.load(Ordering::SeqCst)
    }
}

impl JobRepository for FaultyStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        self.inner.insert_job(job)
    }

    fn job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        if Self::is_set(&self.fail_job_reads) {
            return Err(offline());
        }
        self.inner.job(id)
    }

    fn jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, RepositoryError> {
        if Self::is_set(&self.fail_job_reads) {
            return Err(offline());
        }
        self.inner.jobs(filter)
    }
}

impl ApplicationRepository for FaultyStore {
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        self.inner.insert_application(application)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.application(id)
    }

    fn application_for(
        &self,
        job_id: &JobId,
        applicant_id: &UserId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.inner.application_for(job_id, applicant_id)
    }

    fn applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications(filter)
    }

    fn count_accepted(&self, job_id: &JobId) -> Result<u32, RepositoryError> {
        if Self::is_set(&self.fail_counts) {
            return Err(offline());
        }
        if Self::is_set(&self.stale_counts) {
            return Ok(0);
        }
        self.inner.count_accepted(job_id)
    }

    fn write_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        guard: StatusGuard,
    ) -> Result<Application, RepositoryError> {
        self.inner.write_status(id, status, guard)
    }
}

impl UserRepository for FaultyStore {
    fn insert_user(&self, user: User) -> Result<User, RepositoryError> {
        self.inner.insert_user(user)
    }

    fn user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.inner.user(id)
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.inner.user_by_email(email)
    }

    fn change_saved_jobs(
        &self,
        id: &UserId,
        change: SavedJobsChange,
    ) -> Result<bool, RepositoryError> {
        self.inner.change_saved_jobs(id, change)
    }

    fn update_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<User, RepositoryError> {
        self.inner.update_profile(id, update)
    }
}

impl CompanyRepository for FaultyStore {
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        self.inner.insert_company(company)
    }

    fn company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        self.inner.company(id)
    }

    fn company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        self.inner.company_by_name(name)
    }
}

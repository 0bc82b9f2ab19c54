use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Company, CompanyId, Job, JobId, ProfileUpdate,
    SavedJobsChange, User, UserId,
};
use super::repository::{
    ApplicationFilter, ApplicationRepository, CompanyRepository, JobFilter, JobRepository,
    RepositoryError, StatusGuard, UserRepository,
};

/// Process-local store. A single mutex covers every collection, which is what makes
/// the pair-unique insert and the capacity-conditional status write atomic.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBoardStore {
    state: Arc<Mutex<BoardState>>,
}

#[derive(Debug, Default)]
struct BoardState {
    jobs: HashMap<JobId, Job>,
    applications: HashMap<ApplicationId, Application>,
    users: HashMap<UserId, User>,
    companies: HashMap<CompanyId, Company>,
}

impl BoardState {
    fn accepted_for(&self, job_id: &JobId) -> u32 {
        let count = self
            .applications
            .values()
            .filter(|application| {
                &application.job_id == job_id && application.status == ApplicationStatus::Accepted
            })
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

impl InMemoryBoardStore {
    fn lock(&self) -> Result<MutexGuard<'_, BoardState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl JobRepository for InMemoryBoardStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut state = self.lock()?;
        if state.jobs.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        state.jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.lock()?.jobs.get(id).cloned())
    }

    fn jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .jobs
            .values()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect())
    }
}

impl ApplicationRepository for InMemoryBoardStore {
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut state = self.lock()?;
        let duplicate = state.applications.values().any(|existing| {
            existing.id == application.id
                || (existing.job_id == application.job_id
                    && existing.applicant_id == application.applicant_id)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        state
            .applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.lock()?.applications.get(id).cloned())
    }

    fn application_for(
        &self,
        job_id: &JobId,
        applicant_id: &UserId,
    ) -> Result<Option<Application>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .applications
            .values()
            .find(|application| {
                &application.job_id == job_id && &application.applicant_id == applicant_id
            })
            .cloned())
    }

    fn applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .applications
            .values()
            .filter(|application| filter.matches(application))
            .cloned()
            .collect())
    }

    fn count_accepted(&self, job_id: &JobId) -> Result<u32, RepositoryError> {
        Ok(self.lock()?.accepted_for(job_id))
    }

    fn write_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        guard: StatusGuard,
    ) -> Result<Application, RepositoryError> {
        let mut state = self.lock()?;
        let job_id = state
            .applications
            .get(id)
            .map(|application| application.job_id.clone())
            .ok_or(RepositoryError::NotFound)?;

        if let StatusGuard::WithinCapacity { position } = guard {
            if state.accepted_for(&job_id) >= position {
                return Err(RepositoryError::CapacityExhausted);
            }
        }

        let application = state
            .applications
            .get_mut(id)
            .ok_or(RepositoryError::NotFound)?;
        application.status = status;
        Ok(application.clone())
    }
}

impl UserRepository for InMemoryBoardStore {
    fn insert_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut state = self.lock()?;
        let taken = state.users.contains_key(&user.id)
            || state
                .users
                .values()
                .any(|existing| existing.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(RepositoryError::Conflict);
        }
        state.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email.trim()))
            .cloned())
    }

    fn change_saved_jobs(
        &self,
        id: &UserId,
        change: SavedJobsChange,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        let user = state.users.get_mut(id).ok_or(RepositoryError::NotFound)?;
        Ok(change.apply(&mut user.saved_jobs))
    }

    fn update_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<User, RepositoryError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(id) {
            return Err(RepositoryError::NotFound);
        }
        if let Some(email) = update.email.as_deref() {
            let taken = state
                .users
                .values()
                .any(|other| &other.id != id && other.email.eq_ignore_ascii_case(email));
            if taken {
                return Err(RepositoryError::Conflict);
            }
        }

        let user = state.users.get_mut(id).ok_or(RepositoryError::NotFound)?;
        update.apply_to(user);
        Ok(user.clone())
    }
}

impl CompanyRepository for InMemoryBoardStore {
    fn insert_company(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut state = self.lock()?;
        if state.companies.contains_key(&company.id) {
            return Err(RepositoryError::Conflict);
        }
        state.companies.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    fn company(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(self.lock()?.companies.get(id).cloned())
    }

    fn company_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .companies
            .values()
            .find(|company| company.name.eq_ignore_ascii_case(name.trim()))
            .cloned())
    }
}

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Application, ApplicationId, ApplicationStatus, JobId, UserId};
use super::positions;
use super::repository::{
    ApplicationFilter, ApplicationRepository, BoardStore, JobFilter, JobRepository,
    RepositoryError, StatusGuard,
};
use super::service::{newest_first, next_application_id, BoardError, Entity, JobBoardService};
use super::views::{
    ApplicantSummary, CompanyJob, EmployerApplication, EmployerApplications, JobApplicant,
    JobApplicants, JobSummary, StatusChange, WorkerApplication,
};

impl<S> JobBoardService<S>
where
    S: BoardStore + 'static,
{
    /// Submit a pending application for `applicant` to `job_id`.
    ///
    /// Capacity is checked against accepted applications only, so pending
    /// applications are never limited. The store's pair-unique insert backs the
    /// duplicate check when two applies race.
    pub fn apply(&self, applicant: &UserId, job_id: &JobId) -> Result<Application, BoardError> {
        let job = self.require_job(job_id)?;

        let accepted = self.store.count_accepted(&job.id)?;
        if accepted >= job.position {
            return Err(BoardError::CapacityExceeded);
        }

        if self.store.application_for(&job.id, applicant)?.is_some() {
            return Err(BoardError::DuplicateApplication);
        }

        let application = Application {
            id: next_application_id(),
            job_id: job.id.clone(),
            applicant_id: applicant.clone(),
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        };

        let stored = self
            .store
            .insert_application(application)
            .map_err(|error| match error {
                RepositoryError::Conflict => BoardError::DuplicateApplication,
                other => BoardError::Repository(other),
            })?;

        info!(
            application_id = %stored.id.0,
            job_id = %job.id.0,
            applicant_id = %applicant.0,
            "application submitted"
        );
        Ok(stored)
    }

    /// Move an application to `raw_status` on behalf of the job's employer.
    pub fn update_status(
        &self,
        actor: &UserId,
        application_id: &ApplicationId,
        raw_status: &str,
    ) -> Result<StatusChange, BoardError> {
        if raw_status.trim().is_empty() {
            return Err(BoardError::Validation("Status is required".to_string()));
        }
        let status: ApplicationStatus = raw_status
            .parse()
            .map_err(|_| BoardError::InvalidStatus(raw_status.to_string()))?;

        let application = self
            .store
            .application(application_id)?
            .ok_or(BoardError::NotFound(Entity::Application))?;
        let job = self.require_job(&application.job_id)?;

        if &job.created_by != actor {
            warn!(
                application_id = %application_id.0,
                actor = %actor.0,
                "status change rejected for non-owner"
            );
            return Err(BoardError::Forbidden);
        }

        let previous_status = application.status;
        let guard = if status == ApplicationStatus::Accepted
            && previous_status != ApplicationStatus::Accepted
        {
            let accepted = self.store.count_accepted(&job.id)?;
            if accepted >= job.position {
                return Err(BoardError::CapacityExceeded);
            }
            StatusGuard::WithinCapacity {
                position: job.position,
            }
        } else {
            StatusGuard::Unconditional
        };

        let updated = self
            .store
            .write_status(application_id, status, guard)
            .map_err(|error| match error {
                RepositoryError::CapacityExhausted => BoardError::CapacityExceeded,
                RepositoryError::NotFound => BoardError::NotFound(Entity::Application),
                other => BoardError::Repository(other),
            })?;

        info!(
            application_id = %updated.id.0,
            job_id = %job.id.0,
            previous = %previous_status,
            status = %updated.status,
            "application status updated"
        );

        let applicant = self
            .user_or_none(&updated.applicant_id)
            .map(ApplicantSummary::from);
        let company = self.company_or_none(&job.company_id);

        Ok(StatusChange {
            id: updated.id,
            previous_status,
            status: updated.status,
            applicant,
            job: JobSummary::new(&job, company),
        })
    }

    /// Applications submitted by `worker`, newest first, each with its job and company.
    pub fn worker_applications(
        &self,
        worker: &UserId,
    ) -> Result<Vec<WorkerApplication>, BoardError> {
        let mut applications = self
            .store
            .applications(&ApplicationFilter::for_applicant(worker.clone()))?;
        newest_first(&mut applications, |application| {
            (application.created_at, application.id.0.as_str())
        });

        let mut enriched = Vec::with_capacity(applications.len());
        for application in applications {
            let job = self.store.job(&application.job_id)?.map(|job| {
                let company = self.company_or_none(&job.company_id);
                CompanyJob { job, company }
            });
            enriched.push(WorkerApplication { application, job });
        }
        Ok(enriched)
    }

    /// Applicant roster for a single job, newest first.
    pub fn job_applicants(&self, job_id: &JobId) -> Result<JobApplicants, BoardError> {
        let job = self.require_job(job_id)?;
        let mut applications = self
            .store
            .applications(&ApplicationFilter::for_job(job.id.clone()))?;
        newest_first(&mut applications, |application| {
            (application.created_at, application.id.0.as_str())
        });

        let applicants = applications
            .into_iter()
            .map(|application| {
                let applicant = self
                    .user_or_none(&application.applicant_id)
                    .map(ApplicantSummary::from);
                JobApplicant {
                    application,
                    applicant,
                }
            })
            .collect();

        let available_positions = positions::available_positions_or_position(&*self.store, &job);

        Ok(JobApplicants {
            job,
            available_positions,
            applicants,
        })
    }

    /// Every application across the jobs `employer` has posted, newest first.
    pub fn employer_applications(
        &self,
        employer: &UserId,
    ) -> Result<EmployerApplications, BoardError> {
        let jobs = self
            .store
            .jobs(&JobFilter::created_by(employer.clone()))?;
        if jobs.is_empty() {
            return Ok(EmployerApplications {
                applications: Vec::new(),
                total: 0,
            });
        }

        let job_ids = jobs.iter().map(|job| job.id.clone()).collect();
        let mut applications = self
            .store
            .applications(&ApplicationFilter::for_jobs(job_ids))?;
        newest_first(&mut applications, |application| {
            (application.created_at, application.id.0.as_str())
        });

        let applications: Vec<EmployerApplication> = applications
            .into_iter()
            .map(|application| {
                let applicant = self
                    .user_or_none(&application.applicant_id)
                    .map(ApplicantSummary::from);
                let job = jobs
                    .iter()
                    .find(|job| job.id == application.job_id)
                    .map(|job| JobSummary::new(job, self.company_or_none(&job.company_id)));
                EmployerApplication {
                    application,
                    applicant,
                    job,
                }
            })
            .collect();

        Ok(EmployerApplications {
            total: applications.len(),
            applications,
        })
    }
}

use tracing::{debug, info, warn};

use super::domain::{JobId, SavedJobsChange, UserId};
use super::repository::{BoardStore, JobRepository, RepositoryError, UserRepository};
use super::service::{BoardError, Entity, JobBoardService};
use super::views::{CompanyJob, SavedJobsListing};

impl<S> JobBoardService<S>
where
    S: BoardStore + 'static,
{
    pub fn save_job(&self, worker: &UserId, job_id: &JobId) -> Result<(), BoardError> {
        if !self.change_saved_jobs(worker, SavedJobsChange::Save(job_id.clone()))? {
            return Err(BoardError::AlreadySaved);
        }
        info!(user_id = %worker.0, job_id = %job_id.0, "job saved");
        Ok(())
    }

    pub fn unsave_job(&self, worker: &UserId, job_id: &JobId) -> Result<(), BoardError> {
        if !self.change_saved_jobs(worker, SavedJobsChange::Unsave(job_id.clone()))? {
            return Err(BoardError::NotSaved);
        }
        info!(user_id = %worker.0, job_id = %job_id.0, "job removed from saved");
        Ok(())
    }

    /// Flips membership and returns whether the job is saved afterwards.
    pub fn toggle_saved_job(&self, worker: &UserId, job_id: &JobId) -> Result<bool, BoardError> {
        let is_saved = self.change_saved_jobs(worker, SavedJobsChange::Toggle(job_id.clone()))?;
        info!(user_id = %worker.0, job_id = %job_id.0, is_saved, "saved job toggled");
        Ok(is_saved)
    }

    /// Resolves each bookmark. Dangling references are dropped; a store failure
    /// during resolution returns the raw ids with `population_failed` set.
    pub fn saved_jobs(&self, worker: &UserId) -> Result<SavedJobsListing, BoardError> {
        let user = self.require_user(worker)?;

        let mut saved_jobs = Vec::with_capacity(user.saved_jobs.len());
        for job_id in user.saved_jobs.iter() {
            match self.store.job(job_id) {
                Ok(Some(job)) => {
                    let company = self.company_or_none(&job.company_id);
                    saved_jobs.push(CompanyJob { job, company });
                }
                Ok(None) => {
                    debug!(user_id = %worker.0, job_id = %job_id.0, "dropping dangling saved job");
                }
                Err(error) => {
                    warn!(user_id = %worker.0, %error, "saved job population failed");
                    return Ok(SavedJobsListing {
                        saved_jobs: Vec::new(),
                        saved_job_ids: user.saved_jobs.to_vec(),
                        population_failed: true,
                    });
                }
            }
        }

        Ok(SavedJobsListing {
            saved_jobs,
            saved_job_ids: Vec::new(),
            population_failed: false,
        })
    }

    fn change_saved_jobs(
        &self,
        worker: &UserId,
        change: SavedJobsChange,
    ) -> Result<bool, BoardError> {
        self.store
            .change_saved_jobs(worker, change)
            .map_err(|error| match error {
                RepositoryError::NotFound => BoardError::NotFound(Entity::User),
                other => BoardError::Repository(other),
            })
    }
}

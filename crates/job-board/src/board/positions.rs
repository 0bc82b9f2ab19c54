//! Position accounting: open seats are always derived from accepted applications
//! at read time and never stored on the job.

use tracing::warn;

use super::domain::Job;
use super::repository::{ApplicationRepository, RepositoryError};

/// `position - accepted`, floored at zero.
pub const fn open_seats(position: u32, accepted: u32) -> u32 {
    position.saturating_sub(accepted)
}

/// Strict form used where a wrong figure would admit an applicant.
pub fn available_positions<A>(applications: &A, job: &Job) -> Result<u32, RepositoryError>
where
    A: ApplicationRepository + ?Sized,
{
    let accepted = applications.count_accepted(&job.id)?;
    Ok(open_seats(job.position, accepted))
}

/// Display form for listings: a failed count falls back to the raw `position`.
pub fn available_positions_or_position<A>(applications: &A, job: &Job) -> u32
where
    A: ApplicationRepository + ?Sized,
{
    match available_positions(applications, job) {
        Ok(available) => available,
        Err(error) => {
            warn!(job_id = %job.id.0, %error, "falling back to raw position count");
            job.position
        }
    }
}

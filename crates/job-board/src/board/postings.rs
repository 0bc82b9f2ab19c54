use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::domain::{CompanyId, Job, JobId, UserId};
use super::positions;
use super::repository::{
    ApplicationFilter, ApplicationRepository, BoardStore, CompanyRepository, JobFilter,
    JobRepository,
};
use super::service::{newest_first, next_job_id, BoardError, Entity, JobBoardService};
use super::views::{JobDetail, JobListing};

const MISSING_FIELDS: &str = "Something is missing.";

/// Form values that clients send either as JSON numbers or as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// Raw job posting as submitted by an employer. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobPostingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Comma separated.
    pub requirements: Option<String>,
    pub salary: Option<FieldValue>,
    pub location: Option<String>,
    #[serde(alias = "jobType")]
    pub job_type: Option<String>,
    pub experience: Option<FieldValue>,
    pub position: Option<FieldValue>,
    #[serde(alias = "contactNumber")]
    pub contact_number: Option<String>,
    #[serde(alias = "companyId")]
    pub company_id: Option<String>,
}

/// Validated form of [`JobPostingRequest`].
struct JobDraft {
    title: String,
    description: String,
    requirements: Vec<String>,
    salary: f64,
    location: String,
    job_type: String,
    experience_level: u32,
    position: u32,
    contact_number: String,
    company_id: CompanyId,
}

fn required_text(value: Option<String>) -> Result<String, BoardError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(BoardError::Validation(MISSING_FIELDS.to_string())),
    }
}

fn required_value(value: Option<FieldValue>) -> Result<FieldValue, BoardError> {
    match value {
        Some(value) if !value.is_blank() => Ok(value),
        _ => Err(BoardError::Validation(MISSING_FIELDS.to_string())),
    }
}

fn parse_salary(value: &FieldValue) -> Result<f64, BoardError> {
    let salary = match value {
        FieldValue::Number(number) => Some(*number),
        FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
    };
    match salary {
        Some(salary) if salary.is_finite() && salary >= 0.0 => Ok(salary),
        _ => Err(BoardError::Validation("Salary must be a number".to_string())),
    }
}

fn parse_position(value: &FieldValue) -> Result<u32, BoardError> {
    let position = match value {
        FieldValue::Number(number) if number.fract() == 0.0 && *number <= u32::MAX as f64 => {
            (*number >= 0.0).then_some(*number as u32)
        }
        FieldValue::Number(_) => None,
        FieldValue::Text(text) => text.trim().parse::<u32>().ok(),
    };
    match position {
        Some(position) if position >= 1 => Ok(position),
        _ => Err(BoardError::Validation(
            "Position must be a whole number of at least 1".to_string(),
        )),
    }
}

/// Maps free-text experience ("Junior", "3-5 years", "10+") to a numeric level.
pub fn experience_level(value: &FieldValue) -> u32 {
    let text = match value {
        FieldValue::Number(number) if number.is_finite() && *number > 0.0 => {
            return number.min(u32::MAX as f64) as u32;
        }
        FieldValue::Number(_) => return 0,
        FieldValue::Text(text) => text.to_lowercase(),
    };

    if text.contains("entry") || text.contains("no experience") {
        0
    } else if text.contains("1-2") || text.contains("junior") {
        1
    } else if text.contains("3-5") || text.contains("mid") {
        3
    } else if text.contains("5+") || text.contains("senior") {
        5
    } else if text.contains("10+") || text.contains("expert") {
        10
    } else {
        text.split(|c: char| !c.is_ascii_digit())
            .find(|digits| !digits.is_empty())
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0)
    }
}

/// Splits a comma-separated form value, dropping blank entries.
pub(super) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

impl JobDraft {
    fn from_request(request: JobPostingRequest) -> Result<Self, BoardError> {
        let title = required_text(request.title)?;
        let description = required_text(request.description)?;
        let requirements = required_text(request.requirements)?;
        let salary = required_value(request.salary)?;
        let location = required_text(request.location)?;
        let job_type = required_text(request.job_type)?;
        let experience = required_value(request.experience)?;
        let position = required_value(request.position)?;
        let contact_number = required_text(request.contact_number)?;
        let company_id = required_text(request.company_id)?;

        Ok(Self {
            title,
            description,
            requirements: split_list(&requirements),
            salary: parse_salary(&salary)?,
            location,
            job_type,
            experience_level: experience_level(&experience),
            position: parse_position(&position)?,
            contact_number,
            company_id: CompanyId(company_id),
        })
    }
}

impl<S> JobBoardService<S>
where
    S: BoardStore + 'static,
{
    /// Validate and store a new posting owned by `employer`.
    pub fn post_job(
        &self,
        employer: &UserId,
        request: JobPostingRequest,
    ) -> Result<Job, BoardError> {
        let draft = JobDraft::from_request(request)?;

        if self.store.company(&draft.company_id)?.is_none() {
            return Err(BoardError::NotFound(Entity::Company));
        }

        let job = Job {
            id: next_job_id(),
            title: draft.title,
            description: draft.description,
            requirements: draft.requirements,
            salary: draft.salary,
            location: draft.location,
            job_type: draft.job_type,
            experience_level: draft.experience_level,
            contact_number: draft.contact_number,
            company_id: draft.company_id,
            position: draft.position,
            created_by: employer.clone(),
            created_at: Utc::now(),
        };

        let stored = self.store.insert_job(job)?;
        info!(
            job_id = %stored.id.0,
            employer = %employer.0,
            position = stored.position,
            "job posted"
        );
        Ok(stored)
    }

    /// Public search over title and description, newest first.
    pub fn list_jobs(&self, keyword: Option<&str>) -> Result<Vec<JobListing>, BoardError> {
        let filter = JobFilter {
            keyword: keyword.map(str::to_string),
            created_by: None,
        };
        self.listings(&filter)
    }

    /// Jobs posted by `employer`; every job when no employer is given.
    pub fn employer_jobs(&self, employer: Option<&UserId>) -> Result<Vec<JobListing>, BoardError> {
        let filter = match employer {
            Some(employer) => JobFilter::created_by(employer.clone()),
            None => JobFilter::default(),
        };
        self.listings(&filter)
    }

    pub fn all_jobs(&self) -> Result<Vec<JobListing>, BoardError> {
        self.listings(&JobFilter::default())
    }

    pub fn job_detail(&self, job_id: &JobId) -> Result<JobDetail, BoardError> {
        let job = self.require_job(job_id)?;
        let mut applications = self
            .store
            .applications(&ApplicationFilter::for_job(job.id.clone()))?;
        newest_first(&mut applications, |application| {
            (application.created_at, application.id.0.as_str())
        });
        let available_positions = positions::available_positions_or_position(&*self.store, &job);
        let company = self.company_or_none(&job.company_id);

        Ok(JobDetail {
            job,
            company,
            applications,
            available_positions,
        })
    }

    /// Strict open-seat count for one job.
    pub fn available_positions(&self, job_id: &JobId) -> Result<u32, BoardError> {
        let job = self.require_job(job_id)?;
        Ok(positions::available_positions(&*self.store, &job)?)
    }

    fn listings(&self, filter: &JobFilter) -> Result<Vec<JobListing>, BoardError> {
        let mut jobs = self.store.jobs(filter)?;
        newest_first(&mut jobs, |job| (job.created_at, job.id.0.as_str()));

        Ok(jobs.into_iter().map(|job| self.listing(job)).collect())
    }

    pub(super) fn listing(&self, job: Job) -> JobListing {
        let available_positions = positions::available_positions_or_position(&*self.store, &job);
        let company = self.company_or_none(&job.company_id);
        let applications = self.application_ids_for(&job.id);
        JobListing {
            job,
            company,
            applications,
            available_positions,
        }
    }
}

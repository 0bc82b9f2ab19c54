//! CSV import of companies, employers, and job postings.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::accounts::{NewCompany, NewUser};
use super::domain::{CompanyId, JobId, UserId, UserProfile, UserRole};
use super::postings::{FieldValue, JobPostingRequest};
use super::repository::{BoardStore, CompanyRepository, UserRepository};
use super::service::{BoardError, JobBoardService};

#[derive(Debug, thiserror::Error)]
pub enum CatalogueImportError {
    #[error("failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalogue CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalogue row {row} rejected: {source}")]
    Row {
        row: usize,
        #[source]
        source: BoardError,
    },
}

/// Counts of what an import created or reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueSummary {
    pub companies_created: usize,
    pub employers_created: usize,
    pub jobs: Vec<JobId>,
}

#[derive(Debug, Deserialize)]
struct CatalogueRow {
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "Employer")]
    employer: String,
    #[serde(rename = "Employer Email")]
    employer_email: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Requirements")]
    requirements: String,
    #[serde(rename = "Salary")]
    salary: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Job Type")]
    job_type: String,
    #[serde(rename = "Experience")]
    experience: String,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "Contact Number")]
    contact_number: String,
}

impl CatalogueRow {
    fn posting(&self, company_id: &CompanyId) -> JobPostingRequest {
        JobPostingRequest {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            requirements: Some(self.requirements.clone()),
            salary: Some(FieldValue::from(self.salary.as_str())),
            location: Some(self.location.clone()),
            job_type: Some(self.job_type.clone()),
            experience: Some(FieldValue::from(self.experience.as_str())),
            position: Some(FieldValue::from(self.position.as_str())),
            contact_number: Some(self.contact_number.clone()),
            company_id: Some(company_id.0.clone()),
        }
    }
}

pub struct CatalogueImporter;

impl CatalogueImporter {
    pub fn from_path<S, P>(
        service: &JobBoardService<S>,
        path: P,
    ) -> Result<CatalogueSummary, CatalogueImportError>
    where
        S: BoardStore + 'static,
        P: AsRef<Path>,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(service, file)
    }

    /// Rows are applied in order; the first rejected row stops the import.
    pub fn from_reader<S, R>(
        service: &JobBoardService<S>,
        reader: R,
    ) -> Result<CatalogueSummary, CatalogueImportError>
    where
        S: BoardStore + 'static,
        R: Read,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut summary = CatalogueSummary::default();

        for (index, record) in csv_reader.deserialize::<CatalogueRow>().enumerate() {
            let row = record?;
            // Header is line 1, so the first data row is line 2.
            let line = index + 2;
            let reject = |source: BoardError| CatalogueImportError::Row { row: line, source };

            let company_id = ensure_company(service, &row, &mut summary).map_err(reject)?;
            let employer_id = ensure_employer(service, &row, &mut summary).map_err(reject)?;
            let job = service
                .post_job(&employer_id, row.posting(&company_id))
                .map_err(reject)?;
            summary.jobs.push(job.id);
        }

        info!(
            companies = summary.companies_created,
            employers = summary.employers_created,
            jobs = summary.jobs.len(),
            "catalogue imported"
        );
        Ok(summary)
    }
}

fn ensure_company<S>(
    service: &JobBoardService<S>,
    row: &CatalogueRow,
    summary: &mut CatalogueSummary,
) -> Result<CompanyId, BoardError>
where
    S: BoardStore + 'static,
{
    if let Some(existing) = service.store().company_by_name(&row.company)? {
        return Ok(existing.id);
    }

    let company = service.register_company(NewCompany {
        name: row.company.clone(),
        ..NewCompany::default()
    })?;
    summary.companies_created += 1;
    Ok(company.id)
}

fn ensure_employer<S>(
    service: &JobBoardService<S>,
    row: &CatalogueRow,
    summary: &mut CatalogueSummary,
) -> Result<UserId, BoardError>
where
    S: BoardStore + 'static,
{
    if let Some(existing) = service.store().user_by_email(&row.employer_email)? {
        if existing.role != UserRole::Employer {
            return Err(BoardError::Validation(format!(
                "{} is registered as a worker, not an employer",
                existing.email
            )));
        }
        return Ok(existing.id);
    }

    let employer = service.register_user(NewUser {
        fullname: row.employer.clone(),
        email: row.employer_email.clone(),
        phone_number: row.contact_number.clone(),
        role: UserRole::Employer,
        profile: UserProfile::default(),
    })?;
    summary.employers_created += 1;
    Ok(employer.id)
}

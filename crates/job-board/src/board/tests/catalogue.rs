use std::io::Cursor;

use super::common::*;
use crate::board::catalogue::{CatalogueImportError, CatalogueImporter};
use crate::board::domain::UserRole;
use crate::board::repository::{CompanyRepository, JobRepository, UserRepository};
use crate::board::service::BoardError;

const CATALOGUE: &str = "\
Company,Employer,Employer Email,Title,Description,Requirements,Salary,Location,Job Type,Experience,Position,Contact Number
TechCorp Solutions,Erin Employer,erin@techcorp.example.com,Backend Developer,Build APIs,\"Rust, SQL\",95000,Remote,Full-time,Mid-level,2,+15155550100
TechCorp Solutions,Erin Employer,erin@techcorp.example.com,QA Engineer,Own the test plan,Testing,70000,Des Moines IA,Contract,1-2 years,1,+15155550100
Prairie Health, Pat Recruiter ,pat@prairie.example.com,Nurse,Night shifts,\"RN license, CPR\",68000.50,Ames IA,Part-time,Entry level,4,+15155550111
";

#[test]
fn import_creates_companies_employers_and_jobs() {
    let (service, store) = build_service();

    let summary =
        CatalogueImporter::from_reader(&service, Cursor::new(CATALOGUE)).expect("imports");

    assert_eq!(summary.companies_created, 2);
    assert_eq!(summary.employers_created, 2);
    assert_eq!(summary.jobs.len(), 3);

    let backend = store
        .job(&summary.jobs[0])
        .expect("lookup")
        .expect("job stored");
    assert_eq!(backend.requirements, vec!["Rust", "SQL"]);
    assert_eq!(backend.experience_level, 3);
    assert_eq!(backend.position, 2);

    let nurse = store
        .job(&summary.jobs[2])
        .expect("lookup")
        .expect("job stored");
    assert_eq!(nurse.salary, 68_000.5);
    assert_eq!(nurse.experience_level, 0);

    let recruiter = store
        .user_by_email("pat@prairie.example.com")
        .expect("lookup")
        .expect("employer created");
    assert_eq!(recruiter.fullname, "Pat Recruiter");
    assert_eq!(nurse.created_by, recruiter.id);
    assert!(store
        .company_by_name("Prairie Health")
        .expect("lookup")
        .is_some());
}

#[test]
fn reimport_reuses_existing_companies_and_employers() {
    let (service, store) = build_service();
    CatalogueImporter::from_reader(&service, Cursor::new(CATALOGUE)).expect("first import");

    let summary =
        CatalogueImporter::from_reader(&service, Cursor::new(CATALOGUE)).expect("second import");

    assert_eq!(summary.companies_created, 0);
    assert_eq!(summary.employers_created, 0);
    assert_eq!(summary.jobs.len(), 3);
    assert_eq!(
        store
            .jobs(&crate::board::repository::JobFilter::default())
            .expect("jobs")
            .len(),
        6
    );
}

#[test]
fn import_reports_the_rejected_line() {
    let (service, _) = build_service();
    let csv = "\
Company,Employer,Employer Email,Title,Description,Requirements,Salary,Location,Job Type,Experience,Position,Contact Number
TechCorp Solutions,Erin Employer,erin@techcorp.example.com,Backend Developer,Build APIs,Rust,95000,Remote,Full-time,Senior,2,+15155550100
TechCorp Solutions,Erin Employer,erin@techcorp.example.com,Intern,Learn,Curiosity,20000,Remote,Internship,Entry,0,+15155550100
";

    match CatalogueImporter::from_reader(&service, Cursor::new(csv)) {
        Err(CatalogueImportError::Row {
            row,
            source: BoardError::Validation(message),
        }) => {
            assert_eq!(row, 3);
            assert!(message.starts_with("Position"));
        }
        other => panic!("expected row rejection, got {other:?}"),
    }
}

#[test]
fn import_rejects_missing_columns() {
    let (service, _) = build_service();
    let csv = "Company,Title\nTechCorp Solutions,Backend Developer\n";

    match CatalogueImporter::from_reader(&service, Cursor::new(csv)) {
        Err(CatalogueImportError::Csv(_)) => {}
        other => panic!("expected csv error, got {other:?}"),
    }
}

#[test]
fn import_from_missing_file_is_an_io_error() {
    let (service, _) = build_service();

    match CatalogueImporter::from_path(&service, "/nonexistent/catalogue.csv") {
        Err(CatalogueImportError::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn import_rejects_rows_naming_a_worker_as_employer() {
    let (service, store) = build_service();
    let mut request = new_user("Erin Employer", UserRole::Worker);
    request.email = "erin@techcorp.example.com".to_string();
    service.register_user(request).expect("worker registers");

    match CatalogueImporter::from_reader(&service, Cursor::new(CATALOGUE)) {
        Err(CatalogueImportError::Row {
            row,
            source: BoardError::Validation(message),
        }) => {
            assert_eq!(row, 2);
            assert!(message.contains("not an employer"));
        }
        other => panic!("expected row rejection, got {other:?}"),
    }
    assert!(store
        .jobs(&crate::board::repository::JobFilter::default())
        .expect("jobs")
        .is_empty());
}

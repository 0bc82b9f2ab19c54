use crate::infra::board_service;
use clap::Args;
use job_board::board::{
    BoardError, BoardStore, FieldValue, JobBoardService, JobId, JobPostingRequest, NewCompany,
    NewUser, ProfileChanges, UserId, UserProfile, UserRole,
};
use job_board::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Catalogue CSV to load before the walkthrough
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
    /// Seats offered by the demo posting
    #[arg(long, default_value_t = 2)]
    pub(crate) positions: u32,
    /// Number of workers who apply to the demo posting
    #[arg(long, default_value_t = 3)]
    pub(crate) applicants: usize,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        seed_csv,
        positions,
        applicants,
    } = args;

    println!("Job board demo");
    let service = board_service(seed_csv.as_deref())?;

    match service.all_jobs() {
        Ok(jobs) if !jobs.is_empty() => {
            println!("Seeded catalogue ({} postings)", jobs.len());
            for listing in &jobs {
                println!(
                    "  - {} @ {} | {} of {} seats open",
                    listing.job.title,
                    listing
                        .company
                        .as_ref()
                        .map(|company| company.name.as_str())
                        .unwrap_or("unknown company"),
                    listing.available_positions,
                    listing.job.position
                );
            }
        }
        Ok(_) => println!("No catalogue loaded; starting from an empty board"),
        Err(err) => println!("Catalogue listing unavailable: {}", err),
    }

    println!("\nHiring walkthrough");
    if let Err(err) = hiring_walkthrough(service.as_ref(), positions.max(1), applicants.max(1)) {
        println!("  Walkthrough stopped: {}", err);
    }

    Ok(())
}

fn hiring_walkthrough<S>(
    service: &JobBoardService<S>,
    positions: u32,
    applicants: usize,
) -> Result<(), BoardError>
where
    S: BoardStore + 'static,
{
    let employer = service.register_user(NewUser {
        fullname: "Dana Director".to_string(),
        email: "dana.director@demo.example.com".to_string(),
        phone_number: "+15155550100".to_string(),
        role: UserRole::Employer,
        profile: UserProfile::default(),
    })?;
    let company = service.register_company(NewCompany {
        name: "Demo Freight Co".to_string(),
        location: Some("Des Moines, IA".to_string()),
        ..NewCompany::default()
    })?;

    let job = service.post_job(
        &employer.id,
        JobPostingRequest {
            title: Some("Route Driver".to_string()),
            description: Some("Deliver regional freight on a fixed schedule".to_string()),
            requirements: Some("CDL Class A, Clean driving record".to_string()),
            salary: Some(FieldValue::Number(58_000.0)),
            location: Some("Des Moines, IA".to_string()),
            job_type: Some("Full-time".to_string()),
            experience: Some(FieldValue::from("1-2 years")),
            position: Some(FieldValue::Number(f64::from(positions))),
            contact_number: Some("+15155550142".to_string()),
            company_id: Some(company.id.0.clone()),
        },
    )?;
    println!(
        "- {} posted '{}' with {} seat(s)",
        employer.fullname, job.title, job.position
    );

    let mut workers = Vec::with_capacity(applicants);
    for index in 1..=applicants {
        let worker = service.register_user(NewUser {
            fullname: format!("Applicant {index}"),
            email: format!("applicant.{index}@demo.example.com"),
            phone_number: format!("+1515555{index:04}"),
            role: UserRole::Worker,
            profile: UserProfile::default(),
        })?;
        let application = service.apply(&worker.id, &job.id)?;
        println!(
            "- {} applied ({} -> {})",
            worker.fullname, application.id.0, application.status
        );
        workers.push((worker.id, application.id));
    }

    println!("\nEmployer decisions");
    for (_, application_id) in &workers {
        match service.update_status(&employer.id, application_id, "accepted") {
            Ok(change) => println!(
                "  - {} accepted ({} seat(s) left)",
                change
                    .applicant
                    .map(|applicant| applicant.fullname)
                    .unwrap_or_else(|| application_id.0.clone()),
                service.available_positions(&job.id)?
            ),
            Err(BoardError::CapacityExceeded) => {
                println!("  - {} refused: no positions available", application_id.0)
            }
            Err(err) => return Err(err),
        }
    }

    if let Some((_, first)) = workers.first() {
        if workers.len() > job.position as usize {
            service.update_status(&employer.id, first, "rejected")?;
            println!(
                "  - {} rejected, {} seat(s) open again",
                first.0,
                service.available_positions(&job.id)?
            );
        }
    }

    if let Some((worker, _)) = workers.last() {
        bookmark_walkthrough(service, worker, &job.id)?;
    }

    let roster = service.employer_applications(&employer.id)?;
    println!("\nFinal roster ({} applications)", roster.total);
    for entry in &roster.applications {
        println!(
            "  - {} | {}",
            entry
                .applicant
                .as_ref()
                .map(|applicant| applicant.fullname.as_str())
                .unwrap_or("unknown applicant"),
            entry.application.status
        );
    }

    Ok(())
}

fn bookmark_walkthrough<S>(
    service: &JobBoardService<S>,
    worker: &UserId,
    job_id: &JobId,
) -> Result<(), BoardError>
where
    S: BoardStore + 'static,
{
    let profile = service.update_profile(
        worker,
        ProfileChanges {
            bio: Some("Regional driver looking for steady routes".to_string()),
            skills: Some("CDL Class A, Hazmat, Forklift".to_string()),
            ..ProfileChanges::default()
        },
    )?;
    println!(
        "\n{} lists skills: {}",
        profile.fullname,
        profile.profile.skills.join(", ")
    );

    println!("\nSaved jobs");
    service.save_job(worker, job_id)?;
    if let Err(err) = service.save_job(worker, job_id) {
        println!("  - saving twice: {}", err);
    }
    let saved = service.saved_jobs(worker)?;
    println!("  - {} saved job(s)", saved.saved_jobs.len());
    let is_saved = service.toggle_saved_job(worker, job_id)?;
    println!("  - toggled, saved now: {}", is_saved);
    Ok(())
}

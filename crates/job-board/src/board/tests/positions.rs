use super::common::*;
use crate::board::domain::ApplicationStatus;
use crate::board::positions::{available_positions, available_positions_or_position, open_seats};
use crate::board::repository::{ApplicationRepository, StatusGuard};
use crate::board::service::{BoardError, ErrorKind};

#[test]
fn open_seats_never_exceeds_position_or_goes_negative() {
    for position in 1..=5 {
        for accepted in 0..=8 {
            let open = open_seats(position, accepted);
            assert!(open <= position);
            assert_eq!(open, position.saturating_sub(accepted));
        }
    }
}

#[test]
fn only_accepted_applications_consume_positions() {
    let board = board_with_job(3);
    let statuses = [
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Waitlist,
        ApplicationStatus::Pending,
    ];

    for (index, status) in statuses.into_iter().enumerate() {
        let worker = worker(&board.service, &format!("Worker {index}"));
        let application = board.service.apply(&worker, &board.job.id).expect("applies");
        board
            .store
            .write_status(&application.id, status, StatusGuard::Unconditional)
            .expect("status written");
    }

    assert_eq!(
        available_positions(&*board.store, &board.job).expect("count"),
        2
    );
    assert_eq!(
        board
            .service
            .available_positions(&board.job.id)
            .expect("available"),
        2
    );
}

#[test]
fn over_accepted_jobs_report_zero_open_seats() {
    let board = board_with_job(1);
    let applications: Vec<_> = ["Worker A", "Worker B"]
        .into_iter()
        .map(|name| {
            let worker = worker(&board.service, name);
            board.service.apply(&worker, &board.job.id).expect("applies")
        })
        .collect();

    // Unconditional writes model data that already exceeds capacity.
    for application in &applications {
        board
            .store
            .write_status(
                &application.id,
                ApplicationStatus::Accepted,
                StatusGuard::Unconditional,
            )
            .expect("status written");
    }

    assert_eq!(board.store.count_accepted(&board.job.id).expect("count"), 2);
    assert_eq!(
        available_positions(&*board.store, &board.job).expect("count"),
        0
    );
}

#[test]
fn listing_falls_back_to_raw_position_when_count_fails() {
    let (service, store) = build_faulty_service();
    let employer = employer(&service);
    let company = company(&service, "TechCorp Solutions");
    let job = post_job(&service, &employer, &company, 4);
    FaultyStore::enable(&store.fail_counts);

    assert_eq!(available_positions_or_position(&*store, &job), 4);

    let listings = service.list_jobs(None).expect("listing survives count failure");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].available_positions, 4);

    let detail = service.job_detail(&job.id).expect("detail survives");
    assert_eq!(detail.available_positions, 4);
}

#[test]
fn strict_count_surfaces_store_failures() {
    let (service, store) = build_faulty_service();
    let employer = employer(&service);
    let company = company(&service, "TechCorp Solutions");
    let job = post_job(&service, &employer, &company, 4);
    FaultyStore::enable(&store.fail_counts);

    match service.available_positions(&job.id) {
        Err(error @ BoardError::Repository(_)) => assert_eq!(error.kind(), ErrorKind::Internal),
        other => panic!("expected repository failure, got {other:?}"),
    }
}

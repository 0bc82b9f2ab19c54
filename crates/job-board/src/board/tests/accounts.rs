use super::common::*;
use crate::board::accounts::{NewCompany, ProfileChanges};
use crate::board::domain::{UserId, UserRole};
use crate::board::repository::UserRepository;
use crate::board::service::{BoardError, Entity, ErrorKind};

#[test]
fn register_user_trims_fields_and_starts_without_bookmarks() {
    let (service, _) = build_service();
    let mut request = new_user("Wendy Worker", UserRole::Worker);
    request.fullname = "  Wendy Worker ".to_string();

    let user = service.register_user(request).expect("registers");

    assert_eq!(user.fullname, "Wendy Worker");
    assert_eq!(user.role, UserRole::Worker);
    assert!(user.saved_jobs.is_empty());
}

#[test]
fn register_user_rejects_a_taken_email_in_any_case() {
    let (service, _) = build_service();
    worker(&service, "Wendy Worker");
    let mut request = new_user("Wendy Worker", UserRole::Employer);
    request.email = "WENDY.WORKER@example.com".to_string();

    match service.register_user(request) {
        Err(error @ BoardError::EmailTaken) => assert_eq!(error.kind(), ErrorKind::Conflict),
        other => panic!("expected email taken, got {other:?}"),
    }
}

#[test]
fn register_company_requires_a_name() {
    let (service, _) = build_service();

    match service.register_company(NewCompany {
        name: "   ".to_string(),
        ..NewCompany::default()
    }) {
        Err(BoardError::Validation(message)) => assert_eq!(message, "Company name is required"),
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn update_profile_overwrites_only_the_submitted_fields() {
    let (service, store) = build_service();
    let worker = worker(&service, "Wendy Worker");

    let updated = service
        .update_profile(
            &worker,
            ProfileChanges {
                email: Some(" wendy@prairie.example.com ".to_string()),
                bio: Some("   ".to_string()),
                skills: Some("Forklift,Inventory".to_string()),
                ..ProfileChanges::default()
            },
        )
        .expect("updates");

    assert_eq!(updated.email, "wendy@prairie.example.com");
    assert_eq!(updated.fullname, "Wendy Worker");
    assert_eq!(updated.profile.bio.as_deref(), Some("Wendy Worker bio"));
    assert_eq!(updated.profile.skills, vec!["Forklift", "Inventory"]);
    assert_eq!(
        store
            .user_by_email("wendy@prairie.example.com")
            .expect("lookup")
            .map(|user| user.id),
        Some(worker)
    );
}

#[test]
fn update_profile_keeps_bookmarks_saved_meanwhile() {
    let board = board_with_job(1);
    let worker = worker(&board.service, "Wendy Worker");
    board.service.save_job(&worker, &board.job.id).expect("saved");

    let updated = board
        .service
        .update_profile(
            &worker,
            ProfileChanges {
                fullname: Some("Wendy W. Worker".to_string()),
                ..ProfileChanges::default()
            },
        )
        .expect("updates");

    assert!(updated.saved_jobs.contains(&board.job.id));
}

#[test]
fn update_profile_refuses_another_accounts_email() {
    let (service, store) = build_service();
    let wendy = worker(&service, "Wendy Worker");
    worker(&service, "Walt Worker");

    match service.update_profile(
        &wendy,
        ProfileChanges {
            email: Some("walt.worker@example.com".to_string()),
            ..ProfileChanges::default()
        },
    ) {
        Err(BoardError::EmailTaken) => {}
        other => panic!("expected email taken, got {other:?}"),
    }
    let stored = store.user(&wendy).expect("lookup").expect("exists");
    assert_eq!(stored.email, "wendy.worker@example.com");
}

#[test]
fn update_profile_may_keep_the_callers_own_email() {
    let (service, _) = build_service();
    let wendy = worker(&service, "Wendy Worker");

    let updated = service
        .update_profile(
            &wendy,
            ProfileChanges {
                email: Some("Wendy.Worker@example.com".to_string()),
                ..ProfileChanges::default()
            },
        )
        .expect("updates");

    assert_eq!(updated.email, "Wendy.Worker@example.com");
}

#[test]
fn profile_of_an_unknown_account_is_not_found() {
    let (service, _) = build_service();

    match service.profile(&UserId("user-999999".to_string())) {
        Err(BoardError::NotFound(Entity::User)) => {}
        other => panic!("expected user not found, got {other:?}"),
    }
}

use super::common::*;
use crate::board::applications::domain::{
    ApplicationFormError, ApplicationStatus, CvRef, ReviewDecision,
};
use crate::board::applications::service::ApplicationServiceError;
use crate::board::applications::ApplicationId;
use crate::board::store::StoreError;

#[test]
fn submit_requires_contact_details() {
    let (service, _store) = build_service();
    let mut form = application_form();
    form.applicant_name = String::new();

    match service.submit(&session_for(&alumni(), ALUMNI_TOKEN), form) {
        Err(ApplicationServiceError::Form(ApplicationFormError::MissingContact)) => {}
        other => panic!("expected missing contact error, got {other:?}"),
    }
}

#[test]
fn submit_rejects_non_document_cv_references() {
    let (service, _store) = build_service();
    let mut form = application_form();
    form.cv = Some(CvRef {
        url: "https://cdn.example/selfie.png".to_string(),
        content_type: "image/png".to_string(),
    });

    match service.submit(&session_for(&alumni(), ALUMNI_TOKEN), form) {
        Err(ApplicationServiceError::Form(ApplicationFormError::Attachment(_))) => {}
        other => panic!("expected attachment error, got {other:?}"),
    }
}

#[test]
fn submit_stores_a_pending_record_for_the_session_account() {
    let (service, _store) = build_service();
    let session = session_for(&alumni(), ALUMNI_TOKEN);

    let record = service
        .submit(&session, application_form())
        .expect("submission succeeds");

    assert_eq!(record.status, ApplicationStatus::Pending);
    assert_eq!(record.applicant, session.account_id);
    assert_eq!(record.job_id.0, "job-000001");
    assert_eq!(record.status_view().status, "Pending");
}

#[test]
fn pending_review_is_admin_only() {
    let (service, _store) = build_service();
    match service.pending_review(&alumni()) {
        Err(ApplicationServiceError::Role(violation)) => {
            assert_eq!(violation.action, "Reviewing applications");
        }
        other => panic!("expected role violation, got {other:?}"),
    }
}

#[test]
fn decided_applications_leave_the_pending_queue() {
    let (service, _store) = build_service();
    let session = session_for(&alumni(), ALUMNI_TOKEN);

    let first = service
        .submit(&session, application_form())
        .expect("first submission");
    let second = service
        .submit(&session, application_form())
        .expect("second submission");

    service
        .decide(&admin(), &first.id, ReviewDecision::Approve)
        .expect("approval succeeds");

    let pending = service.pending_review(&admin()).expect("pending listing");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);

    service
        .decide(&admin(), &second.id, ReviewDecision::Reject)
        .expect("rejection succeeds");
    let pending = service.pending_review(&admin()).expect("pending listing");
    assert!(pending.is_empty());
}

#[test]
fn the_first_decision_wins() {
    let (service, _store) = build_service();
    let record = service
        .submit(&session_for(&alumni(), ALUMNI_TOKEN), application_form())
        .expect("submission succeeds");

    let approved = service
        .decide(&admin(), &record.id, ReviewDecision::Approve)
        .expect("approval succeeds");
    assert_eq!(approved.status, ApplicationStatus::Approved);

    match service.decide(&admin(), &record.id, ReviewDecision::Reject) {
        Err(ApplicationServiceError::AlreadyDecided { status, .. }) => {
            assert_eq!(status, ApplicationStatus::Approved);
        }
        other => panic!("expected already-decided conflict, got {other:?}"),
    }
}

#[test]
fn deciding_an_unknown_application_is_not_found() {
    let (service, _store) = build_service();
    match service.decide(
        &admin(),
        &ApplicationId("app-999999".to_string()),
        ReviewDecision::Approve,
    ) {
        Err(ApplicationServiceError::Store(StoreError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn members_see_their_own_application_status() {
    let (service, _store) = build_service();
    let session = session_for(&alumni(), ALUMNI_TOKEN);

    assert!(service
        .status_for(&session)
        .expect("status query succeeds")
        .is_none());

    let record = service
        .submit(&session, application_form())
        .expect("submission succeeds");
    service
        .decide(&admin(), &record.id, ReviewDecision::Approve)
        .expect("approval succeeds");

    let mine = service
        .status_for(&session)
        .expect("status query succeeds")
        .expect("application present");
    assert_eq!(mine.status, ApplicationStatus::Approved);

    let stranger = session_for(&admin(), ADMIN_TOKEN);
    assert!(service
        .status_for(&stranger)
        .expect("status query succeeds")
        .is_none());
}

#[test]
fn export_is_admin_only_and_lists_every_application() {
    let (service, _store) = build_service();
    let session = session_for(&alumni(), ALUMNI_TOKEN);
    let first = service
        .submit(&session, application_form())
        .expect("first submission");
    service
        .submit(&session, application_form())
        .expect("second submission");
    service
        .decide(&admin(), &first.id, ReviewDecision::Reject)
        .expect("rejection succeeds");

    match service.export_csv(&alumni()) {
        Err(ApplicationServiceError::Role(_)) => {}
        other => panic!("expected role violation, got {other:?}"),
    }

    let bytes = service.export_csv(&admin()).expect("export succeeds");
    let text = String::from_utf8(bytes).expect("utf-8 csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3, "header plus one row per application");
    assert!(lines[0].starts_with("id,job_id,applicant_id"));
    assert!(text.contains("Rejected"));
    assert!(text.contains("Pending"));
}

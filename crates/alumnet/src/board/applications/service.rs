use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::domain::{
    ApplicationForm, ApplicationFormError, ApplicationId, ApplicationRecord, ApplicationStatus,
    ReviewDecision,
};
use super::store::ApplicationStore;
use crate::board::accounts::{require_admin, AccountRecord, AuthSession, RoleViolation};
use crate::board::store::StoreError;

/// Service backing application submission, the admin review queue, and the
/// applicant's own status view.
pub struct JobApplicationService<S> {
    store: Arc<S>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<S> JobApplicationService<S>
where
    S: ApplicationStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Submit an application for the signed-in member. The record enters
    /// the store as Pending and references the session's account.
    pub fn submit(
        &self,
        applicant: &AuthSession,
        form: ApplicationForm,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        form.validate()?;

        let record = ApplicationRecord {
            id: next_application_id(),
            job_id: form.job_id,
            applicant: applicant.account_id.clone(),
            applicant_name: form.applicant_name,
            applicant_email: form.applicant_email,
            cover_letter: form.cover_letter,
            cv: form.cv,
            status: ApplicationStatus::Pending,
        };

        let stored = self.store.insert(record)?;
        Ok(stored)
    }

    /// Admin-only: everything still awaiting a decision. The status field
    /// is the sole authority, so decided records never reappear here.
    pub fn pending_review(
        &self,
        actor: &AccountRecord,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        require_admin(actor, "Reviewing applications")?;
        let records = self.store.pending()?;
        Ok(records)
    }

    /// Admin-only: approve or reject a pending application. The first
    /// decision wins; anything later is a conflict.
    pub fn decide(
        &self,
        actor: &AccountRecord,
        id: &ApplicationId,
        decision: ReviewDecision,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        require_admin(actor, "Reviewing applications")?;

        let mut record = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        if !record.status.is_pending() {
            return Err(ApplicationServiceError::AlreadyDecided {
                id: record.id,
                status: record.status,
            });
        }

        record.status = decision.status();
        self.store.update(record.clone())?;
        Ok(record)
    }

    pub fn details(
        &self,
        id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    /// The applicant's own application, if any. The client shows a single
    /// submission per member, so the first match is returned.
    pub fn status_for(
        &self,
        applicant: &AuthSession,
    ) -> Result<Option<ApplicationRecord>, ApplicationServiceError> {
        let mut records = self.store.for_applicant(&applicant.account_id)?;
        if records.is_empty() {
            return Ok(None);
        }
        Ok(Some(records.remove(0)))
    }

    /// Admin-only CSV dump of every application on file.
    pub fn export_csv(&self, actor: &AccountRecord) -> Result<Vec<u8>, ApplicationServiceError> {
        require_admin(actor, "Exporting applications")?;

        let records = self.store.all()?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "id",
                "job_id",
                "applicant_id",
                "applicant_name",
                "applicant_email",
                "status",
                "cv_url",
            ])
            .map_err(ExportError::from)?;
        for record in records {
            writer
                .write_record([
                    record.id.0.as_str(),
                    record.job_id.0.as_str(),
                    record.applicant.0.as_str(),
                    record.applicant_name.as_str(),
                    record.applicant_email.as_str(),
                    record.status.label(),
                    record.cv.as_ref().map(|cv| cv.url.as_str()).unwrap_or(""),
                ])
                .map_err(ExportError::from)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::from(csv::Error::from(err.into_error())))?;
        Ok(bytes)
    }
}

/// Error raised while rendering the CSV export.
#[derive(Debug, thiserror::Error)]
#[error("failed to render application export: {0}")]
pub struct ExportError(#[from] csv::Error);

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Role(#[from] RoleViolation),
    #[error(transparent)]
    Form(#[from] ApplicationFormError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("application {} was already {}", .id.0, .status.label())]
    AlreadyDecided {
        id: ApplicationId,
        status: ApplicationStatus,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
}

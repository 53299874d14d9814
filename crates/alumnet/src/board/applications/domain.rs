use serde::{Deserialize, Serialize};

use crate::board::accounts::AccountId;
use crate::board::attachment::{document_content_type, AttachmentError};
use crate::board::jobs::JobId;

/// Identifier for a document in the `jobApplications` collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Review status. Pending is the only state a decision can act on; once
/// approved or rejected the record leaves the review queue for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub const fn is_pending(self) -> bool {
        matches!(self, ApplicationStatus::Pending)
    }
}

/// An admin's verdict on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub const fn status(self) -> ApplicationStatus {
        match self {
            ReviewDecision::Approve => ApplicationStatus::Approved,
            ReviewDecision::Reject => ApplicationStatus::Rejected,
        }
    }
}

/// Reference to an externally hosted CV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvRef {
    pub url: String,
    pub content_type: String,
}

impl CvRef {
    pub fn new(url: impl Into<String>, content_type: impl Into<String>) -> Result<Self, AttachmentError> {
        let content_type = content_type.into();
        document_content_type(&content_type)?;
        Ok(Self {
            url: url.into(),
            content_type,
        })
    }
}

/// The application form as the client submits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub job_id: JobId,
    pub applicant_name: String,
    pub applicant_email: String,
    pub cover_letter: String,
    pub cv: Option<CvRef>,
}

impl ApplicationForm {
    pub fn validate(&self) -> Result<(), ApplicationFormError> {
        if self.applicant_name.is_empty() || self.applicant_email.is_empty() {
            return Err(ApplicationFormError::MissingContact);
        }
        if let Some(cv) = &self.cv {
            document_content_type(&cv.content_type)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApplicationFormError {
    #[error("Please enter your name and email")]
    MissingContact,
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

/// Document stored in the `jobApplications` collection. References exactly
/// one job and one applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant: AccountId,
    pub applicant_name: String,
    pub applicant_email: String,
    pub cover_letter: String,
    pub cv: Option<CvRef>,
    pub status: ApplicationStatus,
}

impl ApplicationRecord {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            job_id: self.job_id.clone(),
            applicant_name: self.applicant_name.clone(),
            status: self.status.label(),
        }
    }
}

/// Compact representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub applicant_name: String,
    pub status: &'static str,
}

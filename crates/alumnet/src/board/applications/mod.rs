//! Job applications: submission by alumni, the admin review queue with
//! approve/reject decisions, the applicant's own status view, and the
//! admin CSV export.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationForm, ApplicationFormError, ApplicationId, ApplicationRecord, ApplicationStatus,
    ApplicationStatusView, CvRef, ReviewDecision,
};
pub use router::{application_router, ApplicationRoutes};
pub use service::{ApplicationServiceError, ExportError, JobApplicationService};
pub use store::ApplicationStore;

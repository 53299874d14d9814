//! Job postings: the admin posting form, the active listing with its lazy
//! expiry sweep, and the details view.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;

pub use domain::{JobDraft, JobDraftError, JobId, JobRecord};
pub use router::{job_router, JobRoutes};
pub use service::{JobBoardError, JobBoardService, JobControls, JobListing};
pub use store::JobStore;

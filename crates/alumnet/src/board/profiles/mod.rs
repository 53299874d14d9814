//! Profile documents and the seven-step creation wizard.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;

pub use domain::{PictureRef, ProfileRecord, WizardInput, WizardStep};
pub use router::{profile_router, ProfileRoutes};
pub use service::{ProfileService, ProfileServiceError, WizardProgress};
pub use store::ProfileStore;

//! Account lifecycle: registration, sign-in, password reset, and the
//! role/profile-completion record backing the login routing decision.

pub mod directory;
pub mod domain;
pub mod provider;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use directory::{AccountDirectory, DirectoryError};
pub use domain::{
    require_admin, AccountId, AccountRecord, AuthSession, Credentials, RegistrationError,
    RegistrationForm, Role, RoleViolation, SessionToken,
};
pub use provider::{IdentityError, IdentityProvider};
pub use router::{account_router, bearer_token};
pub use service::{
    AccountService, AccountServiceError, LoginOutcome, RegistrationReceipt, ResetReceipt,
};

use super::domain::{AccountId, AuthSession, SessionToken};

/// Port onto the external identity provider.
///
/// Sign-up creates the credential pair and returns the provider-issued
/// account id; verification and password-reset emails are dispatched by
/// the provider itself. Sessions are opaque tokens resolved per request.
pub trait IdentityProvider: Send + Sync {
    fn sign_up(&self, email: &str, password: &str) -> Result<AccountId, IdentityError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError>;
    fn send_verification(&self, account_id: &AccountId) -> Result<(), IdentityError>;
    fn send_password_reset(&self, email: &str) -> Result<(), IdentityError>;
    fn resolve(&self, token: &SessionToken) -> Result<AuthSession, IdentityError>;
    fn sign_out(&self, token: &SessionToken) -> Result<(), IdentityError>;
}

/// Provider failures, rendered to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("An account already exists for this email")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("No account found for this email")]
    UnknownEmail,
    #[error("Session expired or signed out")]
    SessionExpired,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

use std::sync::Arc;

use serde::Serialize;

use super::directory::{AccountDirectory, DirectoryError};
use super::domain::{
    AccountRecord, AuthSession, Credentials, RegistrationError, RegistrationForm, Role,
    SessionToken,
};
use super::provider::{IdentityError, IdentityProvider};
use crate::board::nav::Route;

/// Service composing the identity provider and the `users` directory.
pub struct AccountService<P, D> {
    provider: Arc<P>,
    directory: Arc<D>,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub email: String,
    pub message: String,
    pub next: Route,
}

/// Outcome of a successful sign-in, including where the client goes next.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub session: AuthSession,
    pub account: AccountRecord,
    pub next: Route,
}

/// Outcome of a password-reset request.
#[derive(Debug, Clone, Serialize)]
pub struct ResetReceipt {
    pub message: String,
    pub next: Route,
}

impl<P, D> AccountService<P, D>
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
{
    pub fn new(provider: Arc<P>, directory: Arc<D>) -> Self {
        Self {
            provider,
            directory,
        }
    }

    /// Create the credential pair, the `users` document (role `alumni`,
    /// profile not yet completed), and dispatch the verification email.
    ///
    /// Validation failures return before any remote call is issued.
    pub fn register(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationReceipt, AccountServiceError> {
        form.validate()?;

        let account_id = self.provider.sign_up(&form.email, &form.password)?;
        self.directory.upsert(AccountRecord {
            id: account_id.clone(),
            email: form.email.clone(),
            role: Role::Alumni,
            profile_completed: false,
        })?;
        self.provider.send_verification(&account_id)?;

        Ok(RegistrationReceipt {
            message: format!(
                "Verification email sent to {}. Please verify your email before logging in.",
                form.email
            ),
            email: form.email,
            next: Route::Login,
        })
    }

    /// Sign in and decide the landing route.
    ///
    /// An unverified session is signed out on the spot; a verified one is
    /// routed to the dashboard when the profile is complete and into the
    /// wizard otherwise. A missing `users` document degrades to the
    /// fallback record rather than failing the login.
    pub fn login(&self, credentials: Credentials) -> Result<LoginOutcome, AccountServiceError> {
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(AccountServiceError::MissingCredentials);
        }

        let session = self
            .provider
            .sign_in(&credentials.email, &credentials.password)?;
        if !session.email_verified {
            self.provider.sign_out(&session.token)?;
            return Err(AccountServiceError::EmailNotVerified);
        }

        let account = self
            .directory
            .fetch(&session.account_id)?
            .unwrap_or_else(|| {
                AccountRecord::fallback(session.account_id.clone(), session.email.clone())
            });
        let next = if account.profile_completed {
            Route::Dashboard
        } else {
            Route::ProfileCreation
        };

        Ok(LoginOutcome {
            session,
            account,
            next,
        })
    }

    pub fn forgot_password(&self, email: &str) -> Result<ResetReceipt, AccountServiceError> {
        if email.is_empty() {
            return Err(AccountServiceError::MissingEmail);
        }
        self.provider.send_password_reset(email)?;
        Ok(ResetReceipt {
            message: format!("Password reset email sent to {email}"),
            next: Route::Login,
        })
    }

    pub fn sign_out(&self, token: &SessionToken) -> Result<(), AccountServiceError> {
        self.provider.sign_out(token)?;
        Ok(())
    }

    /// Resolve a bearer token into the session and its `users` record.
    pub fn current(
        &self,
        token: &SessionToken,
    ) -> Result<(AuthSession, AccountRecord), AccountServiceError> {
        let session = self.provider.resolve(token)?;
        let account = self
            .directory
            .fetch(&session.account_id)?
            .unwrap_or_else(|| {
                AccountRecord::fallback(session.account_id.clone(), session.email.clone())
            });
        Ok((session, account))
    }
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error("Please enter both email and password")]
    MissingCredentials,
    #[error("Please enter your email")]
    MissingEmail,
    #[error("Email not verified. Please verify your email.")]
    EmailNotVerified,
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

use serde::{Deserialize, Serialize};

/// Identifier issued by the external identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// Opaque session handle returned by the provider at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Alumni,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Alumni => "alumni",
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Document stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub email: String,
    pub role: Role,
    pub profile_completed: bool,
}

impl AccountRecord {
    /// Stand-in used when the `users` document is missing: the account
    /// behaves as a fresh alumni member and is routed through the wizard.
    pub fn fallback(id: AccountId, email: String) -> Self {
        Self {
            id,
            email,
            role: Role::Alumni,
            profile_completed: false,
        }
    }
}

/// Email + password pair for sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form with the confirmation field the client collects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Client-side validation: runs before any remote call is issued.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.email.is_empty() || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(RegistrationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Please enter email, password, and confirm password")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Signed-in session as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub account_id: AccountId,
    pub email: String,
    pub token: SessionToken,
    pub email_verified: bool,
}

/// Raised when a non-admin account reaches an admin-only operation.
///
/// The clients hide admin controls from alumni; the service checks again
/// so a hand-crafted request gets a readable refusal.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{action} requires an admin account")]
pub struct RoleViolation {
    pub action: &'static str,
}

pub fn require_admin(account: &AccountRecord, action: &'static str) -> Result<(), RoleViolation> {
    if account.role.is_admin() {
        Ok(())
    } else {
        Err(RoleViolation { action })
    }
}

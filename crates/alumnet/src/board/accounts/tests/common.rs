use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::board::accounts::directory::{AccountDirectory, DirectoryError};
use crate::board::accounts::domain::{
    AccountId, AccountRecord, AuthSession, RegistrationForm, SessionToken,
};
use crate::board::accounts::provider::{IdentityError, IdentityProvider};
use crate::board::accounts::service::AccountService;

pub(super) fn registration_form() -> RegistrationForm {
    RegistrationForm {
        email: "grad@alumni.example".to_string(),
        password: "correct-horse".to_string(),
        confirm_password: "correct-horse".to_string(),
    }
}

pub(super) fn build_service() -> (
    AccountService<MemoryIdentity, MemoryDirectory>,
    Arc<MemoryIdentity>,
    Arc<MemoryDirectory>,
) {
    let provider = Arc::new(MemoryIdentity::default());
    let directory = Arc::new(MemoryDirectory::default());
    let service = AccountService::new(provider.clone(), directory.clone());
    (service, provider, directory)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum MailEvent {
    Verification { email: String },
    PasswordReset { email: String },
}

struct StoredIdentity {
    account_id: AccountId,
    password: String,
    verified: bool,
}

/// Provider double: credentials keyed by email, sessions by token, and an
/// outbox capturing the emails the real provider would send.
#[derive(Default)]
pub(super) struct MemoryIdentity {
    accounts: Mutex<HashMap<String, StoredIdentity>>,
    sessions: Mutex<HashMap<String, String>>,
    outbox: Mutex<Vec<MailEvent>>,
    sequence: AtomicU64,
}

impl MemoryIdentity {
    pub(super) fn outbox(&self) -> Vec<MailEvent> {
        self.outbox.lock().expect("outbox mutex poisoned").clone()
    }

    pub(super) fn account_count(&self) -> usize {
        self.accounts.lock().expect("accounts mutex poisoned").len()
    }

    pub(super) fn session_count(&self) -> usize {
        self.sessions.lock().expect("sessions mutex poisoned").len()
    }

    /// Stand-in for the user clicking the verification link.
    pub(super) fn mark_verified(&self, email: &str) {
        let mut guard = self.accounts.lock().expect("accounts mutex poisoned");
        if let Some(stored) = guard.get_mut(email) {
            stored.verified = true;
        }
    }
}

impl IdentityProvider for MemoryIdentity {
    fn sign_up(&self, email: &str, password: &str) -> Result<AccountId, IdentityError> {
        let mut guard = self.accounts.lock().expect("accounts mutex poisoned");
        if guard.contains_key(email) {
            return Err(IdentityError::EmailTaken);
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let account_id = AccountId(format!("acct-{id:04}"));
        guard.insert(
            email.to_string(),
            StoredIdentity {
                account_id: account_id.clone(),
                password: password.to_string(),
                verified: false,
            },
        );
        Ok(account_id)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        let guard = self.accounts.lock().expect("accounts mutex poisoned");
        let stored = guard.get(email).ok_or(IdentityError::InvalidCredentials)?;
        if stored.password != password {
            return Err(IdentityError::InvalidCredentials);
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let token = SessionToken(format!("sess-{id:06}"));
        self.sessions
            .lock()
            .expect("sessions mutex poisoned")
            .insert(token.0.clone(), email.to_string());
        Ok(AuthSession {
            account_id: stored.account_id.clone(),
            email: email.to_string(),
            token,
            email_verified: stored.verified,
        })
    }

    fn send_verification(&self, account_id: &AccountId) -> Result<(), IdentityError> {
        let guard = self.accounts.lock().expect("accounts mutex poisoned");
        let email = guard
            .iter()
            .find(|(_, stored)| &stored.account_id == account_id)
            .map(|(email, _)| email.clone())
            .ok_or(IdentityError::UnknownEmail)?;
        self.outbox
            .lock()
            .expect("outbox mutex poisoned")
            .push(MailEvent::Verification { email });
        Ok(())
    }

    fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let guard = self.accounts.lock().expect("accounts mutex poisoned");
        if !guard.contains_key(email) {
            return Err(IdentityError::UnknownEmail);
        }
        self.outbox
            .lock()
            .expect("outbox mutex poisoned")
            .push(MailEvent::PasswordReset {
                email: email.to_string(),
            });
        Ok(())
    }

    fn resolve(&self, token: &SessionToken) -> Result<AuthSession, IdentityError> {
        let sessions = self.sessions.lock().expect("sessions mutex poisoned");
        let email = sessions
            .get(&token.0)
            .cloned()
            .ok_or(IdentityError::SessionExpired)?;
        let accounts = self.accounts.lock().expect("accounts mutex poisoned");
        let stored = accounts.get(&email).ok_or(IdentityError::SessionExpired)?;
        Ok(AuthSession {
            account_id: stored.account_id.clone(),
            email,
            token: token.clone(),
            email_verified: stored.verified,
        })
    }

    fn sign_out(&self, token: &SessionToken) -> Result<(), IdentityError> {
        self.sessions
            .lock()
            .expect("sessions mutex poisoned")
            .remove(&token.0);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    records: Mutex<HashMap<AccountId, AccountRecord>>,
}

impl MemoryDirectory {
    pub(super) fn record_count(&self) -> usize {
        self.records.lock().expect("directory mutex poisoned").len()
    }

    pub(super) fn set_profile_completed(&self, id: &AccountId, completed: bool) {
        let mut guard = self.records.lock().expect("directory mutex poisoned");
        if let Some(record) = guard.get_mut(id) {
            record.profile_completed = completed;
        }
    }

    pub(super) fn remove(&self, id: &AccountId) {
        self.records
            .lock()
            .expect("directory mutex poisoned")
            .remove(id);
    }
}

impl AccountDirectory for MemoryDirectory {
    fn upsert(&self, record: AccountRecord) -> Result<(), DirectoryError> {
        self.records
            .lock()
            .expect("directory mutex poisoned")
            .insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AccountId) -> Result<Option<AccountRecord>, DirectoryError> {
        let guard = self.records.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn mark_profile_completed(&self, id: &AccountId) -> Result<(), DirectoryError> {
        let mut guard = self.records.lock().expect("directory mutex poisoned");
        match guard.get_mut(id) {
            Some(record) => {
                record.profile_completed = true;
                Ok(())
            }
            None => Err(DirectoryError::NotFound),
        }
    }
}

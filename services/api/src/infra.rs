use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alumnet::board::accounts::{
    AccountDirectory, AccountId, AccountRecord, AuthSession, DirectoryError, IdentityError,
    IdentityProvider, SessionToken,
};
use alumnet::board::applications::{ApplicationId, ApplicationRecord, ApplicationStore};
use alumnet::board::jobs::{JobId, JobRecord, JobStore};
use alumnet::board::profiles::{ProfileRecord, ProfileStore};
use alumnet::board::store::StoreError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Emails the hosted identity provider would send on our behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MailEvent {
    Verification { email: String },
    PasswordReset { email: String },
}

struct StoredIdentity {
    account_id: AccountId,
    password: String,
    verified: bool,
}

/// Identity-provider double for local runs and tests. Real deployments
/// point the ports at the hosted provider; nothing in the service crates
/// depends on this implementation.
#[derive(Default)]
pub(crate) struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<String, StoredIdentity>>,
    sessions: Mutex<HashMap<String, String>>,
    outbox: Mutex<Vec<MailEvent>>,
    sequence: AtomicU64,
}

impl InMemoryIdentityProvider {
    pub(crate) fn outbox(&self) -> Vec<MailEvent> {
        self.outbox.lock().expect("outbox mutex poisoned").clone()
    }

    /// Stand-in for the user clicking the emailed verification link.
    pub(crate) fn mark_verified(&self, email: &str) {
        let mut guard = self.accounts.lock().expect("accounts mutex poisoned");
        if let Some(stored) = guard.get_mut(email) {
            stored.verified = true;
        }
    }

    /// Create an already-verified account, used for seeding admins.
    pub(crate) fn register_verified(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountId, IdentityError> {
        let account_id = self.sign_up(email, password)?;
        self.mark_verified(email);
        Ok(account_id)
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
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
pub(crate) struct InMemoryAccountDirectory {
    records: Mutex<HashMap<AccountId, AccountRecord>>,
}

impl AccountDirectory for InMemoryAccountDirectory {
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

#[derive(Default)]
pub(crate) struct InMemoryProfileStore {
    records: Mutex<HashMap<AccountId, ProfileRecord>>,
}

impl ProfileStore for InMemoryProfileStore {
    fn set(&self, record: ProfileRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("profile mutex poisoned")
            .insert(record.owner.clone(), record);
        Ok(())
    }

    fn fetch(&self, owner: &AccountId) -> Result<Option<ProfileRecord>, StoreError> {
        let guard = self.records.lock().expect("profile mutex poisoned");
        Ok(guard.get(owner).cloned())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryJobStore {
    records: Mutex<HashMap<JobId, JobRecord>>,
}

impl JobStore for InMemoryJobStore {
    fn insert(&self, record: JobRecord) -> Result<JobRecord, StoreError> {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: JobRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        self.records.lock().expect("job mutex poisoned").remove(id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<JobRecord>, StoreError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        let mut jobs: Vec<JobRecord> = guard.values().cloned().collect();
        jobs.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(jobs)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryApplicationStore {
    records: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
}

impl ApplicationStore for InMemoryApplicationStore {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, StoreError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut records: Vec<ApplicationRecord> = guard
            .values()
            .filter(|record| record.status.is_pending())
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }

    fn for_applicant(&self, applicant: &AccountId) -> Result<Vec<ApplicationRecord>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut records: Vec<ApplicationRecord> = guard
            .values()
            .filter(|record| &record.applicant == applicant)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }

    fn all(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        let mut records: Vec<ApplicationRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
    }
}

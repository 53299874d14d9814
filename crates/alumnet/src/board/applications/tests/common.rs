use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::board::accounts::{
    AccountDirectory, AccountId, AccountRecord, AccountService, AuthSession, DirectoryError,
    IdentityError, IdentityProvider, Role, SessionToken,
};
use crate::board::applications::domain::{ApplicationForm, ApplicationRecord, CvRef};
use crate::board::applications::router::{application_router, ApplicationRoutes};
use crate::board::applications::service::JobApplicationService;
use crate::board::applications::store::ApplicationStore;
use crate::board::applications::ApplicationId;
use crate::board::jobs::JobId;
use crate::board::store::StoreError;

pub(super) const ADMIN_TOKEN: &str = "admin-token";
pub(super) const ALUMNI_TOKEN: &str = "alumni-token";

pub(super) fn admin() -> AccountRecord {
    AccountRecord {
        id: AccountId("acct-0001".to_string()),
        email: "admin@alumni.example".to_string(),
        role: Role::Admin,
        profile_completed: true,
    }
}

pub(super) fn alumni() -> AccountRecord {
    AccountRecord {
        id: AccountId("acct-0002".to_string()),
        email: "grad@alumni.example".to_string(),
        role: Role::Alumni,
        profile_completed: true,
    }
}

pub(super) fn session_for(account: &AccountRecord, token: &str) -> AuthSession {
    AuthSession {
        account_id: account.id.clone(),
        email: account.email.clone(),
        token: SessionToken(token.to_string()),
        email_verified: true,
    }
}

pub(super) fn application_form() -> ApplicationForm {
    ApplicationForm {
        job_id: JobId("job-000001".to_string()),
        applicant_name: "Dana Reyes".to_string(),
        applicant_email: "grad@alumni.example".to_string(),
        cover_letter: "I maintained the campus job board for two years.".to_string(),
        cv: Some(CvRef {
            url: "https://cdn.example/cv/dana.pdf".to_string(),
            content_type: "application/pdf".to_string(),
        }),
    }
}

#[derive(Default)]
pub(super) struct MemoryApplications {
    records: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
}

impl ApplicationStore for MemoryApplications {
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

pub(super) fn build_service() -> (
    JobApplicationService<MemoryApplications>,
    Arc<MemoryApplications>,
) {
    let store = Arc::new(MemoryApplications::default());
    let service = JobApplicationService::new(store.clone());
    (service, store)
}

/// Provider double resolving two fixed bearer tokens; the account flows
/// through the directory below.
pub(super) struct StaticSessions;

impl IdentityProvider for StaticSessions {
    fn sign_up(&self, _email: &str, _password: &str) -> Result<AccountId, IdentityError> {
        Err(IdentityError::Unavailable("not under test".to_string()))
    }

    fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthSession, IdentityError> {
        Err(IdentityError::Unavailable("not under test".to_string()))
    }

    fn send_verification(&self, _account_id: &AccountId) -> Result<(), IdentityError> {
        Ok(())
    }

    fn send_password_reset(&self, _email: &str) -> Result<(), IdentityError> {
        Ok(())
    }

    fn resolve(&self, token: &SessionToken) -> Result<AuthSession, IdentityError> {
        match token.0.as_str() {
            ADMIN_TOKEN => Ok(session_for(&admin(), ADMIN_TOKEN)),
            ALUMNI_TOKEN => Ok(session_for(&alumni(), ALUMNI_TOKEN)),
            _ => Err(IdentityError::SessionExpired),
        }
    }

    fn sign_out(&self, _token: &SessionToken) -> Result<(), IdentityError> {
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct StaticDirectory {
    records: Mutex<HashMap<AccountId, AccountRecord>>,
}

impl StaticDirectory {
    pub(super) fn seeded() -> Self {
        let directory = Self::default();
        directory.upsert(admin()).expect("seed admin");
        directory.upsert(alumni()).expect("seed alumni");
        directory
    }
}

impl AccountDirectory for StaticDirectory {
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

pub(super) fn application_router_with_store(
    store: Arc<MemoryApplications>,
) -> axum::Router {
    let accounts = Arc::new(AccountService::new(
        Arc::new(StaticSessions),
        Arc::new(StaticDirectory::seeded()),
    ));
    let applications = Arc::new(JobApplicationService::new(store));
    application_router(ApplicationRoutes {
        accounts,
        applications,
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

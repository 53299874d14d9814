use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{JobDraft, JobDraftError, JobId, JobRecord};
use super::store::JobStore;
use crate::board::accounts::{require_admin, AccountRecord, Role, RoleViolation};
use crate::board::store::StoreError;

/// Service backing the job listing, posting form, and details view.
pub struct JobBoardService<S> {
    store: Arc<S>,
}

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Result of an active-listing fetch, including how many expired records
/// the sweep removed.
#[derive(Debug, Clone, Serialize)]
pub struct JobListing {
    pub jobs: Vec<JobRecord>,
    pub swept: usize,
}

/// Display-layer courtesy flags: which controls a role gets to see.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct JobControls {
    pub can_post: bool,
    pub can_apply: bool,
}

impl JobControls {
    pub fn for_role(role: Role) -> Self {
        Self {
            can_post: role.is_admin(),
            can_apply: !role.is_admin(),
        }
    }
}

impl<S> JobBoardService<S>
where
    S: JobStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Admin-only: create a posting expiring `duration_days` from now.
    pub fn post(
        &self,
        actor: &AccountRecord,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<JobRecord, JobBoardError> {
        require_admin(actor, "Posting jobs")?;
        draft.validate()?;
        let record = draft.into_record(next_job_id(), now);
        let stored = self.store.insert(record)?;
        Ok(stored)
    }

    /// Admin-only full-document update. The posted date and expiration are
    /// restamped from the edit instant, as a re-post would be.
    pub fn edit(
        &self,
        actor: &AccountRecord,
        id: &JobId,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<JobRecord, JobBoardError> {
        require_admin(actor, "Editing jobs")?;
        draft.validate()?;
        let existing = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        let updated = draft.into_record(existing.id, now);
        self.store.update(updated.clone())?;
        Ok(updated)
    }

    /// The active listing. Records whose expiration has passed never
    /// appear; each one encountered is deleted on the spot, which is the
    /// only expiry mechanism the board has.
    pub fn active(&self, now: DateTime<Utc>) -> Result<JobListing, JobBoardError> {
        let mut jobs = Vec::new();
        let mut swept = 0;
        for job in self.store.list()? {
            if job.is_active(now) {
                jobs.push(job);
            } else {
                self.store.delete(&job.id)?;
                swept += 1;
            }
        }
        Ok(JobListing { jobs, swept })
    }

    pub fn details(&self, id: &JobId) -> Result<JobRecord, JobBoardError> {
        let record = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the job-board service.
#[derive(Debug, thiserror::Error)]
pub enum JobBoardError {
    #[error(transparent)]
    Role(#[from] RoleViolation),
    #[error(transparent)]
    Draft(#[from] JobDraftError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

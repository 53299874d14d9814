use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for a document in the `jobs` collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// A posted job. Active while the current time is before `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub salary: String,
    pub posted_on: NaiveDate,
    pub expires_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Posted date the way the listing cards render it.
    pub fn posted_label(&self) -> String {
        self.posted_on.format("%d/%m/%Y").to_string()
    }
}

/// The posting form: free-text fields plus the listing duration in days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub salary: String,
    pub duration_days: u32,
}

impl JobDraft {
    pub fn validate(&self) -> Result<(), JobDraftError> {
        if self.title.is_empty() || self.description.is_empty() || self.salary.is_empty() {
            return Err(JobDraftError::MissingFields);
        }
        if self.duration_days == 0 {
            return Err(JobDraftError::InvalidDuration);
        }
        Ok(())
    }

    /// Stamp the posted date and expiration from the submission instant.
    pub fn into_record(self, id: JobId, now: DateTime<Utc>) -> JobRecord {
        JobRecord {
            id,
            title: self.title,
            description: self.description,
            salary: self.salary,
            posted_on: now.date_naive(),
            expires_at: now + Duration::days(i64::from(self.duration_days)),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JobDraftError {
    #[error("Please fill in the job title, description, and salary")]
    MissingFields,
    #[error("Job duration must be at least one day")]
    InvalidDuration,
}

use super::domain::{AccountId, AccountRecord};

/// Port onto the `users` collection in the document store.
pub trait AccountDirectory: Send + Sync {
    fn upsert(&self, record: AccountRecord) -> Result<(), DirectoryError>;
    fn fetch(&self, id: &AccountId) -> Result<Option<AccountRecord>, DirectoryError>;
    fn mark_profile_completed(&self, id: &AccountId) -> Result<(), DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user record not found")]
    NotFound,
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

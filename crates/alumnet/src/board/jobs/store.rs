use super::domain::{JobId, JobRecord};
use crate::board::store::StoreError;

/// Port onto the `jobs` collection.
pub trait JobStore: Send + Sync {
    fn insert(&self, record: JobRecord) -> Result<JobRecord, StoreError>;
    fn update(&self, record: JobRecord) -> Result<(), StoreError>;
    fn fetch(&self, id: &JobId) -> Result<Option<JobRecord>, StoreError>;
    fn delete(&self, id: &JobId) -> Result<(), StoreError>;
    fn list(&self) -> Result<Vec<JobRecord>, StoreError>;
}

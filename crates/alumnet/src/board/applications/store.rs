use super::domain::{ApplicationId, ApplicationRecord};
use crate::board::accounts::AccountId;
use crate::board::store::StoreError;

/// Port onto the `jobApplications` collection.
///
/// `pending` and `for_applicant` are the two equality-filtered queries the
/// screens issue; everything else is a full-document operation.
pub trait ApplicationStore: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, StoreError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), StoreError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError>;
    fn pending(&self) -> Result<Vec<ApplicationRecord>, StoreError>;
    fn for_applicant(&self, applicant: &AccountId) -> Result<Vec<ApplicationRecord>, StoreError>;
    fn all(&self) -> Result<Vec<ApplicationRecord>, StoreError>;
}

use super::domain::ProfileRecord;
use crate::board::accounts::AccountId;
use crate::board::store::StoreError;

/// Port onto the `profiles` collection: full-document get and set, keyed
/// by the owning account.
pub trait ProfileStore: Send + Sync {
    fn set(&self, record: ProfileRecord) -> Result<(), StoreError>;
    fn fetch(&self, owner: &AccountId) -> Result<Option<ProfileRecord>, StoreError>;
}

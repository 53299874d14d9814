use std::sync::Arc;

use serde::Serialize;

use super::domain::{ProfileRecord, WizardInput, WizardStep};
use super::store::ProfileStore;
use crate::board::accounts::{AccountDirectory, AccountId, DirectoryError};
use crate::board::attachment::{image_content_type, AttachmentError};
use crate::board::nav::Route;
use crate::board::store::StoreError;

/// Service backing the profile editor and the creation wizard.
pub struct ProfileService<S, D> {
    store: Arc<S>,
    directory: Arc<D>,
}

/// State returned after a wizard step is applied.
#[derive(Debug, Clone, Serialize)]
pub struct WizardProgress {
    pub step: WizardStep,
    pub profile: ProfileRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Route>,
}

impl<S, D> ProfileService<S, D>
where
    S: ProfileStore + 'static,
    D: AccountDirectory + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self { store, directory }
    }

    /// Fetch the owner's profile; a missing document degrades to the
    /// default (empty) form with the owner stamped in.
    pub fn load(&self, owner: &AccountId) -> Result<ProfileRecord, ProfileServiceError> {
        let profile = self.store.fetch(owner)?.unwrap_or_else(|| ProfileRecord {
            owner: owner.clone(),
            ..ProfileRecord::default()
        });
        Ok(profile)
    }

    /// Full-document save. The owner id always comes from the session,
    /// never from the submitted body, and a successful save flips the
    /// account's profile-completion flag (read back at login).
    pub fn save(
        &self,
        owner: &AccountId,
        mut record: ProfileRecord,
    ) -> Result<ProfileRecord, ProfileServiceError> {
        if let Some(picture) = &record.picture {
            image_content_type(&picture.content_type)?;
        }
        record.owner = owner.clone();
        self.store.set(record.clone())?;

        // A missing users document just means login keeps routing through
        // the wizard; it does not fail the save.
        match self.directory.mark_profile_completed(owner) {
            Ok(()) | Err(DirectoryError::NotFound) => Ok(record),
            Err(other) => Err(other.into()),
        }
    }

    /// Merge one wizard step into the held profile.
    ///
    /// Field-bearing steps persist the draft so the wizard can resume;
    /// the Workspace & Skills step is the wizard's submit and performs the
    /// completing save; Done only reports the dashboard navigation.
    pub fn apply_step(
        &self,
        owner: &AccountId,
        input: WizardInput,
    ) -> Result<WizardProgress, ProfileServiceError> {
        let step = input.step();
        let mut profile = self.load(owner)?;
        input.merge_into(&mut profile);

        match step {
            WizardStep::VerifyEmail | WizardStep::Done => {}
            WizardStep::WorkAndSkills => {
                profile = self.save(owner, profile)?;
            }
            _ => {
                if let Some(picture) = &profile.picture {
                    image_content_type(&picture.content_type)?;
                }
                profile.owner = owner.clone();
                self.store.set(profile.clone())?;
            }
        }

        let next = matches!(step, WizardStep::Done).then_some(Route::Dashboard);
        Ok(WizardProgress {
            step,
            profile,
            next,
        })
    }
}

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::board::accounts::{AccountRecord, Role};
    use crate::board::profiles::domain::PictureRef;

    #[derive(Default)]
    struct MemoryProfiles {
        records: Mutex<HashMap<AccountId, ProfileRecord>>,
    }

    impl ProfileStore for MemoryProfiles {
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
    struct MemoryDirectory {
        records: Mutex<HashMap<AccountId, AccountRecord>>,
    }

    impl MemoryDirectory {
        fn seed(&self, owner: &AccountId) {
            self.records.lock().expect("directory mutex poisoned").insert(
                owner.clone(),
                AccountRecord {
                    id: owner.clone(),
                    email: "grad@alumni.example".to_string(),
                    role: Role::Alumni,
                    profile_completed: false,
                },
            );
        }

        fn completed(&self, owner: &AccountId) -> Option<bool> {
            let guard = self.records.lock().expect("directory mutex poisoned");
            guard.get(owner).map(|record| record.profile_completed)
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

    fn build_service() -> (
        ProfileService<MemoryProfiles, MemoryDirectory>,
        Arc<MemoryDirectory>,
        AccountId,
    ) {
        let store = Arc::new(MemoryProfiles::default());
        let directory = Arc::new(MemoryDirectory::default());
        let owner = AccountId("acct-0001".to_string());
        directory.seed(&owner);
        let service = ProfileService::new(store, directory.clone());
        (service, directory, owner)
    }

    fn sample_profile(owner: &AccountId) -> ProfileRecord {
        ProfileRecord {
            owner: owner.clone(),
            name: "Dana Reyes".to_string(),
            birth_date: "04/11/1994".to_string(),
            email: "grad@alumni.example".to_string(),
            city: "Lisbon".to_string(),
            country: "Portugal".to_string(),
            degree: "MSc Software Engineering".to_string(),
            school: "IST".to_string(),
            occupation: "Backend Engineer".to_string(),
            skills: "Rust, SQL".to_string(),
            picture: None,
        }
    }

    #[test]
    fn load_defaults_to_an_empty_form() {
        let (service, _directory, owner) = build_service();
        let profile = service.load(&owner).expect("load succeeds");
        assert_eq!(profile.owner, owner);
        assert!(profile.name.is_empty());
    }

    #[test]
    fn save_then_load_round_trips_every_field() {
        let (service, _directory, owner) = build_service();
        let saved = service
            .save(&owner, sample_profile(&owner))
            .expect("save succeeds");
        let loaded = service.load(&owner).expect("load succeeds");
        assert_eq!(saved, loaded);
    }

    #[test]
    fn save_stamps_the_session_owner_and_marks_completion() {
        let (service, directory, owner) = build_service();
        let mut record = sample_profile(&owner);
        record.owner = AccountId("someone-else".to_string());

        let saved = service.save(&owner, record).expect("save succeeds");
        assert_eq!(saved.owner, owner);
        assert_eq!(directory.completed(&owner), Some(true));
    }

    #[test]
    fn save_tolerates_a_missing_users_document() {
        let (service, directory, owner) = build_service();
        let stranger = AccountId("acct-9999".to_string());
        service
            .save(&stranger, sample_profile(&stranger))
            .expect("save still succeeds");
        assert_eq!(directory.completed(&stranger), None);
    }

    #[test]
    fn save_rejects_non_image_pictures() {
        let (service, _directory, owner) = build_service();
        let mut record = sample_profile(&owner);
        record.picture = Some(PictureRef {
            url: "https://cdn.example/cv.pdf".to_string(),
            content_type: "application/pdf".to_string(),
        });
        match service.save(&owner, record) {
            Err(ProfileServiceError::Attachment(_)) => {}
            other => panic!("expected attachment error, got {other:?}"),
        }
    }

    #[test]
    fn wizard_steps_accumulate_into_the_stored_profile() {
        let (service, directory, owner) = build_service();

        service
            .apply_step(
                &owner,
                WizardInput::Personal {
                    name: "Dana Reyes".to_string(),
                    birth_date: "04/11/1994".to_string(),
                    email: "grad@alumni.example".to_string(),
                },
            )
            .expect("personal step applies");
        service
            .apply_step(
                &owner,
                WizardInput::Location {
                    city: "Lisbon".to_string(),
                    country: "Portugal".to_string(),
                },
            )
            .expect("location step applies");
        assert_eq!(directory.completed(&owner), Some(false), "draft saves do not complete");

        let progress = service
            .apply_step(
                &owner,
                WizardInput::WorkAndSkills {
                    occupation: "Backend Engineer".to_string(),
                    skills: "Rust, SQL".to_string(),
                },
            )
            .expect("final field step applies");
        assert_eq!(progress.profile.city, "Lisbon");
        assert_eq!(directory.completed(&owner), Some(true));

        let done = service
            .apply_step(&owner, WizardInput::Done)
            .expect("done step applies");
        assert_eq!(done.next, Some(Route::Dashboard));
    }
}

use serde::{Deserialize, Serialize};

use crate::board::accounts::AccountId;
use crate::board::attachment::{image_content_type, AttachmentError};

/// Document stored in the `profiles` collection, keyed by the owner account.
///
/// Every field is free text exactly as the client collects it; a missing
/// document renders as the default (empty) form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub owner: AccountId,
    pub name: String,
    pub birth_date: String,
    pub email: String,
    pub city: String,
    pub country: String,
    pub degree: String,
    pub school: String,
    pub occupation: String,
    pub skills: String,
    pub picture: Option<PictureRef>,
}

/// Reference to an externally hosted profile picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureRef {
    pub url: String,
    pub content_type: String,
}

impl PictureRef {
    pub fn new(url: impl Into<String>, content_type: impl Into<String>) -> Result<Self, AttachmentError> {
        let content_type = content_type.into();
        image_content_type(&content_type)?;
        Ok(Self {
            url: url.into(),
            content_type,
        })
    }
}

/// The ordered steps of the profile-creation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Personal,
    Location,
    Education,
    Picture,
    VerifyEmail,
    WorkAndSkills,
    Done,
}

impl WizardStep {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Personal,
            Self::Location,
            Self::Education,
            Self::Picture,
            Self::VerifyEmail,
            Self::WorkAndSkills,
            Self::Done,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::Location => "Location",
            Self::Education => "Education",
            Self::Picture => "Profile Picture",
            Self::VerifyEmail => "Verify Email",
            Self::WorkAndSkills => "Workspace & Skills",
            Self::Done => "Profile Completed",
        }
    }

    /// 1-based position shown in the wizard's title bar.
    pub fn number(self) -> u8 {
        Self::ordered()
            .iter()
            .position(|step| *step == self)
            .map(|index| index as u8 + 1)
            .unwrap_or(0)
    }
}

/// Fields carried by a single wizard step.
///
/// Each variant merges only its own fields into the held profile; the
/// verification and completion steps carry none.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum WizardInput {
    Personal {
        name: String,
        birth_date: String,
        email: String,
    },
    Location {
        city: String,
        country: String,
    },
    Education {
        degree: String,
        school: String,
    },
    Picture {
        picture: Option<PictureRef>,
    },
    VerifyEmail,
    WorkAndSkills {
        occupation: String,
        skills: String,
    },
    Done,
}

impl WizardInput {
    pub fn step(&self) -> WizardStep {
        match self {
            WizardInput::Personal { .. } => WizardStep::Personal,
            WizardInput::Location { .. } => WizardStep::Location,
            WizardInput::Education { .. } => WizardStep::Education,
            WizardInput::Picture { .. } => WizardStep::Picture,
            WizardInput::VerifyEmail => WizardStep::VerifyEmail,
            WizardInput::WorkAndSkills { .. } => WizardStep::WorkAndSkills,
            WizardInput::Done => WizardStep::Done,
        }
    }

    pub fn merge_into(&self, profile: &mut ProfileRecord) {
        match self {
            WizardInput::Personal {
                name,
                birth_date,
                email,
            } => {
                profile.name = name.clone();
                profile.birth_date = birth_date.clone();
                profile.email = email.clone();
            }
            WizardInput::Location { city, country } => {
                profile.city = city.clone();
                profile.country = country.clone();
            }
            WizardInput::Education { degree, school } => {
                profile.degree = degree.clone();
                profile.school = school.clone();
            }
            WizardInput::Picture { picture } => {
                // Skipping the step leaves any previous picture in place.
                if picture.is_some() {
                    profile.picture = picture.clone();
                }
            }
            WizardInput::WorkAndSkills { occupation, skills } => {
                profile.occupation = occupation.clone();
                profile.skills = skills.clone();
            }
            WizardInput::VerifyEmail | WizardInput::Done => {}
        }
    }
}

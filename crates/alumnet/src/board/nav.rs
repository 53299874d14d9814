use serde::{Serialize, Serializer};

use super::accounts::AccountId;
use super::applications::ApplicationId;
use super::jobs::JobId;

/// Named destinations the client can be sent to after an operation.
///
/// Mutation responses carry the route the original navigation graph would
/// jump to on success (login lands on the dashboard or the profile wizard,
/// registration returns to login, and so on). Parameterized routes embed
/// the identifier of the record they display. The back-stack itself is
/// client state and is not modeled here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    Dashboard,
    ProfileCreation,
    Profile,
    Jobs,
    JobDetails(JobId),
    JobPosting,
    JobApplication(JobId),
    ViewApplications,
    ApplicationDetails(ApplicationId),
    MyApplication(AccountId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "login".to_string(),
            Route::Register => "register".to_string(),
            Route::ForgotPassword => "forgot_password".to_string(),
            Route::Dashboard => "dashboard".to_string(),
            Route::ProfileCreation => "profile_creation".to_string(),
            Route::Profile => "profile".to_string(),
            Route::Jobs => "jobs".to_string(),
            Route::JobDetails(job_id) => format!("jobs/{}", job_id.0),
            Route::JobPosting => "job_posting".to_string(),
            Route::JobApplication(job_id) => format!("jobs/{}/apply", job_id.0),
            Route::ViewApplications => "applications".to_string(),
            Route::ApplicationDetails(id) => format!("applications/{}", id.0),
            Route::MyApplication(account_id) => format!("my_application/{}", account_id.0),
        }
    }

    /// Inverse of [`Route::path`]. Unknown paths return `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["forgot_password"] => Some(Route::ForgotPassword),
            ["dashboard"] => Some(Route::Dashboard),
            ["profile_creation"] => Some(Route::ProfileCreation),
            ["profile"] => Some(Route::Profile),
            ["jobs"] => Some(Route::Jobs),
            ["job_posting"] => Some(Route::JobPosting),
            ["applications"] => Some(Route::ViewApplications),
            ["jobs", id] => Some(Route::JobDetails(JobId(id.to_string()))),
            ["jobs", id, "apply"] => Some(Route::JobApplication(JobId(id.to_string()))),
            ["applications", id] => {
                Some(Route::ApplicationDetails(ApplicationId(id.to_string())))
            }
            ["my_application", id] => Some(Route::MyApplication(AccountId(id.to_string()))),
            _ => None,
        }
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

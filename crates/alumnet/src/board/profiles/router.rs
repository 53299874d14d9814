use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{ProfileRecord, WizardInput};
use super::service::{ProfileService, ProfileServiceError};
use super::store::ProfileStore;
use crate::board::accounts::router::{bearer_token, unauthorized};
use crate::board::accounts::{AccountDirectory, AccountService, IdentityProvider};

/// State shared by the profile endpoints: session resolution plus the
/// profile service itself.
pub struct ProfileRoutes<P, D, S> {
    pub accounts: Arc<AccountService<P, D>>,
    pub profiles: Arc<ProfileService<S, D>>,
}

impl<P, D, S> Clone for ProfileRoutes<P, D, S> {
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

pub fn profile_router<P, D, S>(routes: ProfileRoutes<P, D, S>) -> Router
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ProfileStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/profile",
            get(load_handler::<P, D, S>).put(save_handler::<P, D, S>),
        )
        .route("/api/v1/profile/wizard", post(wizard_handler::<P, D, S>))
        .with_state(routes)
}

pub(crate) async fn load_handler<P, D, S>(
    State(routes): State<ProfileRoutes<P, D, S>>,
    headers: HeaderMap,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ProfileStore + 'static,
{
    // An unauthenticated or stale session renders the empty form rather
    // than a hard failure, matching the client's degraded display.
    let owner = bearer_token(&headers)
        .and_then(|token| routes.accounts.current(&token).ok())
        .map(|(session, _)| session.account_id);

    let Some(owner) = owner else {
        return (StatusCode::OK, axum::Json(ProfileRecord::default())).into_response();
    };

    match routes.profiles.load(&owner) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn save_handler<P, D, S>(
    State(routes): State<ProfileRoutes<P, D, S>>,
    headers: HeaderMap,
    axum::Json(record): axum::Json<ProfileRecord>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ProfileStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    let Ok((session, _account)) = routes.accounts.current(&token) else {
        return unauthorized();
    };

    match routes.profiles.save(&session.account_id, record) {
        Ok(saved) => (StatusCode::OK, axum::Json(saved)).into_response(),
        Err(ProfileServiceError::Attachment(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn wizard_handler<P, D, S>(
    State(routes): State<ProfileRoutes<P, D, S>>,
    headers: HeaderMap,
    axum::Json(input): axum::Json<WizardInput>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ProfileStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };
    let Ok((session, _account)) = routes.accounts.current(&token) else {
        return unauthorized();
    };

    match routes.profiles.apply_step(&session.account_id, input) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(ProfileServiceError::Attachment(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

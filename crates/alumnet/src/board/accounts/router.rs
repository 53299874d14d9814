use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::directory::AccountDirectory;
use super::domain::{AccountId, Credentials, RegistrationForm, SessionToken};
use super::provider::{IdentityError, IdentityProvider};
use super::service::{AccountService, AccountServiceError, LoginOutcome};
use crate::board::nav::Route;

/// Router builder exposing the authentication endpoints.
pub fn account_router<P, D>(service: Arc<AccountService<P, D>>) -> Router
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<P, D>))
        .route("/api/v1/auth/login", post(login_handler::<P, D>))
        .route(
            "/api/v1/auth/forgot-password",
            post(forgot_password_handler::<P, D>),
        )
        .route("/api/v1/auth/logout", post(logout_handler::<P, D>))
        .with_state(service)
}

/// Extract the opaque session token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        return None;
    }
    Some(SessionToken(token.to_string()))
}

pub(crate) fn unauthorized() -> Response {
    let payload = json!({ "error": "User not authenticated" });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

/// Sign-in response: the session handle plus the landing route.
#[derive(Debug, Serialize)]
pub(crate) struct LoginView {
    pub(crate) token: String,
    pub(crate) account_id: AccountId,
    pub(crate) role: &'static str,
    pub(crate) next: Route,
}

impl From<LoginOutcome> for LoginView {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.session.token.0,
            account_id: outcome.account.id,
            role: outcome.account.role.label(),
            next: outcome.next,
        }
    }
}

pub(crate) async fn register_handler<P, D>(
    State(service): State<Arc<AccountService<P, D>>>,
    axum::Json(form): axum::Json<RegistrationForm>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
{
    match service.register(form) {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(AccountServiceError::Registration(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AccountServiceError::Identity(IdentityError::EmailTaken)) => {
            let payload = json!({ "error": IdentityError::EmailTaken.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn login_handler<P, D>(
    State(service): State<Arc<AccountService<P, D>>>,
    axum::Json(credentials): axum::Json<Credentials>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
{
    match service.login(credentials) {
        Ok(outcome) => (StatusCode::OK, axum::Json(LoginView::from(outcome))).into_response(),
        Err(
            error @ (AccountServiceError::EmailNotVerified
            | AccountServiceError::Identity(
                IdentityError::InvalidCredentials | IdentityError::UnknownEmail,
            )),
        ) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        Err(error @ AccountServiceError::MissingCredentials) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForgotPasswordRequest {
    pub(crate) email: String,
}

pub(crate) async fn forgot_password_handler<P, D>(
    State(service): State<Arc<AccountService<P, D>>>,
    axum::Json(request): axum::Json<ForgotPasswordRequest>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
{
    match service.forgot_password(&request.email) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(error @ AccountServiceError::MissingEmail) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AccountServiceError::Identity(IdentityError::UnknownEmail)) => {
            let payload = json!({ "error": IdentityError::UnknownEmail.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn logout_handler<P, D>(
    State(service): State<Arc<AccountService<P, D>>>,
    headers: HeaderMap,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return unauthorized();
    };

    match service.sign_out(&token) {
        Ok(()) => {
            let payload = json!({ "status": "signed_out", "next": Route::Login.path() });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

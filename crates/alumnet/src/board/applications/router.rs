use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationForm, ApplicationId, ReviewDecision};
use super::service::{ApplicationServiceError, JobApplicationService};
use super::store::ApplicationStore;
use crate::board::accounts::router::{bearer_token, unauthorized};
use crate::board::accounts::{
    AccountDirectory, AccountRecord, AccountService, AuthSession, IdentityProvider,
};
use crate::board::store::StoreError;

/// State shared by the application endpoints.
pub struct ApplicationRoutes<P, D, S> {
    pub accounts: Arc<AccountService<P, D>>,
    pub applications: Arc<JobApplicationService<S>>,
}

impl<P, D, S> Clone for ApplicationRoutes<P, D, S> {
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            applications: self.applications.clone(),
        }
    }
}

pub fn application_router<P, D, S>(routes: ApplicationRoutes<P, D, S>) -> Router
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ApplicationStore + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<P, D, S>))
        .route(
            "/api/v1/applications/pending",
            get(pending_handler::<P, D, S>),
        )
        .route("/api/v1/applications/mine", get(mine_handler::<P, D, S>))
        .route(
            "/api/v1/applications/export",
            get(export_handler::<P, D, S>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(details_handler::<P, D, S>),
        )
        .route(
            "/api/v1/applications/:application_id/decision",
            post(decision_handler::<P, D, S>),
        )
        .with_state(routes)
}

fn session_and_account<P, D>(
    accounts: &AccountService<P, D>,
    headers: &HeaderMap,
) -> Option<(AuthSession, AccountRecord)>
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
{
    let token = bearer_token(headers)?;
    accounts.current(&token).ok()
}

pub(crate) async fn submit_handler<P, D, S>(
    State(routes): State<ApplicationRoutes<P, D, S>>,
    headers: HeaderMap,
    axum::Json(form): axum::Json<ApplicationForm>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ApplicationStore + 'static,
{
    let Some((session, _account)) = session_and_account(&routes.accounts, &headers) else {
        return unauthorized();
    };

    match routes.applications.submit(&session, form) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn pending_handler<P, D, S>(
    State(routes): State<ApplicationRoutes<P, D, S>>,
    headers: HeaderMap,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ApplicationStore + 'static,
{
    let Some((_session, account)) = session_and_account(&routes.accounts, &headers) else {
        return unauthorized();
    };

    match routes.applications.pending_review(&account) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn mine_handler<P, D, S>(
    State(routes): State<ApplicationRoutes<P, D, S>>,
    headers: HeaderMap,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ApplicationStore + 'static,
{
    let Some((session, _account)) = session_and_account(&routes.accounts, &headers) else {
        return unauthorized();
    };

    match routes.applications.status_for(&session) {
        Ok(Some(record)) => (StatusCode::OK, axum::Json(record)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "No application found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn export_handler<P, D, S>(
    State(routes): State<ApplicationRoutes<P, D, S>>,
    headers: HeaderMap,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ApplicationStore + 'static,
{
    let Some((_session, account)) = session_and_account(&routes.accounts, &headers) else {
        return unauthorized();
    };

    match routes.applications.export_csv(&account) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            bytes,
        )
            .into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn details_handler<P, D, S>(
    State(routes): State<ApplicationRoutes<P, D, S>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ApplicationStore + 'static,
{
    if session_and_account(&routes.accounts, &headers).is_none() {
        return unauthorized();
    }

    match routes.applications.details(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => application_error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) decision: ReviewDecision,
}

pub(crate) async fn decision_handler<P, D, S>(
    State(routes): State<ApplicationRoutes<P, D, S>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: ApplicationStore + 'static,
{
    let Some((_session, account)) = session_and_account(&routes.accounts, &headers) else {
        return unauthorized();
    };

    let id = ApplicationId(application_id);
    match routes.applications.decide(&account, &id, request.decision) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => application_error_response(error),
    }
}

fn application_error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::Role(_) => StatusCode::FORBIDDEN,
        ApplicationServiceError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicationServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Store(StoreError::Conflict)
        | ApplicationServiceError::AlreadyDecided { .. } => StatusCode::CONFLICT,
        ApplicationServiceError::Store(StoreError::Unavailable(_))
        | ApplicationServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

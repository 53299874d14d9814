use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::domain::{JobDraft, JobId, JobRecord};
use super::service::{JobBoardError, JobBoardService, JobControls};
use super::store::JobStore;
use crate::board::accounts::router::{bearer_token, unauthorized};
use crate::board::accounts::{
    AccountDirectory, AccountRecord, AccountService, IdentityProvider, Role,
};
use crate::board::store::StoreError;

/// State shared by the job endpoints.
pub struct JobRoutes<P, D, S> {
    pub accounts: Arc<AccountService<P, D>>,
    pub jobs: Arc<JobBoardService<S>>,
}

impl<P, D, S> Clone for JobRoutes<P, D, S> {
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            jobs: self.jobs.clone(),
        }
    }
}

pub fn job_router<P, D, S>(routes: JobRoutes<P, D, S>) -> Router
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: JobStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            get(listing_handler::<P, D, S>).post(post_handler::<P, D, S>),
        )
        .route(
            "/api/v1/jobs/:job_id",
            get(details_handler::<P, D, S>).put(edit_handler::<P, D, S>),
        )
        .with_state(routes)
}

/// One card in the job listing.
#[derive(Debug, Serialize)]
pub(crate) struct JobView {
    pub(crate) id: JobId,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) salary: String,
    pub(crate) posted: String,
    pub(crate) expires_at: chrono::DateTime<Utc>,
}

impl From<JobRecord> for JobView {
    fn from(record: JobRecord) -> Self {
        Self {
            posted: record.posted_label(),
            id: record.id,
            title: record.title,
            description: record.description,
            salary: record.salary,
            expires_at: record.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JobListingView {
    pub(crate) controls: JobControls,
    pub(crate) jobs: Vec<JobView>,
}

fn actor<P, D>(
    accounts: &AccountService<P, D>,
    headers: &HeaderMap,
) -> Option<AccountRecord>
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
{
    let token = bearer_token(headers)?;
    accounts.current(&token).ok().map(|(_, account)| account)
}

pub(crate) async fn listing_handler<P, D, S>(
    State(routes): State<JobRoutes<P, D, S>>,
    headers: HeaderMap,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: JobStore + 'static,
{
    // Role lookup failures degrade to the alumni view, as the client does
    // when the role fetch errors out.
    let role = actor(&routes.accounts, &headers)
        .map(|account| account.role)
        .unwrap_or(Role::Alumni);

    match routes.jobs.active(Utc::now()) {
        Ok(listing) => {
            let view = JobListingView {
                controls: JobControls::for_role(role),
                jobs: listing.jobs.into_iter().map(JobView::from).collect(),
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn post_handler<P, D, S>(
    State(routes): State<JobRoutes<P, D, S>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<JobDraft>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: JobStore + 'static,
{
    let Some(account) = actor(&routes.accounts, &headers) else {
        return unauthorized();
    };

    match routes.jobs.post(&account, draft, Utc::now()) {
        Ok(record) => (StatusCode::CREATED, axum::Json(JobView::from(record))).into_response(),
        Err(error) => job_error_response(error),
    }
}

pub(crate) async fn details_handler<P, D, S>(
    State(routes): State<JobRoutes<P, D, S>>,
    Path(job_id): Path<String>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: JobStore + 'static,
{
    match routes.jobs.details(&JobId(job_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(JobView::from(record))).into_response(),
        Err(error) => job_error_response(error),
    }
}

pub(crate) async fn edit_handler<P, D, S>(
    State(routes): State<JobRoutes<P, D, S>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<JobDraft>,
) -> Response
where
    P: IdentityProvider + 'static,
    D: AccountDirectory + 'static,
    S: JobStore + 'static,
{
    let Some(account) = actor(&routes.accounts, &headers) else {
        return unauthorized();
    };

    match routes.jobs.edit(&account, &JobId(job_id), draft, Utc::now()) {
        Ok(record) => (StatusCode::OK, axum::Json(JobView::from(record))).into_response(),
        Err(error) => job_error_response(error),
    }
}

fn job_error_response(error: JobBoardError) -> Response {
    let status = match &error {
        JobBoardError::Role(_) => StatusCode::FORBIDDEN,
        JobBoardError::Draft(_) => StatusCode::UNPROCESSABLE_ENTITY,
        JobBoardError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        JobBoardError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        JobBoardError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

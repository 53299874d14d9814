use crate::infra::{
    AppState, InMemoryAccountDirectory, InMemoryApplicationStore, InMemoryIdentityProvider,
    InMemoryJobStore, InMemoryProfileStore,
};
use alumnet::board::accounts::{account_router, bearer_token, AccountService, Role};
use alumnet::board::applications::{application_router, ApplicationRoutes, JobApplicationService};
use alumnet::board::jobs::{job_router, JobBoardService, JobRoutes};
use alumnet::board::profiles::{profile_router, ProfileRoutes, ProfileService};
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

pub(crate) type Accounts = AccountService<InMemoryIdentityProvider, InMemoryAccountDirectory>;
pub(crate) type Profiles = ProfileService<InMemoryProfileStore, InMemoryAccountDirectory>;
pub(crate) type Jobs = JobBoardService<InMemoryJobStore>;
pub(crate) type Applications = JobApplicationService<InMemoryApplicationStore>;

pub(crate) fn build_router(
    accounts: Arc<Accounts>,
    profiles: Arc<Profiles>,
    jobs: Arc<Jobs>,
    applications: Arc<Applications>,
) -> axum::Router {
    let dashboard = axum::Router::new()
        .route("/api/v1/dashboard", axum::routing::get(dashboard_endpoint))
        .with_state(accounts.clone());

    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .merge(dashboard)
        .merge(account_router(accounts.clone()))
        .merge(profile_router(ProfileRoutes {
            accounts: accounts.clone(),
            profiles,
        }))
        .merge(job_router(JobRoutes {
            accounts: accounts.clone(),
            jobs,
        }))
        .merge(application_router(ApplicationRoutes {
            accounts,
            applications,
        }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Controls the dashboard renders for the signed-in role. Hiding a control
/// is a display courtesy; the services check the role again on every
/// mutation.
#[derive(Debug, Serialize)]
pub(crate) struct DashboardControls {
    pub(crate) can_post_jobs: bool,
    pub(crate) can_review_applications: bool,
    pub(crate) can_apply: bool,
}

impl DashboardControls {
    pub(crate) fn for_role(role: Role) -> Self {
        let admin = role.is_admin();
        Self {
            can_post_jobs: admin,
            can_review_applications: admin,
            can_apply: !admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardView {
    pub(crate) message: String,
    pub(crate) role: &'static str,
    pub(crate) profile_completed: bool,
    pub(crate) controls: DashboardControls,
}

pub(crate) async fn dashboard_endpoint(
    State(accounts): State<Arc<Accounts>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let session = bearer_token(&headers).and_then(|token| accounts.current(&token).ok());
    let Some((session, account)) = session else {
        let payload = json!({ "error": "User not authenticated" });
        return (StatusCode::UNAUTHORIZED, Json(payload)).into_response();
    };

    let view = DashboardView {
        message: format!("Welcome back, {}", session.email),
        role: account.role.label(),
        profile_completed: account.profile_completed,
        controls: DashboardControls::for_role(account.role),
    };
    (StatusCode::OK, Json(view)).into_response()
}

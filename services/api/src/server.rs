use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAccountDirectory, InMemoryApplicationStore, InMemoryIdentityProvider,
    InMemoryJobStore, InMemoryProfileStore,
};
use crate::routes::build_router;
use alumnet::board::accounts::{
    AccountDirectory, AccountRecord, AccountService, Role,
};
use alumnet::board::applications::JobApplicationService;
use alumnet::board::jobs::JobBoardService;
use alumnet::board::profiles::ProfileService;
use alumnet::config::AppConfig;
use alumnet::error::AppError;
use alumnet::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let provider = Arc::new(InMemoryIdentityProvider::default());
    let directory = Arc::new(InMemoryAccountDirectory::default());

    if let Some(seed) = &config.admin_seed {
        match provider.register_verified(&seed.email, &seed.password) {
            Ok(account_id) => {
                let record = AccountRecord {
                    id: account_id,
                    email: seed.email.clone(),
                    role: Role::Admin,
                    profile_completed: true,
                };
                match directory.upsert(record) {
                    Ok(()) => info!(email = %seed.email, "seeded admin account"),
                    Err(err) => warn!(%err, "admin seed directory write failed"),
                }
            }
            Err(err) => warn!(%err, "admin seed skipped"),
        }
    }

    let accounts = Arc::new(AccountService::new(provider, directory.clone()));
    let profiles = Arc::new(ProfileService::new(
        Arc::new(InMemoryProfileStore::default()),
        directory,
    ));
    let jobs = Arc::new(JobBoardService::new(Arc::new(InMemoryJobStore::default())));
    let applications = Arc::new(JobApplicationService::new(Arc::new(
        InMemoryApplicationStore::default(),
    )));

    let app = build_router(accounts, profiles, jobs, applications)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "alumni job board ready");

    axum::serve(listener, app).await?;
    Ok(())
}

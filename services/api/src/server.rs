use crate::cli::ServeArgs;
use crate::infra::{AppState, Stores};
use crate::routes::with_management_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use meals_admin::config::AppConfig;
use meals_admin::error::AppError;
use meals_admin::management::customers::run_seed;
use meals_admin::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let stores = Stores::in_memory();
    if let Some(mode) = args.seed {
        let summary = run_seed(stores.customers.as_ref(), mode, config.seed.customer_count)?;
        info!(%mode, created = summary.created, "seeded in-memory customers");
    }

    let app = with_management_routes(&stores)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "meal delivery staff service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use crate::cli::ServeArgs;
use crate::infra::{load_dataset, AppState};
use crate::routes::dashboard_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use hr_analytics::config::AppConfig;
use hr_analytics::error::AppError;
use hr_analytics::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    if let Some(path) = args.dataset.take() {
        config.dataset.path = path;
    }

    telemetry::init(&config.telemetry)?;

    let dataset = load_dataset(&config.dataset.path, Local::now().date_naive())?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        dataset: Arc::new(dataset),
    };

    let app = dashboard_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hr analytics dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}

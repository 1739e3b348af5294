use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use refund_router::config::{documents, AppConfig, AppEnvironment};
use refund_router::{testdata, QuotaTracker, Router};

use crate::cli::ServeArgs;
use crate::error::ApiError;
use crate::infra::AppState;
use crate::routes::api_router;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), ApiError> {
    let mut config = AppConfig::from_env()?;

    if let Some(host) = args.host.take() {
        config.host = host;
    }
    if let Some(port) = args.port.take() {
        config.port = port;
    }

    init_tracing(&config)?;

    let transactions_path = config.transactions_path();
    if !transactions_path.exists() {
        info!(path = %transactions_path.display(), "generating synthetic transaction data");
        testdata::generate_and_save(&transactions_path, 200, Utc::now())?;
    }

    let docs = documents::load_with_transactions(
        config.processors_path(),
        config.rules_path(),
        &transactions_path,
    )?;
    info!(
        processors = docs.processors.len(),
        rules = docs.rules.len(),
        transactions = docs.transactions.len(),
        "configuration loaded"
    );

    let quota = Arc::new(QuotaTracker::new(&docs.processors, Utc::now()));
    let router = Arc::new(
        Router::new(docs.processors, docs.rules).with_quota_tracker(quota.clone()),
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let state = AppState::new(router, quota, Some(Arc::new(prometheus_handle)));
    let readiness = state.readiness.clone();

    let app = api_router(state).layer(prometheus_layer);

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "refund router ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over `APP_LOG_LEVEL`;
/// development gets the human-oriented pretty formatter, everything else
/// writes plain compact lines for log shippers.
fn init_tracing(config: &AppConfig) -> Result<(), ApiError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|_| {
            ApiError::Telemetry(format!(
                "invalid APP_LOG_LEVEL filter '{}'",
                config.log_filter
            ))
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match config.environment {
        AppEnvironment::Development => builder.pretty().try_init(),
        _ => builder.with_ansi(false).compact().try_init(),
    };
    installed.map_err(|err| ApiError::Telemetry(format!("failed to install subscriber: {err}")))
}

use std::collections::HashMap;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use refund_router::domain::{
    BatchAnalysis, HistoricalReport, ProcessorOverride, QuotaStatus, RefundRouteResult,
    Transaction,
};
use refund_router::{historical, MAX_BATCH_SIZE};

use crate::error::ApiError;
use crate::infra::{validate_transaction, AppState};

#[derive(Debug, Deserialize)]
pub(crate) struct SingleRefundRequest {
    pub(crate) transaction: Transaction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchRefundRequest {
    pub(crate) transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoricalRequest {
    pub(crate) transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulationRequest {
    pub(crate) processor_overrides: HashMap<String, ProcessorOverride>,
}

pub(crate) fn api_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/refunds/route", axum::routing::post(route_endpoint))
        .route("/api/v1/refunds/batch", axum::routing::post(batch_endpoint))
        .route(
            "/api/v1/refunds/historical",
            axum::routing::post(historical_endpoint),
        )
        .route(
            "/api/v1/quota/status",
            axum::routing::get(quota_status_endpoint),
        )
        .route(
            "/api/v1/quota/simulate",
            axum::routing::post(quota_simulate_endpoint)
                .delete(quota_reset_endpoint),
        )
        .layer(Extension(state))
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
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub(crate) async fn route_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<SingleRefundRequest>,
) -> Result<Json<RefundRouteResult>, ApiError> {
    validate_transaction(&payload.transaction, None)?;
    let result = state.router.select_route(&payload.transaction, Utc::now());
    Ok(Json(result))
}

pub(crate) async fn batch_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<BatchRefundRequest>,
) -> Result<Json<BatchAnalysis>, ApiError> {
    if payload.transactions.is_empty() {
        return Err(ApiError::InvalidRequest(
            "at least 1 transaction is required".to_string(),
        ));
    }
    if payload.transactions.len() > MAX_BATCH_SIZE {
        return Err(ApiError::InvalidRequest(format!(
            "maximum {MAX_BATCH_SIZE} transactions per batch"
        )));
    }
    for (index, tx) in payload.transactions.iter().enumerate() {
        validate_transaction(tx, Some(index))?;
    }

    let analysis = state.router.analyze_batch(&payload.transactions, Utc::now());
    Ok(Json(analysis))
}

pub(crate) async fn historical_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<HistoricalRequest>,
) -> Result<Json<HistoricalReport>, ApiError> {
    if payload.transactions.is_empty() {
        return Err(ApiError::InvalidRequest(
            "at least 1 transaction is required".to_string(),
        ));
    }
    for (index, tx) in payload.transactions.iter().enumerate() {
        validate_transaction(tx, Some(index))?;
    }

    let report = historical::analyze(&payload.transactions, &state.router, Utc::now());
    Ok(Json(report))
}

pub(crate) async fn quota_status_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<Vec<QuotaStatus>> {
    Json(state.quota.status(Utc::now()))
}

pub(crate) async fn quota_simulate_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<SimulationRequest>,
) -> Json<Vec<QuotaStatus>> {
    state.quota.set_overrides(payload.processor_overrides);
    Json(state.quota.status(Utc::now()))
}

pub(crate) async fn quota_reset_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<Vec<QuotaStatus>> {
    state.quota.reset_overrides();
    Json(state.quota.status(Utc::now()))
}

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use refund_router::domain::Transaction;
use refund_router::{QuotaTracker, Router};

use crate::error::ApiError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) router: Arc<Router>,
    pub(crate) quota: Arc<QuotaTracker>,
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    pub(crate) fn new(
        router: Arc<Router>,
        quota: Arc<QuotaTracker>,
        metrics: Option<Arc<PrometheusHandle>>,
    ) -> Self {
        Self {
            router,
            quota,
            readiness: Arc::new(AtomicBool::new(false)),
            metrics,
        }
    }
}

/// Reject transactions the engine would otherwise route on garbage. Enum
/// fields and timestamps are already shape-checked by the JSON extractor;
/// this covers the constraints the type system cannot.
pub(crate) fn validate_transaction(tx: &Transaction, index: Option<usize>) -> Result<(), ApiError> {
    let fail = |field: &str, message: &str| match index {
        Some(i) => Err(ApiError::InvalidTransaction(format!(
            "transactions[{i}].{field} {message}"
        ))),
        None => Err(ApiError::InvalidRequest(format!(
            "transaction.{field} {message}"
        ))),
    };

    if tx.id.is_empty() {
        return fail("id", "is required");
    }
    if tx.amount <= 0.0 {
        return fail("amount", "must be positive");
    }
    Ok(())
}

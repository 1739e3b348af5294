//! Refund routing decision engine for the Vela marketplace.
//!
//! Given an original payment, the engine decides which refund path (free
//! reversal, same-method refund, bank transfer, or account credit) executed
//! through which processor minimizes cost while honoring network
//! compatibility rules and time windows, and explains the decision.
//!
//! The engine never fails a routing request: ineligibility, missing fees, and
//! unknown processors all degrade to an explained account-credit result.

pub mod config;
pub mod cost;
pub mod domain;
pub mod historical;
pub mod quota;
pub mod router;
pub mod rules;
pub mod testdata;

pub use domain::{
    AllowedRefund, BatchAnalysis, CompatibilityRule, ComplexRuleNote, CostCorridor, Country,
    Currency, HistoricalReport, LimitedOptionFlag, MethodSummary, PaymentMethod, Processor,
    ProcessorCostRank, ProcessorOverride, ProcessorSummary, QuotaStatus, RefundCandidate,
    RefundFee, RefundMethod, RefundRouteResult, TimeSensitiveFlag, Transaction,
};
pub use quota::QuotaTracker;
pub use router::{Router, MAX_BATCH_SIZE};
pub use rules::RuleIndex;

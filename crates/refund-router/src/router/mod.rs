//! Candidate generation, ranking, and explanation for a single refund.

mod batch;

pub use batch::MAX_BATCH_SIZE;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cost;
use crate::domain::{
    CompatibilityRule, Processor, RefundCandidate, RefundFee, RefundMethod, RefundRouteResult,
    Transaction,
};
use crate::quota::QuotaTracker;
use crate::rules::{find_eligible_paths, EligiblePath, RuleIndex};

/// Synthetic processor id/name used for marketplace balance credits.
const ACCOUNT_CREDIT_PROCESSOR_ID: &str = "internal";
const ACCOUNT_CREDIT_PROCESSOR_NAME: &str = "Account Credit";

/// The refund routing engine. Owns the processor list and the rule index,
/// both read-only after construction, plus an optional quota tracker that
/// gates processor eligibility.
pub struct Router {
    processors: Vec<Processor>,
    rule_index: RuleIndex,
    quota: Option<Arc<QuotaTracker>>,
}

impl Router {
    pub fn new(processors: Vec<Processor>, rules: Vec<CompatibilityRule>) -> Self {
        Self {
            processors,
            rule_index: RuleIndex::new(rules),
            quota: None,
        }
    }

    /// Gate candidate generation on daily quota availability. Routing never
    /// consumes quota; executing hosts call [`QuotaTracker::consume`] after
    /// the refund goes out.
    pub fn with_quota_tracker(mut self, tracker: Arc<QuotaTracker>) -> Self {
        self.quota = Some(tracker);
        self
    }

    pub fn rule_index(&self) -> &RuleIndex {
        &self.rule_index
    }

    /// Find the optimal refund route for a transaction. Never fails: when no
    /// candidate exists the result degrades to an account credit.
    pub fn select_route(&self, tx: &Transaction, now: DateTime<Utc>) -> RefundRouteResult {
        let paths = find_eligible_paths(tx, &self.rule_index, now);

        let mut candidates = Vec::new();
        for path in &paths {
            if path.method == RefundMethod::AccountCredit {
                candidates.push(account_credit_candidate(format!(
                    "{}; funds credited to customer marketplace balance",
                    path.reason
                )));
                continue;
            }

            for proc in &self.processors {
                if !cost::supports_country_and_currency(proc, tx.country, tx.currency) {
                    continue;
                }
                if let Some(tracker) = &self.quota {
                    let (available, _) = tracker.is_available(&proc.id, now);
                    if !available {
                        continue;
                    }
                }
                let Some(fee) =
                    cost::find_matching_fee(proc, path.method, tx.payment_method, tx.currency)
                else {
                    continue;
                };

                let refund_cost = cost::calculate(tx.amount, fee);
                let days = proc.processing_days_for(path.method);

                candidates.push(RefundCandidate {
                    processor_id: proc.id.clone(),
                    processor_name: proc.name.clone(),
                    refund_method: path.method,
                    estimated_cost: refund_cost,
                    processing_days: days,
                    reasoning: build_reasoning(tx, proc, path, fee, refund_cost, days),
                });
            }
        }

        rank_candidates(&mut candidates, tx);

        if candidates.is_empty() {
            candidates.push(account_credit_candidate(
                "No eligible refund methods found; defaulting to account credit".to_string(),
            ));
        }

        let naive_cost = cost::naive_cost(tx, &self.processors);
        let mut ranked = candidates.into_iter();
        let selected = ranked.next().expect("candidate list is never empty");
        let alternatives: Vec<_> = ranked.collect();

        RefundRouteResult {
            transaction_id: tx.id.clone(),
            savings: naive_cost - selected.estimated_cost,
            selected,
            alternatives,
            naive_cost,
        }
    }
}

/// Strict total order over candidates. Account credit always ranks last: it
/// is free for the merchant but locks the customer's money on the platform.
/// Then cheapest first, fastest first, and the originating processor ahead of
/// peers for reconciliation simplicity. The sort is stable, so rule and
/// processor declaration order breaks remaining ties.
fn rank_candidates(candidates: &mut [RefundCandidate], tx: &Transaction) {
    candidates.sort_by(|a, b| {
        let a_credit = a.refund_method == RefundMethod::AccountCredit;
        let b_credit = b.refund_method == RefundMethod::AccountCredit;
        a_credit
            .cmp(&b_credit)
            .then_with(|| a.estimated_cost.total_cmp(&b.estimated_cost))
            .then_with(|| a.processing_days.cmp(&b.processing_days))
            .then_with(|| original_processor_rank(b, tx).cmp(&original_processor_rank(a, tx)))
    });
}

fn original_processor_rank(candidate: &RefundCandidate, tx: &Transaction) -> bool {
    candidate.processor_id == tx.processor_id
}

fn account_credit_candidate(reasoning: String) -> RefundCandidate {
    RefundCandidate {
        processor_id: ACCOUNT_CREDIT_PROCESSOR_ID.to_string(),
        processor_name: ACCOUNT_CREDIT_PROCESSOR_NAME.to_string(),
        refund_method: RefundMethod::AccountCredit,
        estimated_cost: 0.0,
        processing_days: 0,
        reasoning,
    }
}

fn build_reasoning(
    tx: &Transaction,
    proc: &Processor,
    path: &EligiblePath,
    fee: &RefundFee,
    refund_cost: f64,
    days: u32,
) -> String {
    let method_desc = match path.method {
        RefundMethod::Reversal => {
            return format!("Free reversal via {}; {}", proc.name, path.reason);
        }
        RefundMethod::SameMethod => {
            format!("{}-to-{}", tx.payment_method, tx.payment_method)
        }
        RefundMethod::BankTransfer => "bank transfer".to_string(),
        RefundMethod::AccountCredit => path.method.label().to_string(),
    };

    let cost_desc = if fee.base_fee > 0.0 && fee.percent_fee > 0.0 {
        format!(
            "{:.2} base + {:.1}% = {:.2} {}",
            fee.base_fee,
            fee.percent_fee * 100.0,
            refund_cost,
            tx.currency
        )
    } else if fee.percent_fee > 0.0 {
        format!(
            "{:.1}% = {:.2} {}",
            fee.percent_fee * 100.0,
            refund_cost,
            tx.currency
        )
    } else {
        format!("{refund_cost:.2} {}", tx.currency)
    };

    let time_desc = match days {
        0 => "instant".to_string(),
        1 => "1 day".to_string(),
        n => format!("{n} days"),
    };

    format!(
        "{method_desc} via {}: {cost_desc}, {time_desc} processing; {}",
        proc.name, path.reason
    )
}

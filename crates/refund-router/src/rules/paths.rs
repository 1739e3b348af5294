use chrono::{DateTime, Duration, Utc};

use super::timewindow::{days_until_expiry, hours_since, is_reversal_eligible, is_within_window};
use super::RuleIndex;
use crate::domain::{AllowedRefund, PaymentMethod, RefundMethod, TimeSensitiveFlag, Transaction};

/// A refund method that passed every eligibility check, with the reason it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligiblePath {
    pub method: RefundMethod,
    pub reason: String,
}

/// Refund methods available to this transaction right now, in rule declaration
/// order. Falls back to a single account-credit path when nothing else is open.
pub fn find_eligible_paths(
    tx: &Transaction,
    index: &RuleIndex,
    now: DateTime<Utc>,
) -> Vec<EligiblePath> {
    let allowed = index.allowed_refunds(tx.payment_method, tx.country);
    if allowed.is_empty() {
        return vec![EligiblePath {
            method: RefundMethod::AccountCredit,
            reason: "No compatibility rules found; only account credit available".to_string(),
        }];
    }

    let mut paths = Vec::new();
    for ar in allowed {
        match ar.method {
            RefundMethod::Reversal => {
                let (eligible, reason) = is_reversal_eligible(tx, now);
                if eligible {
                    paths.push(EligiblePath {
                        method: ar.method,
                        reason,
                    });
                }
            }
            _ => {
                if let Some(required) = ar.require_settled {
                    if required != tx.settled {
                        continue;
                    }
                }
                let (eligible, reason) = is_within_window(tx, ar, now);
                if eligible {
                    paths.push(EligiblePath {
                        method: ar.method,
                        reason,
                    });
                }
            }
        }
    }

    if paths.is_empty() {
        paths.push(EligiblePath {
            method: RefundMethod::AccountCredit,
            reason: "No eligible refund methods; falling back to account credit".to_string(),
        });
    }

    paths
}

/// Windows approaching expiry within `threshold_days`, for batch urgency flags.
///
/// The reversal window gets its own flag over the final six hours of the 24h
/// span; day-based windows are flagged while `days_until_expiry` sits in
/// `[0, threshold_days]`.
pub fn time_sensitive_windows(
    tx: &Transaction,
    index: &RuleIndex,
    now: DateTime<Utc>,
    threshold_days: i64,
) -> Vec<TimeSensitiveFlag> {
    let mut flags = Vec::new();

    for ar in index.allowed_refunds(tx.payment_method, tx.country) {
        if ar.method == RefundMethod::Reversal {
            let hours = hours_since(tx, now);
            if !tx.settled && (18.0..24.0).contains(&hours) {
                let hours_left = 24.0 - hours;
                flags.push(TimeSensitiveFlag {
                    transaction_id: tx.id.clone(),
                    window_type: "REVERSAL_24H".to_string(),
                    expires_at: tx.timestamp + Duration::hours(24),
                    days_remaining: 0,
                    message: format!("Free reversal window closes in {hours_left:.1} hours"),
                });
            }
            continue;
        }
        if ar.max_age_days == 0 {
            continue;
        }
        let remaining = days_until_expiry(tx, ar, now);
        if (0..=threshold_days).contains(&remaining) {
            let window_name = window_type_name(tx.payment_method, ar);
            flags.push(TimeSensitiveFlag {
                transaction_id: tx.id.clone(),
                window_type: window_name.clone(),
                expires_at: tx.timestamp + Duration::days(ar.max_age_days),
                days_remaining: remaining,
                message: format!(
                    "{window_name} refund window expires in {remaining} days. \
                     After expiry, more expensive alternatives required."
                ),
            });
        }
    }

    flags
}

fn window_type_name(method: PaymentMethod, ar: &AllowedRefund) -> String {
    format!("{}_{}_{}D", method, ar.method, ar.max_age_days)
}

//! Pure time predicates over a transaction and a caller-supplied wall clock.

use chrono::{DateTime, Utc};

use crate::domain::{AllowedRefund, Transaction};

pub(crate) fn hours_since(tx: &Transaction, now: DateTime<Utc>) -> f64 {
    (now - tx.timestamp).num_seconds() as f64 / 3600.0
}

pub(crate) fn days_since(tx: &Transaction, now: DateTime<Utc>) -> i64 {
    (hours_since(tx, now) / 24.0).floor() as i64
}

/// A reversal (void) requires the transaction to be unsettled and strictly
/// younger than 24 hours.
pub fn is_reversal_eligible(tx: &Transaction, now: DateTime<Utc>) -> (bool, String) {
    let hours = hours_since(tx, now);
    if tx.settled {
        return (
            false,
            "Transaction already settled; reversal not available".to_string(),
        );
    }
    if hours >= 24.0 {
        return (
            false,
            format!("Transaction is {hours:.0} hours old; reversal requires < 24 hours"),
        );
    }
    (
        true,
        format!("Transaction is {hours:.1} hours old and unsettled; free reversal available"),
    )
}

/// Whether a refund method's window is still open. A `max_age_days` of 0 means
/// no limit; the upper day boundary is inclusive. For reversals use
/// [`is_reversal_eligible`] instead.
pub fn is_within_window(
    tx: &Transaction,
    allowed: &AllowedRefund,
    now: DateTime<Utc>,
) -> (bool, String) {
    if allowed.max_age_days == 0 {
        return (true, "No time limit for this refund method".to_string());
    }
    let days = days_since(tx, now);
    if days > allowed.max_age_days {
        return (
            false,
            format!(
                "Transaction is {days} days old; {} window is {} days",
                allowed.method, allowed.max_age_days
            ),
        );
    }
    let remaining = allowed.max_age_days - days;
    (
        true,
        format!(
            "Within {} window ({days} of {} days used, {remaining} remaining)",
            allowed.method, allowed.max_age_days
        ),
    )
}

/// Days left before a window closes: -1 for unlimited windows, zero or
/// negative once expired.
pub fn days_until_expiry(tx: &Transaction, allowed: &AllowedRefund, now: DateTime<Utc>) -> i64 {
    if allowed.max_age_days == 0 {
        return -1;
    }
    allowed.max_age_days - days_since(tx, now)
}

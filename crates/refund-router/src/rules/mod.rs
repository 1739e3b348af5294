//! Compatibility rules: which refund methods a payment may use, and when.

mod paths;
mod timewindow;

pub use paths::{find_eligible_paths, time_sensitive_windows, EligiblePath};
pub use timewindow::{days_until_expiry, is_reversal_eligible, is_within_window};

use std::collections::HashMap;

use crate::domain::{AllowedRefund, CompatibilityRule, Country, PaymentMethod};

/// Read-only lookup of compatibility rules by `(original method, country)`.
///
/// Built once from configuration and shared freely afterwards. When the same
/// key is configured twice, the later entry wins.
#[derive(Debug, Clone)]
pub struct RuleIndex {
    index: HashMap<(PaymentMethod, Country), CompatibilityRule>,
}

impl RuleIndex {
    pub fn new(rules: impl IntoIterator<Item = CompatibilityRule>) -> Self {
        let mut index = HashMap::new();
        for rule in rules {
            index.insert((rule.original_method, rule.country), rule);
        }
        Self { index }
    }

    pub fn lookup(&self, method: PaymentMethod, country: Country) -> Option<&CompatibilityRule> {
        self.index.get(&(method, country))
    }

    /// Allowed refunds in declaration order. Empty when no rule matches;
    /// callers treat "no rule" as "only account credit applies".
    pub fn allowed_refunds(&self, method: PaymentMethod, country: Country) -> &[AllowedRefund] {
        self.lookup(method, country)
            .map(|rule| rule.allowed_refunds.as_slice())
            .unwrap_or(&[])
    }
}

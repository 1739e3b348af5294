//! Per-processor daily refund quota tracking with simulation overrides.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Processor, ProcessorOverride, QuotaStatus};

/// Thread-safe quota service. The only mutable state in the engine: a usage
/// counter and an override per processor, reset lazily when the UTC day rolls
/// over. One mutex guards everything; every public method holds it for the
/// full operation.
pub struct QuotaTracker {
    inner: Mutex<TrackerState>,
}

struct TrackerState {
    processors: HashMap<String, Processor>,
    usage: HashMap<String, u32>,
    overrides: HashMap<String, ProcessorOverride>,
    reset_date: NaiveDate,
}

impl QuotaTracker {
    pub fn new(processors: &[Processor], now: DateTime<Utc>) -> Self {
        let processors = processors
            .iter()
            .map(|p| (p.id.clone(), p.clone()))
            .collect();
        Self {
            inner: Mutex::new(TrackerState {
                processors,
                usage: HashMap::new(),
                overrides: HashMap::new(),
                reset_date: now.date_naive(),
            }),
        }
    }

    /// Whether a processor may take another refund right now. Overrides take
    /// priority over live counters; unknown processors are never available.
    pub fn is_available(&self, processor_id: &str, now: DateTime<Utc>) -> (bool, Option<String>) {
        let mut state = self.inner.lock().expect("quota mutex poisoned");
        state.roll_over(now);
        state.availability(processor_id)
    }

    /// Record one refund against the processor's daily counter. Callers are
    /// expected to have checked availability; no bound is enforced here.
    pub fn consume(&self, processor_id: &str, now: DateTime<Utc>) {
        let mut state = self.inner.lock().expect("quota mutex poisoned");
        state.roll_over(now);
        *state.usage.entry(processor_id.to_string()).or_insert(0) += 1;
    }

    /// Merge simulation overrides, replacing any prior entry per processor.
    pub fn set_overrides(&self, overrides: HashMap<String, ProcessorOverride>) {
        let mut state = self.inner.lock().expect("quota mutex poisoned");
        state.overrides.extend(overrides);
    }

    pub fn reset_overrides(&self) {
        let mut state = self.inner.lock().expect("quota mutex poisoned");
        state.overrides.clear();
    }

    /// One record per known processor, ordered by processor id.
    pub fn status(&self, now: DateTime<Utc>) -> Vec<QuotaStatus> {
        let mut state = self.inner.lock().expect("quota mutex poisoned");
        state.roll_over(now);

        let mut ids: Vec<_> = state.processors.keys().cloned().collect();
        ids.sort();

        ids.into_iter()
            .map(|id| {
                let proc = &state.processors[&id];
                let used = state.effective_used(&id);
                let (is_available, unavailable_reason) = state.availability(&id);
                QuotaStatus {
                    processor_id: id.clone(),
                    daily_quota: proc.daily_quota,
                    used_today: used,
                    remaining: proc.daily_quota.saturating_sub(used),
                    is_available,
                    unavailable_reason,
                }
            })
            .collect()
    }
}

impl TrackerState {
    fn roll_over(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        if today > self.reset_date {
            self.usage.clear();
            self.reset_date = today;
        }
    }

    /// The usage counter, unless a simulation override pins it.
    fn effective_used(&self, processor_id: &str) -> u32 {
        self.overrides
            .get(processor_id)
            .and_then(|o| o.quota_used)
            .unwrap_or_else(|| self.usage.get(processor_id).copied().unwrap_or(0))
    }

    fn availability(&self, processor_id: &str) -> (bool, Option<String>) {
        if let Some(ov) = self.overrides.get(processor_id) {
            if ov.available == Some(false) {
                return (
                    false,
                    Some("Processor marked as unavailable (simulated)".to_string()),
                );
            }
            if ov.at_capacity == Some(true) {
                return (
                    false,
                    Some("Processor marked as at capacity (simulated)".to_string()),
                );
            }
        }

        let Some(proc) = self.processors.get(processor_id) else {
            return (false, Some(format!("Unknown processor: {processor_id}")));
        };

        if proc.daily_quota > 0 {
            let used = self.effective_used(processor_id);
            if used >= proc.daily_quota {
                return (
                    false,
                    Some(format!(
                        "Daily quota exhausted: {used}/{} used",
                        proc.daily_quota
                    )),
                );
            }
        }

        (true, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Country, Currency, PaymentMethod, RefundFee, RefundMethod};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn processor(id: &str, daily_quota: u32) -> Processor {
        Processor {
            id: id.to_string(),
            name: id.to_uppercase(),
            supported_countries: vec![Country::Br],
            supported_currencies: vec![Currency::Brl],
            refund_fees: vec![RefundFee {
                method: RefundMethod::SameMethod,
                payment_methods: vec![PaymentMethod::Pix],
                currency: Some(Currency::Brl),
                base_fee: 0.5,
                percent_fee: 0.005,
                min_fee: 0.75,
                max_fee: 0.0,
            }],
            daily_quota,
            processing_days: Default::default(),
        }
    }

    #[test]
    fn zero_quota_means_unlimited() {
        let tracker = QuotaTracker::new(&[processor("paybr", 0)], fixed_now());
        for _ in 0..1_000 {
            tracker.consume("paybr", fixed_now());
        }
        let (available, reason) = tracker.is_available("paybr", fixed_now());
        assert!(available);
        assert!(reason.is_none());
    }

    #[test]
    fn quota_exhaustion_flips_availability() {
        let tracker = QuotaTracker::new(&[processor("paybr", 2)], fixed_now());
        assert!(tracker.is_available("paybr", fixed_now()).0);

        tracker.consume("paybr", fixed_now());
        assert!(tracker.is_available("paybr", fixed_now()).0);

        tracker.consume("paybr", fixed_now());
        let (available, reason) = tracker.is_available("paybr", fixed_now());
        assert!(!available);
        assert!(reason.expect("reason present").contains("Daily quota exhausted: 2/2"));
    }

    #[test]
    fn unknown_processor_is_unavailable_with_reason() {
        let tracker = QuotaTracker::new(&[], fixed_now());
        let (available, reason) = tracker.is_available("ghost", fixed_now());
        assert!(!available);
        assert_eq!(reason.as_deref(), Some("Unknown processor: ghost"));
    }

    #[test]
    fn availability_override_beats_everything() {
        let tracker = QuotaTracker::new(&[processor("paybr", 0)], fixed_now());
        tracker.set_overrides(HashMap::from([(
            "paybr".to_string(),
            ProcessorOverride {
                available: Some(false),
                at_capacity: None,
                quota_used: None,
            },
        )]));

        let (available, reason) = tracker.is_available("paybr", fixed_now());
        assert!(!available);
        assert!(reason.expect("reason present").contains("unavailable (simulated)"));
    }

    #[test]
    fn at_capacity_override_blocks_processor() {
        let tracker = QuotaTracker::new(&[processor("paybr", 100)], fixed_now());
        tracker.set_overrides(HashMap::from([(
            "paybr".to_string(),
            ProcessorOverride {
                available: None,
                at_capacity: Some(true),
                quota_used: None,
            },
        )]));

        let (available, reason) = tracker.is_available("paybr", fixed_now());
        assert!(!available);
        assert!(reason.expect("reason present").contains("at capacity (simulated)"));
    }

    #[test]
    fn quota_used_override_substitutes_the_counter() {
        let tracker = QuotaTracker::new(&[processor("paybr", 10)], fixed_now());
        tracker.set_overrides(HashMap::from([(
            "paybr".to_string(),
            ProcessorOverride {
                available: None,
                at_capacity: None,
                quota_used: Some(10),
            },
        )]));

        assert!(!tracker.is_available("paybr", fixed_now()).0);

        tracker.reset_overrides();
        assert!(tracker.is_available("paybr", fixed_now()).0);
    }

    #[test]
    fn set_overrides_merges_per_processor() {
        let tracker =
            QuotaTracker::new(&[processor("paybr", 10), processor("mexpay", 10)], fixed_now());
        tracker.set_overrides(HashMap::from([(
            "paybr".to_string(),
            ProcessorOverride {
                available: Some(false),
                ..Default::default()
            },
        )]));
        tracker.set_overrides(HashMap::from([(
            "mexpay".to_string(),
            ProcessorOverride {
                at_capacity: Some(true),
                ..Default::default()
            },
        )]));

        assert!(!tracker.is_available("paybr", fixed_now()).0);
        assert!(!tracker.is_available("mexpay", fixed_now()).0);

        // Re-setting one processor replaces its entry, leaving the other alone.
        tracker.set_overrides(HashMap::from([(
            "paybr".to_string(),
            ProcessorOverride::default(),
        )]));
        assert!(tracker.is_available("paybr", fixed_now()).0);
        assert!(!tracker.is_available("mexpay", fixed_now()).0);
    }

    #[test]
    fn usage_resets_on_utc_day_rollover() {
        let tracker = QuotaTracker::new(&[processor("paybr", 1)], fixed_now());
        tracker.consume("paybr", fixed_now());
        assert!(!tracker.is_available("paybr", fixed_now()).0);

        let tomorrow = fixed_now() + chrono::Duration::days(1);
        let (available, _) = tracker.is_available("paybr", tomorrow);
        assert!(available);

        let statuses = tracker.status(tomorrow);
        assert_eq!(statuses[0].used_today, 0);
    }

    #[test]
    fn status_reports_every_processor_sorted_by_id() {
        let tracker =
            QuotaTracker::new(&[processor("paybr", 5), processor("mexpay", 0)], fixed_now());
        tracker.consume("paybr", fixed_now());
        tracker.consume("paybr", fixed_now());

        let statuses = tracker.status(fixed_now());
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].processor_id, "mexpay");
        assert_eq!(statuses[1].processor_id, "paybr");

        let paybr = &statuses[1];
        assert_eq!(paybr.used_today, 2);
        assert_eq!(paybr.remaining, 3);
        assert!(paybr.is_available);
        assert!(paybr.unavailable_reason.is_none());
    }
}

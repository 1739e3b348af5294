//! Historical roll-up: where refund spend went and what routing would save.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cost::round2;
use crate::domain::{
    ComplexRuleNote, CostCorridor, Country, HistoricalReport, PaymentMethod, ProcessorCostRank,
    Transaction,
};
use crate::router::Router;

const TOP_CORRIDORS: usize = 5;

#[derive(Default)]
struct CostBucket {
    total_naive: f64,
    count: u32,
}

/// Replay past transactions through the selector and aggregate the outcome.
///
/// Runs sequentially: historical requests are rare and the report wants the
/// whole data set in hand for ranking anyway.
pub fn analyze(txns: &[Transaction], router: &Router, now: DateTime<Utc>) -> HistoricalReport {
    let mut report = HistoricalReport {
        total_transactions: txns.len(),
        total_actual_cost: 0.0,
        total_smart_cost: 0.0,
        total_savings: 0.0,
        annual_projection: 0.0,
        most_expensive_corridors: Vec::new(),
        highest_cost_processors: Vec::new(),
        complex_refund_rules: complex_rule_notes(),
        monthly_savings: Default::default(),
    };

    let mut corridors: HashMap<(Country, PaymentMethod), CostBucket> = HashMap::new();
    let mut processors: HashMap<String, CostBucket> = HashMap::new();

    for tx in txns {
        let route = router.select_route(tx, now);
        let savings = route.naive_cost - route.selected.estimated_cost;

        report.total_actual_cost += route.naive_cost;
        report.total_smart_cost += route.selected.estimated_cost;
        report.total_savings += savings;

        let month_key = tx.timestamp.format("%Y-%m").to_string();
        *report.monthly_savings.entry(month_key).or_insert(0.0) += savings;

        let corridor = corridors
            .entry((tx.country, tx.payment_method))
            .or_default();
        corridor.total_naive += route.naive_cost;
        corridor.count += 1;

        let processor = processors.entry(tx.processor_id.clone()).or_default();
        processor.total_naive += route.naive_cost;
        processor.count += 1;
    }

    report.total_actual_cost = round2(report.total_actual_cost);
    report.total_smart_cost = round2(report.total_smart_cost);
    report.total_savings = round2(report.total_savings);

    if let (Some(min), Some(max)) = (
        txns.iter().map(|tx| tx.timestamp).min(),
        txns.iter().map(|tx| tx.timestamp).max(),
    ) {
        let span_days = (max - min).num_seconds() as f64 / 86_400.0;
        if span_days > 0.0 {
            report.annual_projection = round2(report.total_savings / span_days * 365.0);
        }
    }

    report.most_expensive_corridors = corridors
        .into_iter()
        .map(|((country, payment_method), bucket)| CostCorridor {
            country,
            payment_method,
            avg_cost: round2(bucket.total_naive / f64::from(bucket.count)),
            total_cost: round2(bucket.total_naive),
            count: bucket.count,
        })
        .collect();
    report.most_expensive_corridors.sort_by(|a, b| {
        b.total_cost
            .total_cmp(&a.total_cost)
            .then_with(|| (a.country, a.payment_method).cmp(&(b.country, b.payment_method)))
    });
    report.most_expensive_corridors.truncate(TOP_CORRIDORS);

    report.highest_cost_processors = processors
        .into_iter()
        .map(|(processor_id, bucket)| ProcessorCostRank {
            processor_id,
            total_cost: round2(bucket.total_naive),
            avg_cost: round2(bucket.total_naive / f64::from(bucket.count)),
            count: bucket.count,
        })
        .collect();
    report.highest_cost_processors.sort_by(|a, b| {
        b.total_cost
            .total_cmp(&a.total_cost)
            .then_with(|| a.processor_id.cmp(&b.processor_id))
    });

    for value in report.monthly_savings.values_mut() {
        *value = round2(*value);
    }

    report
}

/// Rules that routinely surprise merchants, surfaced verbatim in the report.
fn complex_rule_notes() -> Vec<ComplexRuleNote> {
    vec![
        ComplexRuleNote {
            rule: "OXXO_NO_SELF_REFUND",
            description: "OXXO cash payments cannot be refunded as OXXO",
            impact: "Forces SPEI bank transfer, typically higher cost than same-method refunds",
        },
        ComplexRuleNote {
            rule: "BOLETO_NO_SELF_REFUND",
            description: "Boleto voucher payments cannot be refunded as Boleto",
            impact: "Requires PIX or bank transfer; PIX is much cheaper when within 90-day window",
        },
        ComplexRuleNote {
            rule: "EFECTY_NO_SELF_REFUND",
            description: "Efecty cash payments cannot be refunded as Efecty",
            impact: "Requires PSE or bank transfer; PSE is cheaper when within 60-day window",
        },
        ComplexRuleNote {
            rule: "PIX_90_DAY_WINDOW",
            description: "PIX-to-PIX refunds only available within 90 days of original transaction",
            impact: "After 90 days, must use bank transfer at ~3x the cost of PIX refund",
        },
        ComplexRuleNote {
            rule: "PSE_60_DAY_WINDOW",
            description: "PSE-to-PSE refunds only available within 60 days of original transaction",
            impact: "After 60 days, must use bank transfer at ~2x the cost of PSE refund",
        },
        ComplexRuleNote {
            rule: "REVERSAL_24H_WINDOW",
            description: "Free reversals (voids) only available for unsettled transactions within 24 hours",
            impact: "Catching transactions within this window saves 100% of refund fees",
        },
    ]
}

//! Batch analysis: parallel routing fan-out with single-threaded aggregation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use chrono::{DateTime, Utc};

use super::Router;
use crate::cost::round2;
use crate::domain::{
    BatchAnalysis, LimitedOptionFlag, MethodSummary, ProcessorSummary, RefundRouteResult,
    Transaction,
};
use crate::rules::time_sensitive_windows;

/// Largest batch a caller may submit in one request.
pub const MAX_BATCH_SIZE: usize = 500;

/// Windows expiring within this many days are flagged as time sensitive.
const TIME_SENSITIVE_THRESHOLD_DAYS: i64 = 15;

impl Router {
    /// Route every transaction and aggregate the outcome.
    ///
    /// Routing is pure for a fixed `now`, so it fans out over a scoped worker
    /// pool: workers claim the next transaction index from an atomic cursor
    /// and push `(index, route)` onto an mpsc channel. The calling thread is
    /// the only consumer; it places each route into a slot by index, then
    /// aggregates in input order once the pool drains. Single-threaded
    /// aggregation keeps the maps lock-free, `results[i]` always corresponds
    /// to `txns[i]`, and the output is byte-identical across runs.
    pub fn analyze_batch(&self, txns: &[Transaction], now: DateTime<Utc>) -> BatchAnalysis {
        let n = txns.len();
        let mut analysis = BatchAnalysis {
            total_transactions: n,
            total_naive_cost: 0.0,
            total_smart_cost: 0.0,
            total_savings: 0.0,
            savings_percent: 0.0,
            results: Vec::new(),
            by_processor: Default::default(),
            by_payment_method: Default::default(),
            time_sensitive: Vec::new(),
            limited_options: Vec::new(),
        };

        let workers = thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
            .min(n)
            .max(1);

        let cursor = AtomicUsize::new(0);
        let (result_tx, result_rx) = mpsc::channel::<(usize, RefundRouteResult)>();

        let mut slots: Vec<Option<RefundRouteResult>> = Vec::with_capacity(n);
        slots.resize_with(n, || None);

        thread::scope(|scope| {
            for _ in 0..workers {
                let result_tx = result_tx.clone();
                let cursor = &cursor;
                scope.spawn(move || loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    if index >= n {
                        break;
                    }
                    let route = self.select_route(&txns[index], now);
                    if result_tx.send((index, route)).is_err() {
                        break;
                    }
                });
            }
            drop(result_tx);

            for (index, route) in result_rx {
                slots[index] = Some(route);
            }
        });

        let results: Vec<RefundRouteResult> = slots
            .into_iter()
            .map(|slot| slot.expect("every transaction yields exactly one route"))
            .collect();

        for (tx, route) in txns.iter().zip(&results) {
            accumulate(&mut analysis, tx, route);
            analysis.time_sensitive.extend(time_sensitive_windows(
                tx,
                self.rule_index(),
                now,
                TIME_SENSITIVE_THRESHOLD_DAYS,
            ));
        }
        analysis.results = results;

        if analysis.total_naive_cost > 0.0 {
            analysis.savings_percent = analysis.total_savings / analysis.total_naive_cost * 100.0;
        }
        analysis.total_naive_cost = round2(analysis.total_naive_cost);
        analysis.total_smart_cost = round2(analysis.total_smart_cost);
        analysis.total_savings = round2(analysis.total_savings);
        analysis.savings_percent = round2(analysis.savings_percent);

        analysis
    }
}

fn accumulate(analysis: &mut BatchAnalysis, tx: &Transaction, route: &RefundRouteResult) {
    analysis.total_naive_cost += route.naive_cost;
    analysis.total_smart_cost += route.selected.estimated_cost;
    analysis.total_savings += route.savings;

    let by_processor = analysis
        .by_processor
        .entry(tx.processor_id.clone())
        .or_insert_with(|| ProcessorSummary {
            processor_id: tx.processor_id.clone(),
            ..Default::default()
        });
    by_processor.naive_cost += route.naive_cost;
    by_processor.smart_cost += route.selected.estimated_cost;
    by_processor.savings += route.savings;
    by_processor.transaction_count += 1;

    let method_key = tx.payment_method.label();
    let by_method = analysis
        .by_payment_method
        .entry(method_key.to_string())
        .or_insert_with(|| MethodSummary {
            method: method_key.to_string(),
            ..Default::default()
        });
    by_method.naive_cost += route.naive_cost;
    by_method.smart_cost += route.selected.estimated_cost;
    by_method.savings += route.savings;
    by_method.transaction_count += 1;

    if tx.payment_method.is_cash_voucher() {
        let available_options = 1 + route.alternatives.len();
        analysis.limited_options.push(LimitedOptionFlag {
            transaction_id: tx.id.clone(),
            original_method: tx.payment_method.label().to_string(),
            available_options,
            message: format!(
                "{method} cannot be refunded via {method}; requires alternative method. \
                 {available_options} routing option(s) available.",
                method = tx.payment_method
            ),
        });
    }
}

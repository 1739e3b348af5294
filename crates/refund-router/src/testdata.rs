//! Deterministic synthetic transaction generation for demos and load tests.
//!
//! Everything flows from a fixed seed and a caller-supplied `now`, so two
//! runs with the same inputs produce byte-identical documents.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};
use rand_pcg::Pcg64Mcg;

use crate::domain::{Country, Currency, PaymentMethod, Transaction};

const SEED: u64 = 42;

/// Generate `count` transactions: a fixed block of edge cases first (window
/// boundaries, cash vouchers, extreme amounts), then weighted synthetic
/// traffic shaped like production volume.
pub fn generate_transactions(count: usize, now: DateTime<Utc>) -> Vec<Transaction> {
    let mut txns = edge_transactions(now);

    let mut rng = Pcg64Mcg::seed_from_u64(SEED);

    let countries = [
        (Country::Br, Currency::Brl),
        (Country::Mx, Currency::Mxn),
        (Country::Co, Currency::Cop),
    ];
    let country_weights = [0.45, 0.35, 0.20];

    let edge_count = txns.len();
    let remaining = count.saturating_sub(edge_count);

    for i in 0..remaining {
        let &(country, currency) = weighted_pick(&mut rng, &countries, &country_weights);
        let payment_method = *weighted_pick(
            &mut rng,
            payment_methods_for(country),
            payment_weights_for(country),
        );
        let processor_id = *weighted_pick(
            &mut rng,
            processors_for(country),
            processor_weights_for(country),
        );

        let amount = sample_amount(&mut rng, currency);

        let age = Duration::hours(rng.gen_range(0..180 * 24));
        let timestamp = now - age;
        let settled = if age > Duration::hours(2) {
            rng.gen_bool(0.95)
        } else {
            rng.gen_bool(0.20)
        };

        txns.push(Transaction {
            id: format!("txn_{:06}", edge_count + i + 1),
            country,
            currency,
            payment_method,
            processor_id: processor_id.to_string(),
            amount,
            timestamp,
            settled,
            customer_id: format!("cust_{:05}", rng.gen_range(0..50_000)),
        });
    }

    txns
}

/// Generate and write a pretty-printed transactions document.
pub fn generate_and_save(
    path: impl AsRef<Path>,
    count: usize,
    now: DateTime<Utc>,
) -> io::Result<()> {
    let txns = generate_transactions(count, now);
    let data = serde_json::to_vec_pretty(&txns)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)
}

fn weighted_pick<'a, T>(rng: &mut Pcg64Mcg, items: &'a [T], weights: &[f64]) -> &'a T {
    let total: f64 = weights.iter().sum();
    let mut roll = rng.gen_range(0.0..total);
    for (item, &weight) in items.iter().zip(weights) {
        if roll < weight {
            return item;
        }
        roll -= weight;
    }
    &items[items.len() - 1]
}

fn payment_methods_for(country: Country) -> &'static [PaymentMethod] {
    match country {
        Country::Br => &[
            PaymentMethod::Pix,
            PaymentMethod::CreditCard,
            PaymentMethod::Boleto,
        ],
        Country::Mx => &[
            PaymentMethod::CreditCard,
            PaymentMethod::Oxxo,
            PaymentMethod::Spei,
        ],
        Country::Co => &[
            PaymentMethod::CreditCard,
            PaymentMethod::Pse,
            PaymentMethod::Efecty,
        ],
    }
}

fn payment_weights_for(country: Country) -> &'static [f64] {
    match country {
        Country::Br => &[0.50, 0.35, 0.15],
        Country::Mx => &[0.40, 0.30, 0.30],
        Country::Co => &[0.40, 0.35, 0.25],
    }
}

fn processors_for(country: Country) -> &'static [&'static str] {
    match country {
        Country::Br => &["paybr", "globalpay", "quickrefund", "valueproc"],
        Country::Mx => &["mexpay", "globalpay", "quickrefund", "valueproc"],
        Country::Co => &["colpay", "globalpay", "valueproc"],
    }
}

fn processor_weights_for(country: Country) -> &'static [f64] {
    match country {
        Country::Br => &[0.50, 0.20, 0.15, 0.15],
        Country::Mx => &[0.45, 0.20, 0.20, 0.15],
        Country::Co => &[0.50, 0.30, 0.20],
    }
}

/// Log-normal ticket sizes clamped to a sane range per currency. COP amounts
/// are whole units.
fn sample_amount(rng: &mut Pcg64Mcg, currency: Currency) -> f64 {
    let (median, min, max, whole_units): (f64, f64, f64, bool) = match currency {
        Currency::Brl => (150.0, 15.0, 5_000.0, false),
        Currency::Mxn => (500.0, 50.0, 15_000.0, false),
        Currency::Cop => (150_000.0, 10_000.0, 5_000_000.0, true),
    };

    let dist = LogNormal::new(median.ln(), 1.0).expect("valid log-normal parameters");
    let raw: f64 = dist.sample(rng).clamp(min, max);
    if whole_units {
        raw.round()
    } else {
        (raw * 100.0).round() / 100.0
    }
}

fn edge_transactions(now: DateTime<Utc>) -> Vec<Transaction> {
    let edge = |id: &str,
                country: Country,
                currency: Currency,
                method: PaymentMethod,
                processor: &str,
                amount: f64,
                age: Duration,
                settled: bool| Transaction {
        id: id.to_string(),
        country,
        currency,
        payment_method: method,
        processor_id: processor.to_string(),
        amount,
        timestamp: now - age,
        settled,
        customer_id: String::new(),
    };

    vec![
        // Inside the free reversal window.
        edge("txn_edge_001", Country::Br, Currency::Brl, PaymentMethod::Pix, "paybr", 250.0, Duration::minutes(30), false),
        edge("txn_edge_002", Country::Mx, Currency::Mxn, PaymentMethod::CreditCard, "mexpay", 1_500.0, Duration::minutes(45), false),
        edge("txn_edge_003", Country::Co, Currency::Cop, PaymentMethod::Pse, "colpay", 200_000.0, Duration::minutes(20), false),
        // Young but already settled: reversal is off the table.
        edge("txn_edge_004", Country::Mx, Currency::Mxn, PaymentMethod::CreditCard, "mexpay", 800.0, Duration::hours(12), true),
        // Same-method windows about to close.
        edge("txn_edge_005", Country::Br, Currency::Brl, PaymentMethod::Pix, "paybr", 450.0, Duration::days(86), true),
        edge("txn_edge_006", Country::Br, Currency::Brl, PaymentMethod::Pix, "globalpay", 320.0, Duration::days(88), true),
        edge("txn_edge_007", Country::Br, Currency::Brl, PaymentMethod::Pix, "quickrefund", 180.0, Duration::days(89), true),
        edge("txn_edge_008", Country::Co, Currency::Cop, PaymentMethod::Pse, "colpay", 350_000.0, Duration::days(57), true),
        edge("txn_edge_009", Country::Co, Currency::Cop, PaymentMethod::Pse, "globalpay", 180_000.0, Duration::days(59), true),
        // Cash vouchers: no self-refund lane exists.
        edge("txn_edge_010", Country::Mx, Currency::Mxn, PaymentMethod::Oxxo, "mexpay", 2_500.0, Duration::days(45), true),
        edge("txn_edge_011", Country::Mx, Currency::Mxn, PaymentMethod::Oxxo, "globalpay", 800.0, Duration::days(30), true),
        edge("txn_edge_012", Country::Mx, Currency::Mxn, PaymentMethod::Oxxo, "mexpay", 3_200.0, Duration::days(100), true),
        edge("txn_edge_013", Country::Br, Currency::Brl, PaymentMethod::Boleto, "paybr", 600.0, Duration::days(60), true),
        edge("txn_edge_014", Country::Br, Currency::Brl, PaymentMethod::Boleto, "globalpay", 150.0, Duration::days(20), true),
        edge("txn_edge_015", Country::Co, Currency::Cop, PaymentMethod::Efecty, "colpay", 450_000.0, Duration::days(40), true),
        edge("txn_edge_016", Country::Co, Currency::Cop, PaymentMethod::Efecty, "globalpay", 120_000.0, Duration::days(15), true),
        // Large tickets where max-fee caps matter.
        edge("txn_edge_017", Country::Br, Currency::Brl, PaymentMethod::CreditCard, "quickrefund", 4_800.0, Duration::days(10), true),
        edge("txn_edge_018", Country::Mx, Currency::Mxn, PaymentMethod::CreditCard, "mexpay", 14_000.0, Duration::days(5), true),
        edge("txn_edge_019", Country::Co, Currency::Cop, PaymentMethod::CreditCard, "colpay", 4_800_000.0, Duration::days(8), true),
        // Tiny tickets where min fees dominate.
        edge("txn_edge_020", Country::Br, Currency::Brl, PaymentMethod::Pix, "paybr", 15.0, Duration::days(3), true),
        edge("txn_edge_021", Country::Mx, Currency::Mxn, PaymentMethod::Spei, "mexpay", 50.0, Duration::days(2), true),
        // Near the card 180-day window.
        edge("txn_edge_022", Country::Br, Currency::Brl, PaymentMethod::CreditCard, "paybr", 500.0, Duration::days(176), true),
        edge("txn_edge_023", Country::Mx, Currency::Mxn, PaymentMethod::CreditCard, "globalpay", 2_000.0, Duration::days(179), true),
    ]
}

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;

use refund_router::config::{documents, AppConfig};
use refund_router::{testdata, Router};

use crate::error::ApiError;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// How many synthetic transactions to route
    #[arg(long, default_value_t = 200)]
    pub(crate) count: usize,
}

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// How many transactions to generate
    #[arg(long, default_value_t = 200)]
    pub(crate) count: usize,
    /// Where to write the document
    #[arg(long, default_value = "data/transactions.json")]
    pub(crate) out: PathBuf,
}

/// Generate a synthetic batch, route it, and print the optimization summary.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), ApiError> {
    let config = AppConfig::from_env()?;
    let docs = documents::load(config.processors_path(), config.rules_path())?;
    let router = Router::new(docs.processors, docs.rules);

    let now = Utc::now();
    let txns = testdata::generate_transactions(args.count, now);
    let analysis = router.analyze_batch(&txns, now);

    println!("Routed {} transactions", analysis.total_transactions);
    println!(
        "  naive cost   {:>14.2}\n  smart cost   {:>14.2}\n  savings      {:>14.2} ({:.2}%)",
        analysis.total_naive_cost,
        analysis.total_smart_cost,
        analysis.total_savings,
        analysis.savings_percent
    );

    println!("By payment method:");
    for summary in analysis.by_payment_method.values() {
        println!(
            "  {:<12} {:>4} txns  naive {:>12.2}  smart {:>12.2}  saved {:>12.2}",
            summary.method,
            summary.transaction_count,
            summary.naive_cost,
            summary.smart_cost,
            summary.savings
        );
    }

    if !analysis.time_sensitive.is_empty() {
        println!("Time-sensitive windows:");
        for flag in &analysis.time_sensitive {
            println!("  [{}] {}: {}", flag.window_type, flag.transaction_id, flag.message);
        }
    }

    if !analysis.limited_options.is_empty() {
        println!(
            "Limited-option payments: {} (cash vouchers without a self-refund lane)",
            analysis.limited_options.len()
        );
    }

    Ok(())
}

/// Write a deterministic transactions document to disk.
pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), ApiError> {
    testdata::generate_and_save(&args.out, args.count, Utc::now())?;
    println!("Wrote {} transactions to {}", args.count, args.out.display());
    Ok(())
}

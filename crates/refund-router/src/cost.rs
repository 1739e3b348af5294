//! Fee arithmetic for refund candidates and the no-router baseline.

use crate::domain::{
    Country, Currency, PaymentMethod, Processor, RefundFee, RefundMethod, Transaction,
};

/// Worst-case rate charged when no fee schedule covers a refund at all.
const FALLBACK_RATE: f64 = 0.035;

/// Round to two decimals, half away from zero. Applied at every point a
/// monetary value leaves the engine.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price a refund of `amount` under `fee`. Reversals and account credits are
/// free by definition; everything else is base + percent, clamped by the
/// min fee and then by the max fee (0 = uncapped).
pub fn calculate(amount: f64, fee: &RefundFee) -> f64 {
    if matches!(
        fee.method,
        RefundMethod::Reversal | RefundMethod::AccountCredit
    ) {
        return 0.0;
    }

    let mut cost = fee.base_fee + amount * fee.percent_fee;
    if cost < fee.min_fee {
        cost = fee.min_fee;
    }
    if fee.max_fee > 0.0 && cost > fee.max_fee {
        cost = fee.max_fee;
    }

    round2(cost)
}

/// First fee entry (declaration order) matching the refund method, the
/// currency (a fee without a currency is a wildcard), and the original
/// payment method.
pub fn find_matching_fee<'a>(
    processor: &'a Processor,
    refund_method: RefundMethod,
    original_method: PaymentMethod,
    currency: Currency,
) -> Option<&'a RefundFee> {
    processor.refund_fees.iter().find(|fee| {
        fee.method == refund_method
            && fee.currency.map_or(true, |c| c == currency)
            && fee.payment_methods.contains(&original_method)
    })
}

pub fn supports_country_and_currency(
    processor: &Processor,
    country: Country,
    currency: Currency,
) -> bool {
    processor.supported_countries.contains(&country)
        && processor.supported_currencies.contains(&currency)
}

/// What the merchant would pay without the router: refund through the
/// originating processor, same-method first, then bank transfer, then the
/// 3.5 % worst-case stand-in.
pub fn naive_cost(tx: &Transaction, processors: &[Processor]) -> f64 {
    let Some(original) = processors.iter().find(|p| p.id == tx.processor_id) else {
        return round2(tx.amount * FALLBACK_RATE);
    };

    if let Some(fee) = find_matching_fee(
        original,
        RefundMethod::SameMethod,
        tx.payment_method,
        tx.currency,
    ) {
        return calculate(tx.amount, fee);
    }

    if let Some(fee) = find_matching_fee(
        original,
        RefundMethod::BankTransfer,
        tx.payment_method,
        tx.currency,
    ) {
        return calculate(tx.amount, fee);
    }

    round2(tx.amount * FALLBACK_RATE)
}

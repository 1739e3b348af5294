//! Shared fixtures: a production-shaped processor roster and rule set.

use chrono::{DateTime, Duration, TimeZone, Utc};
use refund_router::domain::{
    AllowedRefund, CompatibilityRule, Country, Currency, PaymentMethod, Processor, RefundFee,
    RefundMethod, Transaction,
};
use refund_router::Router;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn almost_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.005
}

pub fn router() -> Router {
    Router::new(all_processors(), all_rules())
}

pub fn transaction(
    id: &str,
    country: Country,
    currency: Currency,
    method: PaymentMethod,
    processor_id: &str,
    amount: f64,
    age: Duration,
    settled: bool,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        country,
        currency,
        payment_method: method,
        processor_id: processor_id.to_string(),
        amount,
        timestamp: fixed_now() - age,
        settled,
        customer_id: String::new(),
    }
}

fn fee(
    method: RefundMethod,
    payment_methods: &[PaymentMethod],
    currency: Currency,
    base_fee: f64,
    percent_fee: f64,
    min_fee: f64,
    max_fee: f64,
) -> RefundFee {
    RefundFee {
        method,
        payment_methods: payment_methods.to_vec(),
        currency: Some(currency),
        base_fee,
        percent_fee,
        min_fee,
        max_fee,
    }
}

fn days(entries: &[(RefundMethod, u32)]) -> std::collections::BTreeMap<RefundMethod, u32> {
    entries.iter().copied().collect()
}

pub fn paybr() -> Processor {
    Processor {
        id: "paybr".to_string(),
        name: "PayBR".to_string(),
        supported_countries: vec![Country::Br],
        supported_currencies: vec![Currency::Brl],
        refund_fees: vec![
            fee(
                RefundMethod::Reversal,
                &[PaymentMethod::CreditCard, PaymentMethod::Pix],
                Currency::Brl,
                0.0,
                0.0,
                0.0,
                0.0,
            ),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::Pix],
                Currency::Brl,
                0.5,
                0.005,
                0.75,
                0.0,
            ),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::CreditCard],
                Currency::Brl,
                1.5,
                0.025,
                2.0,
                150.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[
                    PaymentMethod::Pix,
                    PaymentMethod::Boleto,
                    PaymentMethod::CreditCard,
                ],
                Currency::Brl,
                1.0,
                0.015,
                1.5,
                100.0,
            ),
        ],
        daily_quota: 1000,
        processing_days: days(&[
            (RefundMethod::Reversal, 0),
            (RefundMethod::SameMethod, 1),
            (RefundMethod::BankTransfer, 2),
        ]),
    }
}

pub fn mexpay() -> Processor {
    Processor {
        id: "mexpay".to_string(),
        name: "MexPay".to_string(),
        supported_countries: vec![Country::Mx],
        supported_currencies: vec![Currency::Mxn],
        refund_fees: vec![
            fee(
                RefundMethod::Reversal,
                &[PaymentMethod::CreditCard, PaymentMethod::Spei],
                Currency::Mxn,
                0.0,
                0.0,
                0.0,
                0.0,
            ),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::Spei],
                Currency::Mxn,
                5.0,
                0.008,
                8.0,
                0.0,
            ),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::CreditCard],
                Currency::Mxn,
                15.0,
                0.02,
                20.0,
                2500.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[
                    PaymentMethod::Spei,
                    PaymentMethod::Oxxo,
                    PaymentMethod::CreditCard,
                ],
                Currency::Mxn,
                10.0,
                0.012,
                15.0,
                1800.0,
            ),
        ],
        daily_quota: 800,
        processing_days: days(&[
            (RefundMethod::Reversal, 0),
            (RefundMethod::SameMethod, 1),
            (RefundMethod::BankTransfer, 2),
        ]),
    }
}

pub fn colpay() -> Processor {
    Processor {
        id: "colpay".to_string(),
        name: "ColPay".to_string(),
        supported_countries: vec![Country::Co],
        supported_currencies: vec![Currency::Cop],
        refund_fees: vec![
            fee(
                RefundMethod::Reversal,
                &[PaymentMethod::CreditCard, PaymentMethod::Pse],
                Currency::Cop,
                0.0,
                0.0,
                0.0,
                0.0,
            ),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::Pse],
                Currency::Cop,
                1500.0,
                0.006,
                2000.0,
                0.0,
            ),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::CreditCard],
                Currency::Cop,
                3500.0,
                0.022,
                5000.0,
                350_000.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[
                    PaymentMethod::Pse,
                    PaymentMethod::Efecty,
                    PaymentMethod::CreditCard,
                ],
                Currency::Cop,
                2500.0,
                0.018,
                4000.0,
                280_000.0,
            ),
        ],
        daily_quota: 600,
        processing_days: days(&[
            (RefundMethod::Reversal, 0),
            (RefundMethod::SameMethod, 1),
            (RefundMethod::BankTransfer, 3),
        ]),
    }
}

pub fn globalpay() -> Processor {
    Processor {
        id: "globalpay".to_string(),
        name: "GlobalPay".to_string(),
        supported_countries: vec![Country::Br, Country::Mx, Country::Co],
        supported_currencies: vec![Currency::Brl, Currency::Mxn, Currency::Cop],
        refund_fees: vec![
            fee(RefundMethod::Reversal, &[PaymentMethod::CreditCard], Currency::Brl, 0.0, 0.0, 0.0, 0.0),
            fee(RefundMethod::Reversal, &[PaymentMethod::CreditCard], Currency::Mxn, 0.0, 0.0, 0.0, 0.0),
            fee(RefundMethod::Reversal, &[PaymentMethod::CreditCard], Currency::Cop, 0.0, 0.0, 0.0, 0.0),
            fee(RefundMethod::SameMethod, &[PaymentMethod::CreditCard], Currency::Brl, 2.0, 0.02, 3.0, 200.0),
            fee(RefundMethod::SameMethod, &[PaymentMethod::CreditCard], Currency::Mxn, 20.0, 0.02, 30.0, 3500.0),
            fee(RefundMethod::SameMethod, &[PaymentMethod::CreditCard], Currency::Cop, 5000.0, 0.02, 7500.0, 500_000.0),
            fee(
                RefundMethod::BankTransfer,
                &[PaymentMethod::Pix, PaymentMethod::Boleto, PaymentMethod::CreditCard],
                Currency::Brl,
                2.0,
                0.02,
                3.0,
                200.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[PaymentMethod::Spei, PaymentMethod::Oxxo, PaymentMethod::CreditCard],
                Currency::Mxn,
                20.0,
                0.02,
                30.0,
                3500.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[PaymentMethod::Pse, PaymentMethod::Efecty, PaymentMethod::CreditCard],
                Currency::Cop,
                5000.0,
                0.02,
                7500.0,
                500_000.0,
            ),
        ],
        daily_quota: 2000,
        processing_days: days(&[
            (RefundMethod::Reversal, 0),
            (RefundMethod::SameMethod, 2),
            (RefundMethod::BankTransfer, 3),
        ]),
    }
}

pub fn quickrefund() -> Processor {
    Processor {
        id: "quickrefund".to_string(),
        name: "QuickRefund".to_string(),
        supported_countries: vec![Country::Br, Country::Mx],
        supported_currencies: vec![Currency::Brl, Currency::Mxn],
        refund_fees: vec![
            fee(RefundMethod::Reversal, &[PaymentMethod::CreditCard], Currency::Brl, 0.0, 0.0, 0.0, 0.0),
            fee(RefundMethod::Reversal, &[PaymentMethod::CreditCard], Currency::Mxn, 0.0, 0.0, 0.0, 0.0),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::Pix, PaymentMethod::CreditCard],
                Currency::Brl,
                3.0,
                0.03,
                4.5,
                0.0,
            ),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::Spei, PaymentMethod::CreditCard],
                Currency::Mxn,
                30.0,
                0.03,
                45.0,
                0.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[PaymentMethod::Pix, PaymentMethod::Boleto, PaymentMethod::CreditCard],
                Currency::Brl,
                2.5,
                0.025,
                4.0,
                0.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[PaymentMethod::Spei, PaymentMethod::Oxxo, PaymentMethod::CreditCard],
                Currency::Mxn,
                25.0,
                0.025,
                40.0,
                0.0,
            ),
        ],
        daily_quota: 300,
        processing_days: days(&[
            (RefundMethod::Reversal, 0),
            (RefundMethod::SameMethod, 0),
            (RefundMethod::BankTransfer, 1),
        ]),
    }
}

pub fn valueproc() -> Processor {
    Processor {
        id: "valueproc".to_string(),
        name: "ValueProc".to_string(),
        supported_countries: vec![Country::Br, Country::Mx, Country::Co],
        supported_currencies: vec![Currency::Brl, Currency::Mxn, Currency::Cop],
        refund_fees: vec![
            fee(RefundMethod::Reversal, &[PaymentMethod::CreditCard], Currency::Brl, 0.0, 0.0, 0.0, 0.0),
            fee(RefundMethod::Reversal, &[PaymentMethod::CreditCard], Currency::Mxn, 0.0, 0.0, 0.0, 0.0),
            fee(RefundMethod::Reversal, &[PaymentMethod::CreditCard], Currency::Cop, 0.0, 0.0, 0.0, 0.0),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::Pix, PaymentMethod::CreditCard],
                Currency::Brl,
                0.5,
                0.008,
                1.0,
                80.0,
            ),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::Spei, PaymentMethod::CreditCard],
                Currency::Mxn,
                5.0,
                0.008,
                10.0,
                1400.0,
            ),
            fee(
                RefundMethod::SameMethod,
                &[PaymentMethod::Pse, PaymentMethod::CreditCard],
                Currency::Cop,
                1500.0,
                0.008,
                2500.0,
                200_000.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[PaymentMethod::Pix, PaymentMethod::Boleto, PaymentMethod::CreditCard],
                Currency::Brl,
                0.75,
                0.01,
                1.5,
                100.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[PaymentMethod::Spei, PaymentMethod::Oxxo, PaymentMethod::CreditCard],
                Currency::Mxn,
                8.0,
                0.01,
                12.0,
                1800.0,
            ),
            fee(
                RefundMethod::BankTransfer,
                &[PaymentMethod::Pse, PaymentMethod::Efecty, PaymentMethod::CreditCard],
                Currency::Cop,
                2000.0,
                0.01,
                3500.0,
                250_000.0,
            ),
        ],
        daily_quota: 200,
        processing_days: days(&[
            (RefundMethod::Reversal, 0),
            (RefundMethod::SameMethod, 3),
            (RefundMethod::BankTransfer, 5),
        ]),
    }
}

pub fn all_processors() -> Vec<Processor> {
    vec![
        paybr(),
        mexpay(),
        colpay(),
        globalpay(),
        quickrefund(),
        valueproc(),
    ]
}

fn allowed(method: RefundMethod, max_age_days: i64, require_settled: Option<bool>) -> AllowedRefund {
    AllowedRefund {
        method,
        max_age_days,
        require_settled,
    }
}

pub fn all_rules() -> Vec<CompatibilityRule> {
    vec![
        CompatibilityRule {
            original_method: PaymentMethod::CreditCard,
            country: Country::Br,
            allowed_refunds: vec![
                allowed(RefundMethod::Reversal, 0, Some(false)),
                allowed(RefundMethod::SameMethod, 180, None),
                allowed(RefundMethod::BankTransfer, 0, None),
            ],
        },
        CompatibilityRule {
            original_method: PaymentMethod::Pix,
            country: Country::Br,
            allowed_refunds: vec![
                allowed(RefundMethod::Reversal, 0, Some(false)),
                allowed(RefundMethod::SameMethod, 90, None),
                allowed(RefundMethod::BankTransfer, 0, None),
            ],
        },
        CompatibilityRule {
            original_method: PaymentMethod::Boleto,
            country: Country::Br,
            allowed_refunds: vec![
                allowed(RefundMethod::BankTransfer, 0, None),
                allowed(RefundMethod::AccountCredit, 0, None),
            ],
        },
        CompatibilityRule {
            original_method: PaymentMethod::CreditCard,
            country: Country::Mx,
            allowed_refunds: vec![
                allowed(RefundMethod::Reversal, 0, Some(false)),
                allowed(RefundMethod::SameMethod, 180, None),
                allowed(RefundMethod::BankTransfer, 0, None),
            ],
        },
        CompatibilityRule {
            original_method: PaymentMethod::Oxxo,
            country: Country::Mx,
            allowed_refunds: vec![
                allowed(RefundMethod::BankTransfer, 0, None),
                allowed(RefundMethod::AccountCredit, 0, None),
            ],
        },
        CompatibilityRule {
            original_method: PaymentMethod::Spei,
            country: Country::Mx,
            allowed_refunds: vec![
                allowed(RefundMethod::Reversal, 0, Some(false)),
                allowed(RefundMethod::SameMethod, 0, None),
                allowed(RefundMethod::BankTransfer, 0, None),
            ],
        },
        CompatibilityRule {
            original_method: PaymentMethod::CreditCard,
            country: Country::Co,
            allowed_refunds: vec![
                allowed(RefundMethod::Reversal, 0, Some(false)),
                allowed(RefundMethod::SameMethod, 180, None),
                allowed(RefundMethod::BankTransfer, 0, None),
            ],
        },
        CompatibilityRule {
            original_method: PaymentMethod::Pse,
            country: Country::Co,
            allowed_refunds: vec![
                allowed(RefundMethod::Reversal, 0, Some(false)),
                allowed(RefundMethod::SameMethod, 60, None),
                allowed(RefundMethod::BankTransfer, 0, None),
            ],
        },
        CompatibilityRule {
            original_method: PaymentMethod::Efecty,
            country: Country::Co,
            allowed_refunds: vec![
                allowed(RefundMethod::BankTransfer, 0, None),
                allowed(RefundMethod::AccountCredit, 0, None),
            ],
        },
    ]
}

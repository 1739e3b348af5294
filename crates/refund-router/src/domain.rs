use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Markets the marketplace currently operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    Br,
    Mx,
    Co,
}

impl Country {
    pub const fn code(self) -> &'static str {
        match self {
            Country::Br => "BR",
            Country::Mx => "MX",
            Country::Co => "CO",
        }
    }

    /// The currency a processor is expected to quote fees in for this market.
    pub const fn canonical_currency(self) -> Currency {
        match self {
            Country::Br => Currency::Brl,
            Country::Mx => Currency::Mxn,
            Country::Co => Currency::Cop,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Settlement currencies. COP amounts are whole units; BRL and MXN carry two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Brl,
    Mxn,
    Cop,
}

impl Currency {
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Brl => "BRL",
            Currency::Mxn => "MXN",
            Currency::Cop => "COP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Instrument the customer originally paid with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Pix,
    Boleto,
    CreditCard,
    Oxxo,
    Spei,
    Pse,
    Efecty,
}

impl PaymentMethod {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Boleto => "BOLETO",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::Oxxo => "OXXO",
            PaymentMethod::Spei => "SPEI",
            PaymentMethod::Pse => "PSE",
            PaymentMethod::Efecty => "EFECTY",
        }
    }

    /// Cash-in voucher networks that cannot push money back to the payer.
    pub const fn is_cash_voucher(self) -> bool {
        matches!(
            self,
            PaymentMethod::Oxxo | PaymentMethod::Boleto | PaymentMethod::Efecty
        )
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How money gets back to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundMethod {
    /// Void of an unsettled authorization. Free, only within 24 hours.
    Reversal,
    /// Push funds back over the original network (PIX to PIX, card to card).
    SameMethod,
    /// Generic bank transfer, the universal paid fallback.
    BankTransfer,
    /// Credit to the customer's marketplace balance.
    AccountCredit,
}

impl RefundMethod {
    pub const fn label(self) -> &'static str {
        match self {
            RefundMethod::Reversal => "REVERSAL",
            RefundMethod::SameMethod => "SAME_METHOD",
            RefundMethod::BankTransfer => "BANK_TRANSFER",
            RefundMethod::AccountCredit => "ACCOUNT_CREDIT",
        }
    }
}

impl fmt::Display for RefundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An original payment, immutable once accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub country: Country,
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub processor_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    pub settled: bool,
    #[serde(default)]
    pub customer_id: String,
}

/// Configured payment processor and its refund pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Processor {
    pub id: String,
    pub name: String,
    pub supported_countries: Vec<Country>,
    pub supported_currencies: Vec<Currency>,
    pub refund_fees: Vec<RefundFee>,
    /// 0 = unlimited.
    #[serde(default)]
    pub daily_quota: u32,
    /// Refund method to processing-day SLA. Absent methods settle same day.
    #[serde(default)]
    pub processing_days: BTreeMap<RefundMethod, u32>,
}

impl Processor {
    pub fn processing_days_for(&self, method: RefundMethod) -> u32 {
        self.processing_days.get(&method).copied().unwrap_or(0)
    }
}

/// One priced refund lane on a processor. Declaration order matters: the first
/// matching entry wins fee lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundFee {
    pub method: RefundMethod,
    pub payment_methods: Vec<PaymentMethod>,
    /// None = the fee applies to any currency the processor supports.
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub base_fee: f64,
    #[serde(default)]
    pub percent_fee: f64,
    #[serde(default)]
    pub min_fee: f64,
    /// 0 = uncapped.
    #[serde(default)]
    pub max_fee: f64,
}

/// Which refund methods a payment method may use in a given market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityRule {
    pub original_method: PaymentMethod,
    pub country: Country,
    pub allowed_refunds: Vec<AllowedRefund>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedRefund {
    pub method: RefundMethod,
    /// 0 = no age limit.
    #[serde(default)]
    pub max_age_days: i64,
    /// None = settlement state unconstrained; Some(true) = must be settled;
    /// Some(false) = must be unsettled.
    #[serde(default)]
    pub require_settled: Option<bool>,
}

/// One executable refund option, priced and explained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundCandidate {
    pub processor_id: String,
    pub processor_name: String,
    pub refund_method: RefundMethod,
    pub estimated_cost: f64,
    pub processing_days: u32,
    pub reasoning: String,
}

/// Routing decision for a single transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRouteResult {
    pub transaction_id: String,
    pub selected: RefundCandidate,
    pub alternatives: Vec<RefundCandidate>,
    pub naive_cost: f64,
    /// naive_cost minus the selected cost; may be negative.
    pub savings: f64,
}

/// Aggregated outcome of a batch analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysis {
    pub total_transactions: usize,
    pub total_naive_cost: f64,
    pub total_smart_cost: f64,
    pub total_savings: f64,
    pub savings_percent: f64,
    pub results: Vec<RefundRouteResult>,
    pub by_processor: BTreeMap<String, ProcessorSummary>,
    pub by_payment_method: BTreeMap<String, MethodSummary>,
    pub time_sensitive: Vec<TimeSensitiveFlag>,
    pub limited_options: Vec<LimitedOptionFlag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorSummary {
    pub processor_id: String,
    pub naive_cost: f64,
    pub smart_cost: f64,
    pub savings: f64,
    pub transaction_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodSummary {
    pub method: String,
    pub naive_cost: f64,
    pub smart_cost: f64,
    pub savings: f64,
    pub transaction_count: u32,
}

/// A refund window that is about to close for a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSensitiveFlag {
    pub transaction_id: String,
    pub window_type: String,
    pub expires_at: DateTime<Utc>,
    pub days_remaining: i64,
    pub message: String,
}

/// Emitted for cash-voucher payments whose routing choices are structurally narrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitedOptionFlag {
    pub transaction_id: String,
    pub original_method: String,
    pub available_options: usize,
    pub message: String,
}

/// Point-in-time quota picture for one processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaStatus {
    pub processor_id: String,
    pub daily_quota: u32,
    pub used_today: u32,
    pub remaining: u32,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
}

/// Simulation knobs layered over live quota counters, per processor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_capacity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_used: Option<u32>,
}

/// Roll-up over past transactions: where refund spend went and what routing
/// would have saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalReport {
    pub total_transactions: usize,
    pub total_actual_cost: f64,
    pub total_smart_cost: f64,
    pub total_savings: f64,
    pub annual_projection: f64,
    pub most_expensive_corridors: Vec<CostCorridor>,
    pub highest_cost_processors: Vec<ProcessorCostRank>,
    pub complex_refund_rules: Vec<ComplexRuleNote>,
    pub monthly_savings: BTreeMap<String, f64>,
}

/// A (country, payment method) pair and what it cost to refund.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostCorridor {
    pub country: Country,
    pub payment_method: PaymentMethod,
    pub avg_cost: f64,
    pub total_cost: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessorCostRank {
    pub processor_id: String,
    pub total_cost: f64,
    pub avg_cost: f64,
    pub count: u32,
}

/// Curated note about a rule that routinely surprises merchants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexRuleNote {
    pub rule: &'static str,
    pub description: &'static str,
    pub impact: &'static str,
}

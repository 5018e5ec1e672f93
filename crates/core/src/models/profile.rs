use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::ResolvedNextEvent;
use super::frequency::FrequencyLabel;
use super::holding::HoldingPosition;
use super::record::PaymentRecord;

/// Per-holding dividend figures derived from the trailing 12 months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendProfile {
    pub symbol: String,

    /// Sum of per-share amounts with an ex-date in the trailing window
    pub trailing_annual_amount_per_share: f64,

    /// `trailing_annual_amount_per_share × quantity`
    pub trailing_annual_income: f64,

    /// Trailing amount / current price × 100, or 0 when the price is 0
    pub yield_percent: f64,

    pub frequency: FrequencyLabel,

    /// Most recent payment that has already been paid out
    pub last_payment: Option<PaymentRecord>,
}

impl DividendProfile {
    /// Profile for a holding with no usable history.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            trailing_annual_amount_per_share: 0.0,
            trailing_annual_income: 0.0,
            yield_percent: 0.0,
            frequency: FrequencyLabel::Unknown,
            last_payment: None,
        }
    }
}

/// Everything the pipeline knows about one holding after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingTimeline {
    pub holding: HoldingPosition,

    /// Normalized records, newest payment first
    pub records: Vec<PaymentRecord>,

    pub profile: DividendProfile,

    pub next_event: Option<ResolvedNextEvent>,
}

/// Portfolio-wide dividend rollups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDividendSummary {
    /// Date the summary was computed for
    pub as_of_date: NaiveDate,

    /// Currency of the `*_target` fields
    pub display_currency: String,

    /// Sum of all holdings' trailing annual income (source currency)
    pub total_annual_income: f64,

    /// Same figure converted to the display currency
    pub total_annual_income_target: f64,

    /// Average monthly income (annual / 12, source currency)
    pub monthly_average_income: f64,

    /// Sum of quantity × current price over all holdings
    pub total_portfolio_value: f64,

    /// Total income / total value × 100, or 0 for an empty/zero-value portfolio
    pub portfolio_yield_percent: f64,

    pub holdings_count: usize,

    /// Holdings with non-zero trailing income
    pub paying_holdings_count: usize,

    /// Earliest resolved next payment across the whole portfolio
    pub next_payment: Option<ResolvedNextEvent>,
}

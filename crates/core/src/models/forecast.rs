use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::frequency::FrequencyLabel;

/// Expected dividend income for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyForecast {
    pub year: i32,

    /// 1-based month number
    pub month: u32,

    /// Income from payments the feed has already published (source currency)
    pub confirmed: f64,

    /// Income from statistically projected payments (source currency)
    pub estimated: f64,

    pub confirmed_target: f64,
    pub estimated_target: f64,
}

impl MonthlyForecast {
    pub fn total(&self) -> f64 {
        self.confirmed + self.estimated
    }

    pub fn total_target(&self) -> f64 {
        self.confirmed_target + self.estimated_target
    }
}

/// One row of the watchlist dividend calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistDividend {
    pub symbol: String,
    pub ex_date: NaiveDate,
    pub payment_date: NaiveDate,
    pub dividend: f64,

    /// `dividend / current_price × 100`, absent without a usable price
    pub yield_percent: Option<f64>,

    pub current_price: Option<f64>,

    /// Cadence estimated from payment spacing
    pub frequency: FrequencyLabel,
}

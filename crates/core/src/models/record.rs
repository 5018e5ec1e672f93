use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One historical or projected dividend event for one symbol.
///
/// Produced by the normalizer from heterogeneous feed rows. Lists of
/// records are always kept sorted by `payment_date`, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Ticker symbol, uppercased
    pub symbol: String,

    /// First date the share trades without the dividend
    pub ex_date: NaiveDate,

    /// Date the cash is paid (`>= ex_date`)
    pub payment_date: NaiveDate,

    /// Amount per share in the source currency (non-negative)
    pub amount_per_share: f64,
}

impl PaymentRecord {
    pub fn new(
        symbol: impl Into<String>,
        ex_date: NaiveDate,
        payment_date: NaiveDate,
        amount_per_share: f64,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            ex_date,
            payment_date,
            amount_per_share,
        }
    }

    /// True once the cash has actually been paid out.
    pub fn is_realized(&self, today: NaiveDate) -> bool {
        self.payment_date <= today
    }
}

/// An entry from the upstream "confirmed upcoming dividends" calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedDividend {
    pub symbol: String,

    /// Announced payment date
    pub date: NaiveDate,

    /// Announced amount per share, if the calendar carries one
    #[serde(default)]
    pub dividend: Option<f64>,

    #[serde(default)]
    pub record_date: Option<NaiveDate>,

    #[serde(default)]
    pub declaration_date: Option<NaiveDate>,
}

/// Confirmed upcoming dividends indexed by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfirmedCalendar {
    entries: HashMap<String, Vec<ConfirmedDividend>>,
}

impl ConfirmedCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index calendar entries by uppercased symbol, each symbol's entries
    /// sorted by date ascending.
    pub fn from_entries(entries: impl IntoIterator<Item = ConfirmedDividend>) -> Self {
        let mut calendar = Self::new();
        for entry in entries {
            calendar.insert(entry);
        }
        calendar
    }

    pub fn insert(&mut self, mut entry: ConfirmedDividend) {
        entry.symbol = entry.symbol.to_uppercase();
        let list = self.entries.entry(entry.symbol.clone()).or_default();
        let idx = list.partition_point(|e| e.date <= entry.date);
        list.insert(idx, entry);
    }

    /// All entries for a symbol, oldest first.
    pub fn entries_for(&self, symbol: &str) -> &[ConfirmedDividend] {
        self.entries
            .get(&symbol.to_uppercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Earliest entry for a symbol dated strictly after `today`.
    pub fn next_for(&self, symbol: &str, today: NaiveDate) -> Option<&ConfirmedDividend> {
        self.entries_for(symbol).iter().find(|e| e.date > today)
    }

    /// Number of distinct symbols with at least one entry.
    pub fn symbol_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

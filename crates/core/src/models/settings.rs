use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

/// Engine configuration, loadable from JSON.
///
/// Every field has a default so a partial document (or `{}`) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Currency the feed reports dividends and prices in.
    pub source_currency: String,

    /// Currency calendar totals are converted into.
    pub display_currency: String,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "fmp"). Values: the API key string.
    pub api_keys: HashMap<String, String>,

    /// Field names tried, in order, when reading raw feed rows.
    pub field_aliases: FieldAliases,

    pub calendar: CalendarSettings,

    /// How many years of history to request from feeds that take a range.
    pub history_years: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_currency: "USD".to_string(),
            display_currency: "EUR".to_string(),
            api_keys: HashMap::new(),
            field_aliases: FieldAliases::default(),
            calendar: CalendarSettings::default(),
            history_years: 5,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.field_aliases.validate()?;
        if self.calendar.forecast_months == 0 {
            return Err(CoreError::ValidationError(
                "calendar.forecast_months must be at least 1".into(),
            ));
        }
        if self.history_years == 0 {
            return Err(CoreError::ValidationError(
                "history_years must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Lookup-with-fallback lists for the heterogeneous feed fields.
///
/// The first alias whose value parses wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAliases {
    pub amount: Vec<String>,
    pub ex_date: Vec<String>,
    pub payment_date: Vec<String>,
}

impl Default for FieldAliases {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            amount: owned(&["amountPerShare", "amount", "dividend", "adjDividend", "adjAmount"]),
            ex_date: owned(&["exDate", "exDividendDate", "date"]),
            payment_date: owned(&["paymentDate", "payDate"]),
        }
    }
}

impl FieldAliases {
    fn validate(&self) -> Result<(), CoreError> {
        for (name, list) in [
            ("amount", &self.amount),
            ("ex_date", &self.ex_date),
            ("payment_date", &self.payment_date),
        ] {
            if list.iter().all(|alias| alias.trim().is_empty()) {
                return Err(CoreError::ValidationError(format!(
                    "field_aliases.{name} must name at least one field"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Also place already-published payments from history on the calendar.
    pub include_payment_history: bool,

    /// Months covered by the income forecast.
    pub forecast_months: u32,

    /// Days before and after today shown in the watchlist calendar.
    pub watchlist_window_days: u32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            include_payment_history: true,
            forecast_months: 12,
            watchlist_window_days: 180,
        }
    }
}

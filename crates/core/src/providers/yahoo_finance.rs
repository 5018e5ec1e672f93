use async_trait::async_trait;
use chrono::{Months, NaiveDate, NaiveTime};
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::errors::CoreError;
use super::traits::{DataCapability, DividendProvider};

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Yahoo Finance provider for dividend history.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Data**: dividend events attached to the quote history. Yahoo only
///   knows the ex-date, so rows carry `date` and `dividend` and the
///   normalizer uses the ex-date as payment date.
/// - **No calendar**: upcoming dividends are not published here.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
    history_years: u32,
}

impl YahooFinanceProvider {
    pub fn new(history_years: u32) -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self {
            connector,
            history_years: history_years.max(1),
        })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let ts = date.and_time(NaiveTime::MIN).and_utc().timestamp();
        OffsetDateTime::from_unix_timestamp(ts).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Invalid date {date}: {e}"),
        })
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    /// Feed row in the shape the normalizer's default aliases read.
    pub fn dividend_row(timestamp: i64, amount: f64) -> Option<Value> {
        let date = Self::timestamp_to_naive_date(timestamp)?;
        Some(json!({
            "date": date.format("%Y-%m-%d").to_string(),
            "dividend": amount,
        }))
    }
}

#[async_trait]
impl DividendProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn capabilities(&self) -> Vec<DataCapability> {
        vec![DataCapability::History]
    }

    async fn get_dividend_history(&self, symbol: &str) -> Result<Vec<Value>, CoreError> {
        let end_date = chrono::Utc::now().date_naive() + chrono::Duration::days(1);
        let start_date = end_date
            .checked_sub_months(Months::new(self.history_years * 12))
            .unwrap_or(NaiveDate::MIN);
        let start = Self::to_offset_datetime(start_date)?;
        let end = Self::to_offset_datetime(end_date)?;

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Failed to fetch history for {symbol}: {e}"),
            })?;

        let dividends = resp.dividends().map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse dividends for {symbol}: {e}"),
        })?;

        Ok(dividends
            .iter()
            .filter_map(|d| Self::dividend_row(d.date, d.amount))
            .collect())
    }

    async fn get_dividend_calendar(
        &self,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<Value>, CoreError> {
        Err(CoreError::NoProvider(format!(
            "{PROVIDER_NAME} does not publish a {} feed",
            DataCapability::Calendar
        )))
    }
}

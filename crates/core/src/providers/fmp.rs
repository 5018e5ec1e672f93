use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::{DataCapability, DividendProvider};

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
const PROVIDER_NAME: &str = "FMP";

/// Financial Modeling Prep provider for dividend history and the
/// confirmed dividend calendar.
///
/// - **Requires**: API key (set via settings as "fmp").
/// - **History**: `/historical-price-full/stock_dividend/{symbol}`, rows
///   with `date` (ex-date), `paymentDate`, `dividend`, `adjDividend`.
/// - **Calendar**: `/stock_dividend_calendar?from&to`, market-wide.
///
/// FMP reports errors as a 200 response with an `"Error Message"` object,
/// so bodies are inspected before they are trusted.
pub struct FmpProvider {
    client: Client,
    api_key: String,
}

impl FmpProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, CoreError> {
        let body: Value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| {
                let detail = crate::errors::redact_query(&e.to_string());
                CoreError::Api {
                    provider: PROVIDER_NAME.into(),
                    message: format!("Failed to parse response: {detail}"),
                }
            })?;
        Ok(body)
    }

    /// Extract history rows from a stock_dividend response.
    ///
    /// Symbols without any dividends come back as `{}`, which is an empty
    /// history rather than an error.
    pub fn parse_history_response(body: Value) -> Result<Vec<Value>, CoreError> {
        check_error_message(&body)?;
        match body {
            Value::Object(mut obj) => match obj.remove("historical") {
                Some(Value::Array(rows)) => Ok(rows),
                Some(Value::Null) | None => Ok(Vec::new()),
                Some(other) => Err(unexpected_shape("historical", &other)),
            },
            Value::Array(rows) if rows.is_empty() => Ok(Vec::new()),
            other => Err(unexpected_shape("history", &other)),
        }
    }

    /// Extract rows from a stock_dividend_calendar response.
    pub fn parse_calendar_response(body: Value) -> Result<Vec<Value>, CoreError> {
        check_error_message(&body)?;
        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(unexpected_shape("calendar", &other)),
        }
    }
}

fn check_error_message(body: &Value) -> Result<(), CoreError> {
    match body.get("Error Message").and_then(Value::as_str) {
        Some(message) => Err(CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

fn unexpected_shape(what: &str, value: &Value) -> CoreError {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("Unexpected {what} response: got {kind}"),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DividendProvider for FmpProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn capabilities(&self) -> Vec<DataCapability> {
        vec![DataCapability::History, DataCapability::Calendar]
    }

    async fn get_dividend_history(&self, symbol: &str) -> Result<Vec<Value>, CoreError> {
        let symbol = symbol.to_uppercase();
        let url = format!(
            "{BASE_URL}/historical-price-full/stock_dividend/{symbol}?apikey={}",
            self.api_key
        );
        let body = self.get_json(&url).await?;
        Self::parse_history_response(body)
    }

    async fn get_dividend_calendar(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Value>, CoreError> {
        let from_str = from.format("%Y-%m-%d");
        let to_str = to.format("%Y-%m-%d");
        let url = format!(
            "{BASE_URL}/stock_dividend_calendar?from={from_str}&to={to_str}&apikey={}",
            self.api_key
        );
        let body = self.get_json(&url).await?;
        Self::parse_calendar_response(body)
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::errors::CoreError;

/// What a dividend data feed can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataCapability {
    /// Per-symbol dividend history
    History,
    /// Market-wide confirmed upcoming dividends
    Calendar,
}

impl std::fmt::Display for DataCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataCapability::History => write!(f, "History"),
            DataCapability::Calendar => write!(f, "Calendar"),
        }
    }
}

/// Trait abstraction for all dividend data feeds.
///
/// Feeds return raw JSON rows. Field names differ between feeds (and
/// between endpoints of one feed), so all interpretation happens in the
/// normalizer.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DividendProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which requests this provider can serve.
    fn capabilities(&self) -> Vec<DataCapability>;

    /// Raw dividend history rows for one symbol, any order.
    async fn get_dividend_history(&self, symbol: &str) -> Result<Vec<Value>, CoreError>;

    /// Raw confirmed-calendar rows with dates between `from` and `to`.
    async fn get_dividend_calendar(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Value>, CoreError>;
}

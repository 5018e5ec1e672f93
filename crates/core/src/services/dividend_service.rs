use chrono::NaiveDate;
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::errors::CoreError;
use crate::providers::registry::ProviderRegistry;
use crate::providers::traits::DataCapability;

/// Fetches raw dividend data from the registered feeds.
///
/// Providers are tried in registration order; if the primary fails (API
/// down, rate limited, unknown symbol) the next one is asked. No retries
/// beyond that: a failed fetch is "no data" until the next reload.
pub struct DividendService {
    registry: ProviderRegistry,
}

impl DividendService {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Raw history for one symbol, with provider fallback.
    pub async fn fetch_history(&self, symbol: &str) -> Result<Vec<Value>, CoreError> {
        let providers = self.registry.get_providers_for(DataCapability::History);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(DataCapability::History.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_dividend_history(symbol).await {
                Ok(rows) => return Ok(rows),
                Err(e) => {
                    warn!(provider = provider.name(), symbol, error = %e, "history fetch failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(DataCapability::History.to_string())))
    }

    /// Fetch every symbol's history concurrently.
    ///
    /// Never fails as a whole: a symbol whose fetch fails maps to an empty
    /// history so the rest of the portfolio is still computed.
    pub async fn fetch_histories(&self, symbols: &[String]) -> HashMap<String, Vec<Value>> {
        let fetches = symbols.iter().map(|symbol| async move {
            let rows = match self.fetch_history(symbol).await {
                Ok(rows) => rows,
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "no dividend history, treating as empty");
                    Vec::new()
                }
            };
            (symbol.to_uppercase(), rows)
        });

        let histories: HashMap<String, Vec<Value>> = join_all(fetches).await.into_iter().collect();
        info!(
            symbols = histories.len(),
            with_data = histories.values().filter(|rows| !rows.is_empty()).count(),
            "dividend histories loaded"
        );
        histories
    }

    /// Raw confirmed-calendar rows between `from` and `to`.
    ///
    /// `None` when no provider publishes a calendar or all of them fail;
    /// reconciliation then relies on history and estimates alone.
    pub async fn fetch_confirmed(&self, from: NaiveDate, to: NaiveDate) -> Option<Vec<Value>> {
        for provider in self.registry.get_providers_for(DataCapability::Calendar) {
            match provider.get_dividend_calendar(from, to).await {
                Ok(rows) => return Some(rows),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "dividend calendar fetch failed");
                }
            }
        }
        None
    }
}

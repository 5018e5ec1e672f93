use std::collections::HashMap;

use super::fmp::FmpProvider;
use super::traits::{DataCapability, DividendProvider};
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;

/// Registry of all available dividend data providers.
///
/// Registration order is priority order: requests go to the first
/// provider with the needed capability and fall back down the list.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn DividendProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>, history_years: u32) -> Self {
        let mut registry = Self::new();

        // FMP: history + calendar, needs an API key (primary)
        if let Some(key) = api_keys.get("fmp") {
            registry.register(Box::new(FmpProvider::new(key.clone())));
        }

        // Yahoo Finance: history only, no key (fallback)
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Ok(yahoo) = YahooFinanceProvider::new(history_years) {
                registry.register(Box::new(yahoo));
            }
        }
        #[cfg(target_arch = "wasm32")]
        let _ = history_years;

        registry
    }

    /// Register a new provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn DividendProvider>) {
        self.providers.push(provider);
    }

    /// All providers with the capability, in priority order.
    pub fn get_providers_for(&self, capability: DataCapability) -> Vec<&dyn DividendProvider> {
        self.providers
            .iter()
            .filter(|p| p.capabilities().contains(&capability))
            .map(|p| p.as_ref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

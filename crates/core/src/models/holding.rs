use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A portfolio line item, supplied by the portfolio store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingPosition {
    /// Ticker symbol, uppercased (e.g., "AAPL", "O")
    pub symbol: String,

    /// Display name (e.g., "Realty Income")
    pub name: String,

    /// Number of shares held (> 0)
    pub quantity: f64,

    /// Latest price per share in the source currency (>= 0)
    pub current_price: f64,
}

impl HoldingPosition {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        quantity: f64,
        current_price: f64,
    ) -> Self {
        Self {
            symbol: symbol.into().trim().to_uppercase(),
            name: name.into(),
            quantity,
            current_price,
        }
    }

    /// Market value of the position in the source currency.
    pub fn market_value(&self) -> f64 {
        self.quantity * self.current_price
    }

    /// Reject malformed positions before they reach the computation core.
    pub fn validate(&self) -> Result<(), CoreError> {
        let invalid = |reason: &str| CoreError::InvalidHolding {
            symbol: self.symbol.clone(),
            reason: reason.to_string(),
        };

        if self.symbol.trim().is_empty() {
            return Err(invalid("symbol must not be empty"));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(invalid(&format!(
                "quantity must be a positive number, got {}",
                self.quantity
            )));
        }
        if !self.current_price.is_finite() || self.current_price < 0.0 {
            return Err(invalid(&format!(
                "current price must be finite and non-negative, got {}",
                self.current_price
            )));
        }
        Ok(())
    }
}

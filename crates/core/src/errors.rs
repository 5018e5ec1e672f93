use thiserror::Error;

/// Unified error type for the entire dividend-forecast-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Missing history, conflicting sources and unpredictable cadences are
/// NOT errors. They flow through the pipeline as `Option`/empty values so
/// one holding's data gap never blocks the rest of the portfolio.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input boundary ──────────────────────────────────────────────
    #[error("Invalid holding {symbol}: {reason}")]
    InvalidHolding { symbol: String, reason: String },

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No provider available for capability: {0}")]
    NoProvider(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL, and FMP takes its key as a
        // query parameter.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Strip everything after the first `?` so API keys never reach logs.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}

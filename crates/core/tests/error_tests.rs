// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use dividend_forecast_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_holding() {
        let err = CoreError::InvalidHolding {
            symbol: "AAPL".into(),
            reason: "quantity must be a positive number, got 0".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid holding AAPL: quantity must be a positive number, got 0"
        );
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("history_years must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: history_years must be at least 1"
        );
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("key must be a string".into());
        assert_eq!(err.to_string(), "Serialization error: key must be a string");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "FMP".into(),
            message: "Limit Reach".into(),
        };
        assert_eq!(err.to_string(), "API error (FMP): Limit Reach");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection reset".into());
        assert_eq!(err.to_string(), "Network error: connection reset");
    }

    #[test]
    fn no_provider() {
        let err = CoreError::NoProvider("Calendar".into());
        assert_eq!(
            err.to_string(),
            "No provider available for capability: Calendar"
        );
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
        assert!(err.to_string().starts_with("Deserialization error: "));
    }

    #[test]
    fn question_mark_propagates_serde_error() {
        fn parse(input: &str) -> Result<serde_json::Value, CoreError> {
            Ok(serde_json::from_str(input)?)
        }
        assert!(parse("[1, 2").is_err());
        assert!(parse("[1, 2]").is_ok());
    }
}

// ── Trait bounds ────────────────────────────────────────────────────

#[test]
fn core_error_is_std_error_and_send_sync() {
    fn assert_bounds<T: std::error::Error + Send + Sync + 'static>() {}
    assert_bounds::<CoreError>();
}

#[test]
fn debug_output_names_variant() {
    let err = CoreError::NoProvider("History".into());
    assert!(format!("{err:?}").contains("NoProvider"));
}

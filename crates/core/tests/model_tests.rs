use chrono::NaiveDate;
use dividend_forecast_core::errors::CoreError;
use dividend_forecast_core::models::calendar::{
    date_key, CalendarEvent, CalendarEventType, DateWindow, PortfolioCalendar,
};
use dividend_forecast_core::models::event::{Provenance, ResolvedNextEvent};
use dividend_forecast_core::models::forecast::MonthlyForecast;
use dividend_forecast_core::models::frequency::FrequencyLabel;
use dividend_forecast_core::models::holding::HoldingPosition;
use dividend_forecast_core::models::profile::DividendProfile;
use dividend_forecast_core::models::record::{ConfirmedCalendar, ConfirmedDividend, PaymentRecord};
use dividend_forecast_core::models::settings::Settings;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn confirmed(symbol: &str, date: NaiveDate) -> ConfirmedDividend {
    ConfirmedDividend {
        symbol: symbol.into(),
        date,
        dividend: Some(0.5),
        record_date: None,
        declaration_date: None,
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PaymentRecord
// ═══════════════════════════════════════════════════════════════════

mod payment_record {
    use super::*;

    #[test]
    fn new_uppercases_symbol() {
        let r = PaymentRecord::new("msft", d(2025, 2, 20), d(2025, 3, 13), 0.83);
        assert_eq!(r.symbol, "MSFT");
    }

    #[test]
    fn realized_on_and_after_payment_date() {
        let r = PaymentRecord::new("O", d(2025, 1, 2), d(2025, 1, 15), 0.264);
        assert!(!r.is_realized(d(2025, 1, 14)));
        assert!(r.is_realized(d(2025, 1, 15)));
        assert!(r.is_realized(d(2025, 6, 1)));
    }

    #[test]
    fn serializes_camel_case_iso_dates() {
        let r = PaymentRecord::new("O", d(2025, 1, 2), d(2025, 1, 15), 0.25);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["exDate"], "2025-01-02");
        assert_eq!(json["paymentDate"], "2025-01-15");
        assert_eq!(json["amountPerShare"], 0.25);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ConfirmedCalendar
// ═══════════════════════════════════════════════════════════════════

mod confirmed_calendar {
    use super::*;

    #[test]
    fn empty_by_default() {
        let cal = ConfirmedCalendar::new();
        assert!(cal.is_empty());
        assert!(cal.entries_for("Z").is_empty());
        assert!(cal.next_for("Z", d(2025, 1, 1)).is_none());
    }

    #[test]
    fn indexes_case_insensitively_and_sorts() {
        let cal = ConfirmedCalendar::from_entries(vec![
            confirmed("z", d(2025, 6, 1)),
            confirmed("Z", d(2025, 3, 1)),
            confirmed("Y", d(2025, 4, 1)),
        ]);

        assert_eq!(cal.symbol_count(), 2);
        let dates: Vec<NaiveDate> = cal.entries_for("z").iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![d(2025, 3, 1), d(2025, 6, 1)]);
        assert!(cal.entries_for("Z").iter().all(|e| e.symbol == "Z"));
    }

    #[test]
    fn next_for_is_strictly_after_today() {
        let cal = ConfirmedCalendar::from_entries(vec![
            confirmed("Z", d(2025, 3, 1)),
            confirmed("Z", d(2025, 6, 1)),
        ]);

        assert_eq!(cal.next_for("Z", d(2025, 2, 1)).unwrap().date, d(2025, 3, 1));
        assert_eq!(cal.next_for("Z", d(2025, 3, 1)).unwrap().date, d(2025, 6, 1));
        assert!(cal.next_for("Z", d(2025, 6, 1)).is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  HoldingPosition
// ═══════════════════════════════════════════════════════════════════

mod holding_position {
    use super::*;

    #[test]
    fn market_value() {
        let h = HoldingPosition::new("x", "X Corp", 100.0, 50.0);
        assert_eq!(h.symbol, "X");
        assert_eq!(h.market_value(), 5000.0);
    }

    #[test]
    fn new_trims_symbol() {
        let h = HoldingPosition::new(" ko\t", "Coca-Cola", 1.0, 60.0);
        assert_eq!(h.symbol, "KO");
    }

    #[test]
    fn valid_holding_passes() {
        assert!(HoldingPosition::new("O", "Realty Income", 12.5, 0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_empty_symbol() {
        let err = HoldingPosition::new("  ", "Blank", 1.0, 1.0).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidHolding { .. }));
    }

    #[test]
    fn rejects_non_positive_quantity() {
        for quantity in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let err = HoldingPosition::new("O", "Realty Income", quantity, 50.0)
                .validate()
                .unwrap_err();
            match err {
                CoreError::InvalidHolding { symbol, reason } => {
                    assert_eq!(symbol, "O");
                    assert!(reason.contains("quantity"));
                }
                other => panic!("expected InvalidHolding, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_negative_or_non_finite_price() {
        for price in [-0.01, f64::NAN, f64::NEG_INFINITY] {
            assert!(HoldingPosition::new("O", "Realty Income", 1.0, price)
                .validate()
                .is_err());
        }
    }

    #[test]
    fn deserializes_camel_case() {
        let h: HoldingPosition = serde_json::from_str(
            r#"{"symbol":"KO","name":"Coca-Cola","quantity":10,"currentPrice":62.5}"#,
        )
        .unwrap();
        assert_eq!(h.current_price, 62.5);
        assert_eq!(h.quantity, 10.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  FrequencyLabel
// ═══════════════════════════════════════════════════════════════════

mod frequency_label {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(FrequencyLabel::Monthly.to_string(), "Monthly");
        assert_eq!(FrequencyLabel::Quarterly.to_string(), "Quarterly");
        assert_eq!(FrequencyLabel::SemiAnnual.to_string(), "Semi-Annual");
        assert_eq!(FrequencyLabel::Annual.to_string(), "Annual");
        assert_eq!(FrequencyLabel::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn months_between_payments() {
        assert_eq!(FrequencyLabel::Monthly.months_between_payments(), Some(1));
        assert_eq!(FrequencyLabel::Quarterly.months_between_payments(), Some(3));
        assert_eq!(FrequencyLabel::SemiAnnual.months_between_payments(), Some(6));
        assert_eq!(FrequencyLabel::Annual.months_between_payments(), Some(12));
        assert_eq!(FrequencyLabel::Unknown.months_between_payments(), None);
    }

    #[test]
    fn advance_clamps_to_month_end() {
        assert_eq!(FrequencyLabel::Monthly.advance(d(2025, 1, 31)), Some(d(2025, 2, 28)));
        assert_eq!(FrequencyLabel::Quarterly.advance(d(2023, 11, 30)), Some(d(2024, 2, 29)));
        assert_eq!(FrequencyLabel::Annual.advance(d(2024, 2, 29)), Some(d(2025, 2, 28)));
        assert_eq!(FrequencyLabel::Unknown.advance(d(2025, 1, 1)), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Provenance / ResolvedNextEvent
// ═══════════════════════════════════════════════════════════════════

mod provenance {
    use super::*;

    #[test]
    fn priority_order() {
        assert!(Provenance::Confirmed < Provenance::ProjectedFromHistory);
        assert!(Provenance::ProjectedFromHistory < Provenance::Estimated);
    }

    #[test]
    fn display() {
        assert_eq!(Provenance::Confirmed.to_string(), "Confirmed");
        assert_eq!(Provenance::ProjectedFromHistory.to_string(), "Projected");
        assert_eq!(Provenance::Estimated.to_string(), "Estimated");
    }

    #[test]
    fn next_event_json_shape() {
        let event = ResolvedNextEvent {
            symbol: "Z".into(),
            date: d(2025, 3, 1),
            amount_per_share: 0.42,
            provenance: Provenance::Confirmed,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2025-03-01");
        assert_eq!(json["amountPerShare"], 0.42);
        assert_eq!(json["provenance"], "Confirmed");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  DividendProfile
// ═══════════════════════════════════════════════════════════════════

#[test]
fn empty_profile_is_zero_and_unknown() {
    let p = DividendProfile::empty("GOOG");
    assert_eq!(p.symbol, "GOOG");
    assert_eq!(p.trailing_annual_income, 0.0);
    assert_eq!(p.yield_percent, 0.0);
    assert_eq!(p.frequency, FrequencyLabel::Unknown);
    assert!(p.last_payment.is_none());
}

// ═══════════════════════════════════════════════════════════════════
//  Calendar types
// ═══════════════════════════════════════════════════════════════════

mod calendar {
    use super::*;

    #[test]
    fn date_key_is_zero_padded_local_date() {
        assert_eq!(date_key(d(2025, 3, 1)), "2025-03-01");
        assert_eq!(date_key(d(2024, 12, 31)), "2024-12-31");
    }

    #[test]
    fn event_type_display_and_order() {
        assert_eq!(CalendarEventType::ExDate.to_string(), "Ex-Date");
        assert!(CalendarEventType::Dividend < CalendarEventType::ExDate);
        assert!(CalendarEventType::ExDate < CalendarEventType::Earnings);
        assert!(CalendarEventType::Earnings < CalendarEventType::Split);
    }

    #[test]
    fn informational_event_constructors() {
        let e = CalendarEvent::earnings(d(2025, 1, 29), "msft", "Microsoft");
        assert_eq!(e.event_type, CalendarEventType::Earnings);
        assert_eq!(e.symbol, "MSFT");
        assert_eq!(e.total_amount_target, 0.0);
        assert!(e.ratio.is_none());

        let s = CalendarEvent::split(d(2024, 6, 10), "NVDA", "Nvidia", "10:1");
        assert_eq!(s.date_key, "2024-06-10");
        assert_eq!(s.ratio.as_deref(), Some("10:1"));
    }

    #[test]
    fn event_serializes_type_field() {
        let e = CalendarEvent::earnings(d(2025, 1, 29), "MSFT", "Microsoft");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "Earnings");
        assert_eq!(json["dateKey"], "2025-01-29");
    }

    #[test]
    fn window_rejects_inverted_range() {
        let err = DateWindow::new(d(2025, 3, 1), d(2025, 2, 1)).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(DateWindow::new(d(2025, 3, 1), d(2025, 3, 1)).is_ok());
    }

    #[test]
    fn month_of_handles_leap_february() {
        let w = DateWindow::month_of(d(2024, 2, 17));
        assert_eq!(w.start, d(2024, 2, 1));
        assert_eq!(w.end, d(2024, 2, 29));

        let dec = DateWindow::month_of(d(2025, 12, 31));
        assert_eq!(dec.end, d(2025, 12, 31));
    }

    #[test]
    fn days_ahead_is_inclusive() {
        let w = DateWindow::days_ahead(d(2025, 1, 1), 30);
        assert!(w.contains(d(2025, 1, 1)));
        assert!(w.contains(d(2025, 1, 31)));
        assert!(!w.contains(d(2025, 2, 1)));
        assert!(!w.contains(d(2024, 12, 31)));
    }

    #[test]
    fn empty_calendar() {
        let cal = PortfolioCalendar::default();
        assert!(cal.is_empty());
        assert_eq!(cal.len(), 0);
        assert!(cal.events_on(d(2025, 1, 1)).is_empty());
        assert_eq!(cal.total_dividends_target(), 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  MonthlyForecast
// ═══════════════════════════════════════════════════════════════════

#[test]
fn monthly_forecast_totals() {
    let m = MonthlyForecast {
        year: 2025,
        month: 12,
        confirmed: 50.0,
        estimated: 25.0,
        confirmed_target: 45.0,
        estimated_target: 22.5,
    };
    assert_eq!(m.total(), 75.0);
    assert_eq!(m.total_target(), 67.5);
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.source_currency, "USD");
        assert_eq!(s.display_currency, "EUR");
        assert!(s.api_keys.is_empty());
        assert_eq!(s.history_years, 5);
        assert!(s.calendar.include_payment_history);
        assert_eq!(s.calendar.forecast_months, 12);
        assert_eq!(s.calendar.watchlist_window_days, 180);
        assert_eq!(s.field_aliases.amount[0], "amountPerShare");
        assert_eq!(s.field_aliases.payment_date, vec!["paymentDate", "payDate"]);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s = Settings::from_json(
            r#"{"display_currency":"PLN","api_keys":{"fmp":"k"},"calendar":{"forecast_months":6}}"#,
        )
        .unwrap();
        assert_eq!(s.display_currency, "PLN");
        assert_eq!(s.source_currency, "USD");
        assert_eq!(s.api_keys["fmp"], "k");
        assert_eq!(s.calendar.forecast_months, 6);
        assert!(s.calendar.include_payment_history);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn json_roundtrip() {
        let mut s = Settings::default();
        s.history_years = 10;
        let json = s.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }

    #[test]
    fn rejects_zero_forecast_months() {
        let err = Settings::from_json(r#"{"calendar":{"forecast_months":0}}"#).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn rejects_zero_history_years() {
        assert!(Settings::from_json(r#"{"history_years":0}"#).is_err());
    }

    #[test]
    fn rejects_blank_alias_list() {
        let err = Settings::from_json(r#"{"field_aliases":{"amount":[" "]}}"#).unwrap_err();
        assert!(err.to_string().contains("field_aliases.amount"));
    }

    #[test]
    fn malformed_json_is_deserialization_error() {
        let err = Settings::from_json("{oops").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}

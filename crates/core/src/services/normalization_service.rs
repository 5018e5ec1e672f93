use chrono::NaiveDate;
use serde_json::Value;
use std::cmp::Ordering;

use crate::models::record::{ConfirmedDividend, PaymentRecord};
use crate::models::settings::FieldAliases;

/// Result of looking a field up through its alias list.
enum Field<T> {
    /// No alias carried a value (missing, null or empty string)
    Absent,
    /// An alias carried a value that could not be read
    Malformed,
    Value(T),
}

/// Turns raw feed rows into canonical `PaymentRecord`s.
///
/// The feed is best effort: rows without a readable amount or date are
/// dropped silently. Output is always sorted newest payment first.
pub struct NormalizationService {
    aliases: FieldAliases,
}

impl NormalizationService {
    pub fn new() -> Self {
        Self::with_aliases(FieldAliases::default())
    }

    pub fn with_aliases(aliases: FieldAliases) -> Self {
        Self { aliases }
    }

    /// Normalize one symbol's raw dividend history.
    pub fn normalize(&self, symbol: &str, raw: &[Value]) -> Vec<PaymentRecord> {
        let records = raw
            .iter()
            .filter_map(|row| self.parse_row(symbol, row))
            .collect();
        self.normalize_records(records)
    }

    /// Re-establish the canonical invariants on already-typed records:
    /// valid amounts, `payment_date >= ex_date`, uppercase symbols,
    /// newest-first order and no exact duplicates.
    ///
    /// Normalizing a canonical list returns it unchanged.
    pub fn normalize_records(&self, records: Vec<PaymentRecord>) -> Vec<PaymentRecord> {
        let mut records: Vec<PaymentRecord> = records
            .into_iter()
            .filter(|r| {
                r.amount_per_share.is_finite()
                    && r.amount_per_share >= 0.0
                    && r.payment_date >= r.ex_date
            })
            .map(|mut r| {
                r.symbol = r.symbol.to_uppercase();
                r
            })
            .collect();

        records.sort_by(newest_first);
        records.dedup();
        records
    }

    /// Parse the confirmed upcoming-dividend calendar.
    ///
    /// Rows need a symbol and a date; everything else is optional.
    pub fn normalize_confirmed(&self, raw: &[Value]) -> Vec<ConfirmedDividend> {
        raw.iter()
            .filter_map(|row| {
                let symbol = row.get("symbol")?.as_str()?.trim().to_uppercase();
                if symbol.is_empty() {
                    return None;
                }
                let date = match self.lookup_date(row, &["date".to_string()]) {
                    Field::Value(d) => d,
                    Field::Malformed => return None,
                    Field::Absent => match self.lookup_date(row, &self.aliases.payment_date) {
                        Field::Value(d) => d,
                        _ => return None,
                    },
                };
                let dividend = match self.lookup_amount(row) {
                    Field::Value(a) => Some(a),
                    _ => None,
                };
                Some(ConfirmedDividend {
                    symbol,
                    date,
                    dividend,
                    record_date: row.get("recordDate").and_then(parse_date_value),
                    declaration_date: row.get("declarationDate").and_then(parse_date_value),
                })
            })
            .collect()
    }

    fn parse_row(&self, symbol: &str, row: &Value) -> Option<PaymentRecord> {
        let amount = match self.lookup_amount(row) {
            Field::Value(a) => a,
            _ => return None,
        };

        let ex_date = match self.lookup_date(row, &self.aliases.ex_date) {
            Field::Value(d) => Some(d),
            Field::Absent => None,
            Field::Malformed => return None,
        };
        let payment_date = match self.lookup_date(row, &self.aliases.payment_date) {
            Field::Value(d) => Some(d),
            Field::Absent => None,
            Field::Malformed => return None,
        };

        // Either date stands in for the other when the feed omits it.
        let (ex_date, payment_date) = match (ex_date, payment_date) {
            (Some(ex), Some(pay)) => (ex, pay),
            (Some(ex), None) => (ex, ex),
            (None, Some(pay)) => (pay, pay),
            (None, None) => return None,
        };

        Some(PaymentRecord::new(symbol, ex_date, payment_date, amount))
    }

    fn lookup_amount(&self, row: &Value) -> Field<f64> {
        for alias in &self.aliases.amount {
            match row.get(alias) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) if s.trim().is_empty() => continue,
                Some(v) => {
                    return match parse_amount_value(v) {
                        Some(a) => Field::Value(a),
                        None => Field::Malformed,
                    }
                }
            }
        }
        Field::Absent
    }

    fn lookup_date(&self, row: &Value, aliases: &[String]) -> Field<NaiveDate> {
        for alias in aliases {
            match row.get(alias) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) if s.trim().is_empty() => continue,
                Some(v) => {
                    return match parse_date_value(v) {
                        Some(d) => Field::Value(d),
                        None => Field::Malformed,
                    }
                }
            }
        }
        Field::Absent
    }
}

impl Default for NormalizationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest payment first; ties broken by ex-date, then amount, then symbol.
fn newest_first(a: &PaymentRecord, b: &PaymentRecord) -> Ordering {
    b.payment_date
        .cmp(&a.payment_date)
        .then_with(|| b.ex_date.cmp(&a.ex_date))
        .then_with(|| b.amount_per_share.total_cmp(&a.amount_per_share))
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// Read a per-share amount from a JSON number or numeric string.
/// Negative or non-finite values are rejected.
pub fn parse_amount_value(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (amount.is_finite() && amount >= 0.0).then_some(amount)
}

/// Read a calendar date from `YYYY-MM-DD` or the date part of an
/// ISO-8601 timestamp. The date is taken as written, never shifted
/// through UTC.
pub fn parse_date_value(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    let date_part = s.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

use chrono::NaiveDate;
use tracing::debug;

use crate::models::event::{Provenance, ResolvedNextEvent};
use crate::models::frequency::FrequencyLabel;
use crate::models::record::{ConfirmedCalendar, PaymentRecord};
use super::income_service::IncomeService;
use super::prediction_service::PredictionService;

/// Resolves one authoritative next payment per holding.
///
/// The feed is inconsistent about where future data shows up, so sources
/// are tried in fixed order and the first hit wins:
/// 1. the confirmed dividend calendar,
/// 2. a future-dated row already in the payment history,
/// 3. the statistical prediction.
///
/// A confirmed entry is never overridden by history, even one with an
/// earlier date.
pub struct ReconciliationService {
    prediction_service: PredictionService,
}

impl ReconciliationService {
    pub fn new() -> Self {
        Self {
            prediction_service: PredictionService::new(),
        }
    }

    /// Resolve the next event for `symbol`. `records` must be normalized.
    pub fn resolve(
        &self,
        symbol: &str,
        records: &[PaymentRecord],
        frequency: FrequencyLabel,
        confirmed: Option<&ConfirmedCalendar>,
        today: NaiveDate,
    ) -> Option<ResolvedNextEvent> {
        let symbol = symbol.to_uppercase();

        if let Some(event) = confirmed.and_then(|c| Self::from_confirmed(c, &symbol, records, today))
        {
            debug!(symbol = %symbol, date = %event.date, "using confirmed calendar entry");
            return Some(event);
        }

        if let Some(event) = Self::from_history(&symbol, records, today) {
            debug!(symbol = %symbol, date = %event.date, "using future-dated history row");
            return Some(event);
        }

        let estimated = self
            .prediction_service
            .predict(records, frequency, today)
            .filter(|e| e.date > today);
        match &estimated {
            Some(event) => debug!(symbol = %symbol, date = %event.date, "using estimated date"),
            None => debug!(symbol = %symbol, "no upcoming payment could be resolved"),
        }
        estimated.map(|e| ResolvedNextEvent { symbol, ..e })
    }

    fn from_confirmed(
        calendar: &ConfirmedCalendar,
        symbol: &str,
        records: &[PaymentRecord],
        today: NaiveDate,
    ) -> Option<ResolvedNextEvent> {
        let Some(entry) = calendar.next_for(symbol, today) else {
            if !calendar.entries_for(symbol).is_empty() {
                debug!(symbol = %symbol, "confirmed calendar only has past entries, ignoring them");
            }
            return None;
        };

        // The calendar does not always carry an amount; assume the last
        // realized one still holds.
        let amount_per_share = entry
            .dividend
            .or_else(|| IncomeService::last_payment(records, today).map(|r| r.amount_per_share))
            .unwrap_or(0.0);

        Some(ResolvedNextEvent {
            symbol: symbol.to_string(),
            date: entry.date,
            amount_per_share,
            provenance: Provenance::Confirmed,
        })
    }

    fn from_history(
        symbol: &str,
        records: &[PaymentRecord],
        today: NaiveDate,
    ) -> Option<ResolvedNextEvent> {
        records
            .iter()
            .filter(|r| r.payment_date > today)
            .min_by_key(|r| r.payment_date)
            .map(|r| ResolvedNextEvent {
                symbol: symbol.to_string(),
                date: r.payment_date,
                amount_per_share: r.amount_per_share,
                provenance: Provenance::ProjectedFromHistory,
            })
    }
}

impl Default for ReconciliationService {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::models::event::{Provenance, ResolvedNextEvent};
use crate::models::frequency::FrequencyLabel;
use crate::models::record::PaymentRecord;
use super::frequency_service::mean_gap_days;

/// How many recent realized payments feed the interval estimate.
const INTERVAL_SAMPLES: usize = 4;

/// Infers the next unconfirmed payment date from payment history.
///
/// Strategy:
/// 1. Mean spacing of the last (up to) four realized payment dates,
///    projected forward from the latest one.
/// 2. If that is unavailable or not in the future, a fixed offset from the
///    last payment based on the classified frequency.
///
/// Insufficient history yields `None`, never an error.
pub struct PredictionService;

impl PredictionService {
    pub fn new() -> Self {
        Self
    }

    /// Predict the next payment. Any returned date is strictly after `today`.
    ///
    /// `records` must be normalized (newest payment first).
    pub fn predict(
        &self,
        records: &[PaymentRecord],
        frequency: FrequencyLabel,
        today: NaiveDate,
    ) -> Option<ResolvedNextEvent> {
        let realized: Vec<&PaymentRecord> = records
            .iter()
            .filter(|r| r.is_realized(today))
            .take(INTERVAL_SAMPLES)
            .collect();
        let latest = realized.first()?;

        let date = Self::by_interval(&realized, today)
            .or_else(|| Self::by_frequency(latest.payment_date, frequency, today))?;

        Some(ResolvedNextEvent {
            symbol: latest.symbol.clone(),
            date,
            amount_per_share: latest.amount_per_share,
            provenance: Provenance::Estimated,
        })
    }

    fn by_interval(realized: &[&PaymentRecord], today: NaiveDate) -> Option<NaiveDate> {
        let dates: Vec<NaiveDate> = realized.iter().map(|r| r.payment_date).collect();
        let mean = mean_gap_days(&dates)?;
        let step = mean.round();
        if step < 1.0 {
            return None;
        }

        debug!(
            symbol = %realized[0].symbol,
            samples = dates.len(),
            mean_interval_days = mean,
            "payment interval pattern"
        );

        let candidate = dates[0].checked_add_days(Days::new(step as u64))?;
        (candidate > today).then_some(candidate)
    }

    fn by_frequency(
        last_payment: NaiveDate,
        frequency: FrequencyLabel,
        today: NaiveDate,
    ) -> Option<NaiveDate> {
        let candidate = frequency.advance(last_payment)?;
        (candidate > today).then_some(candidate)
    }
}

impl Default for PredictionService {
    fn default() -> Self {
        Self::new()
    }
}

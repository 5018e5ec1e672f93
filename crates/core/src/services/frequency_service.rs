use chrono::{Months, NaiveDate};

use crate::models::frequency::FrequencyLabel;
use crate::models::record::PaymentRecord;

/// Length of the trailing window used for annualized figures.
const TRAILING_MONTHS: u32 = 12;

/// How many recent payments the interval estimate looks at.
const INTERVAL_SAMPLE_SIZE: usize = 8;

/// Labels a holding's payment cadence.
pub struct FrequencyService;

impl FrequencyService {
    pub fn new() -> Self {
        Self
    }

    /// First day after the trailing window's open boundary: records must
    /// have an ex-date strictly after this and on or before `today`.
    pub fn window_open(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_months(Months::new(TRAILING_MONTHS))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Records whose ex-date falls in `(today - 12 months, today]`,
    /// preserving the input order.
    pub fn trailing_window<'a>(
        &self,
        records: &'a [PaymentRecord],
        today: NaiveDate,
    ) -> Vec<&'a PaymentRecord> {
        let open = self.window_open(today);
        records
            .iter()
            .filter(|r| r.ex_date > open && r.ex_date <= today)
            .collect()
    }

    /// Classify by the number of payments in the trailing window.
    pub fn classify(&self, records: &[PaymentRecord], today: NaiveDate) -> FrequencyLabel {
        Self::label_for_count(self.trailing_window(records, today).len())
    }

    /// Count thresholds. 11 rather than 12 for monthly so one late report
    /// does not demote a monthly payer.
    pub fn label_for_count(count: usize) -> FrequencyLabel {
        match count {
            0 => FrequencyLabel::Unknown,
            1 => FrequencyLabel::Annual,
            2 => FrequencyLabel::SemiAnnual,
            3..=10 => FrequencyLabel::Quarterly,
            _ => FrequencyLabel::Monthly,
        }
    }

    /// Estimate cadence from the mean gap between the most recent
    /// positive payments, ignoring the trailing window entirely.
    pub fn classify_by_interval(&self, records: &[PaymentRecord]) -> FrequencyLabel {
        let mut ex_dates: Vec<NaiveDate> = records
            .iter()
            .filter(|r| r.amount_per_share > 0.0)
            .map(|r| r.ex_date)
            .collect();
        ex_dates.sort_unstable_by(|a, b| b.cmp(a));
        ex_dates.truncate(INTERVAL_SAMPLE_SIZE);

        let Some(mean) = mean_gap_days(&ex_dates) else {
            return FrequencyLabel::Unknown;
        };

        if mean < 40.0 {
            FrequencyLabel::Monthly
        } else if mean < 120.0 {
            FrequencyLabel::Quarterly
        } else if mean < 200.0 {
            FrequencyLabel::SemiAnnual
        } else {
            FrequencyLabel::Annual
        }
    }
}

impl Default for FrequencyService {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean gap in days between consecutive dates (newest first).
/// `None` with fewer than two dates.
pub(crate) fn mean_gap_days(dates_newest_first: &[NaiveDate]) -> Option<f64> {
    if dates_newest_first.len() < 2 {
        return None;
    }
    let gaps: Vec<i64> = dates_newest_first
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_days())
        .collect();
    Some(gaps.iter().sum::<i64>() as f64 / gaps.len() as f64)
}

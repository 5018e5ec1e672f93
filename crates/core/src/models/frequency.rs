use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Payment cadence of a dividend payer.
///
/// Derived from the trailing window on every load, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrequencyLabel {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
    Unknown,
}

impl FrequencyLabel {
    /// Calendar months between two payments, `None` for `Unknown`.
    pub fn months_between_payments(&self) -> Option<u32> {
        match self {
            FrequencyLabel::Monthly => Some(1),
            FrequencyLabel::Quarterly => Some(3),
            FrequencyLabel::SemiAnnual => Some(6),
            FrequencyLabel::Annual => Some(12),
            FrequencyLabel::Unknown => None,
        }
    }

    /// Advance `date` by one payment period.
    ///
    /// Month arithmetic clamps to the end of shorter months
    /// (Jan 31 + 1 month = Feb 28/29).
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        let months = self.months_between_payments()?;
        date.checked_add_months(Months::new(months))
    }
}

impl std::fmt::Display for FrequencyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrequencyLabel::Monthly => write!(f, "Monthly"),
            FrequencyLabel::Quarterly => write!(f, "Quarterly"),
            FrequencyLabel::SemiAnnual => write!(f, "Semi-Annual"),
            FrequencyLabel::Annual => write!(f, "Annual"),
            FrequencyLabel::Unknown => write!(f, "Unknown"),
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which source produced a resolved next payment.
///
/// Variants are declared in priority order: the reconciler always prefers
/// an earlier variant over a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Published in the upstream dividend calendar
    Confirmed,
    /// A future-dated row already present in the payment history
    ProjectedFromHistory,
    /// Inferred from historical payment spacing
    Estimated,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Confirmed => write!(f, "Confirmed"),
            Provenance::ProjectedFromHistory => write!(f, "Projected"),
            Provenance::Estimated => write!(f, "Estimated"),
        }
    }
}

/// The single next expected payment for a holding.
///
/// `date` is always strictly after the `today` it was resolved against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNextEvent {
    pub symbol: String,
    pub date: NaiveDate,
    pub amount_per_share: f64,
    pub provenance: Provenance,
}

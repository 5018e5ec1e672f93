use chrono::NaiveDate;

use crate::models::holding::HoldingPosition;
use crate::models::profile::DividendProfile;
use crate::models::record::PaymentRecord;
use super::frequency_service::FrequencyService;

/// Computes trailing annual income and yield for a holding.
pub struct IncomeService {
    frequency_service: FrequencyService,
}

impl IncomeService {
    pub fn new() -> Self {
        Self {
            frequency_service: FrequencyService::new(),
        }
    }

    /// Build the full profile for one holding from its normalized records.
    pub fn build_profile(
        &self,
        holding: &HoldingPosition,
        records: &[PaymentRecord],
        today: NaiveDate,
    ) -> DividendProfile {
        let window = self.frequency_service.trailing_window(records, today);
        let per_share = Self::trailing_amount_per_share(&window);

        DividendProfile {
            symbol: holding.symbol.clone(),
            trailing_annual_amount_per_share: per_share,
            trailing_annual_income: per_share * holding.quantity,
            yield_percent: Self::yield_percent(per_share, holding.current_price),
            frequency: FrequencyService::label_for_count(window.len()),
            last_payment: Self::last_payment(records, today).cloned(),
        }
    }

    /// Sum of per-share amounts over the trailing window.
    pub fn trailing_amount_per_share(window: &[&PaymentRecord]) -> f64 {
        window.iter().map(|r| r.amount_per_share).sum()
    }

    /// Dividend yield in percent; 0 when the price is 0 or unusable.
    pub fn yield_percent(annual_amount_per_share: f64, current_price: f64) -> f64 {
        if !current_price.is_finite() || current_price <= 0.0 {
            return 0.0;
        }
        annual_amount_per_share / current_price * 100.0
    }

    /// Most recent payment already paid out. Relies on newest-first order.
    pub fn last_payment(records: &[PaymentRecord], today: NaiveDate) -> Option<&PaymentRecord> {
        records.iter().find(|r| r.is_realized(today))
    }
}

impl Default for IncomeService {
    fn default() -> Self {
        Self::new()
    }
}

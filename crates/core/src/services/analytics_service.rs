use chrono::NaiveDate;

use crate::models::event::ResolvedNextEvent;
use crate::models::profile::{HoldingTimeline, PortfolioDividendSummary};
use super::calendar_service::effective_exchange_rate;
use super::income_service::IncomeService;

/// Computes portfolio-level dividend rollups: total income, portfolio
/// yield, and the next payment anywhere in the portfolio.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(
        &self,
        timelines: &[HoldingTimeline],
        exchange_rate: f64,
        display_currency: &str,
        today: NaiveDate,
    ) -> PortfolioDividendSummary {
        let rate = effective_exchange_rate(exchange_rate);

        let total_annual_income: f64 = timelines
            .iter()
            .map(|t| t.profile.trailing_annual_income)
            .sum();
        let total_portfolio_value: f64 = timelines.iter().map(|t| t.holding.market_value()).sum();
        let paying_holdings_count = timelines
            .iter()
            .filter(|t| t.profile.trailing_annual_income > 0.0)
            .count();

        PortfolioDividendSummary {
            as_of_date: today,
            display_currency: display_currency.to_uppercase(),
            total_annual_income,
            total_annual_income_target: total_annual_income * rate,
            monthly_average_income: total_annual_income / 12.0,
            total_portfolio_value,
            // Same guard as the per-holding yield: a zero-value portfolio yields 0.
            portfolio_yield_percent: IncomeService::yield_percent(
                total_annual_income,
                total_portfolio_value,
            ),
            holdings_count: timelines.len(),
            paying_holdings_count,
            next_payment: Self::next_payment(timelines),
        }
    }

    /// Earliest resolved event across all holdings; ties go to the
    /// alphabetically first symbol.
    pub fn next_payment(timelines: &[HoldingTimeline]) -> Option<ResolvedNextEvent> {
        timelines
            .iter()
            .filter_map(|t| t.next_event.as_ref())
            .min_by(|a, b| a.date.cmp(&b.date).then_with(|| a.symbol.cmp(&b.symbol)))
            .cloned()
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

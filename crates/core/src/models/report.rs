use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::PortfolioCalendar;
use super::forecast::MonthlyForecast;
use super::profile::{DividendProfile, HoldingTimeline, PortfolioDividendSummary};

/// Everything the dividend views render, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDividendReport {
    pub as_of_date: NaiveDate,

    /// One entry per holding, in input order
    pub timelines: Vec<HoldingTimeline>,

    pub calendar: PortfolioCalendar,

    pub summary: PortfolioDividendSummary,

    pub forecast: Vec<MonthlyForecast>,
}

impl PortfolioDividendReport {
    /// Per-holding profiles for the summary table.
    pub fn profiles(&self) -> Vec<&DividendProfile> {
        self.timelines.iter().map(|t| &t.profile).collect()
    }

    pub fn timeline_for(&self, symbol: &str) -> Option<&HoldingTimeline> {
        let upper = symbol.to_uppercase();
        self.timelines.iter().find(|t| t.holding.symbol == upper)
    }
}

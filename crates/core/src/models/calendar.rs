use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;

use super::event::Provenance;

/// Kind of calendar entry. Declaration order is the display order of
/// events that share a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CalendarEventType {
    Dividend,
    ExDate,
    Earnings,
    Split,
}

impl std::fmt::Display for CalendarEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarEventType::Dividend => write!(f, "Dividend"),
            CalendarEventType::ExDate => write!(f, "Ex-Date"),
            CalendarEventType::Earnings => write!(f, "Earnings"),
            CalendarEventType::Split => write!(f, "Split"),
        }
    }
}

/// Build a `YYYY-MM-DD` bucket key from the date's own calendar fields.
///
/// `NaiveDate` carries no zone, so the key is the local calendar day the
/// feed reported and never shifts across midnight.
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// One entry placed into the aggregated calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub date_key: String,

    #[serde(rename = "type")]
    pub event_type: CalendarEventType,

    pub symbol: String,

    /// Holding display name
    pub name: String,

    pub amount_per_share_source: f64,
    pub amount_per_share_target: f64,
    pub total_amount_source: f64,
    pub total_amount_target: f64,

    /// Set on dividend payments that came out of reconciliation
    #[serde(default)]
    pub provenance: Option<Provenance>,

    /// Split ratio such as "4:1"
    #[serde(default)]
    pub ratio: Option<String>,
}

impl CalendarEvent {
    /// An earnings release supplied by a collaborator.
    pub fn earnings(date: NaiveDate, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self::informational(CalendarEventType::Earnings, date, symbol, name, None)
    }

    /// A stock split supplied by a collaborator.
    pub fn split(
        date: NaiveDate,
        symbol: impl Into<String>,
        name: impl Into<String>,
        ratio: impl Into<String>,
    ) -> Self {
        Self::informational(CalendarEventType::Split, date, symbol, name, Some(ratio.into()))
    }

    fn informational(
        event_type: CalendarEventType,
        date: NaiveDate,
        symbol: impl Into<String>,
        name: impl Into<String>,
        ratio: Option<String>,
    ) -> Self {
        Self {
            date_key: date_key(date),
            event_type,
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            amount_per_share_source: 0.0,
            amount_per_share_target: 0.0,
            total_amount_source: 0.0,
            total_amount_target: 0.0,
            provenance: None,
            ratio,
        }
    }
}

/// Inclusive date range the calendar is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::ValidationError(format!(
                "window start ({start}) must not be after window end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self { start, end }
    }

    /// `today` through `today + days`.
    pub fn days_ahead(today: NaiveDate, days: u32) -> Self {
        let end = today
            .checked_add_days(chrono::Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Calendar events grouped by `date_key`, keys ascending, each day's
/// events in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioCalendar {
    pub window: Option<DateWindow>,
    pub days: BTreeMap<String, Vec<CalendarEvent>>,
}

impl PortfolioCalendar {
    /// What happens on the given day.
    pub fn events_on(&self, date: NaiveDate) -> &[CalendarEvent] {
        self.days
            .get(&date_key(date))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All events flattened in date, then display order.
    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.days.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Sum of dividend payments in the display currency.
    pub fn total_dividends_target(&self) -> f64 {
        self.events()
            .filter(|e| e.event_type == CalendarEventType::Dividend)
            .map(|e| e.total_amount_target)
            .sum()
    }
}

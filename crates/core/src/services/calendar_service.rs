use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::models::calendar::{
    date_key, CalendarEvent, CalendarEventType, DateWindow, PortfolioCalendar,
};
use crate::models::event::Provenance;
use crate::models::forecast::WatchlistDividend;
use crate::models::holding::HoldingPosition;
use crate::models::profile::HoldingTimeline;
use crate::models::record::PaymentRecord;
use super::frequency_service::FrequencyService;

/// Merges every holding's dividend events into one date-keyed calendar.
///
/// The service computes all amounts in both currencies, the frontend
/// only renders the buckets.
pub struct CalendarService {
    frequency_service: FrequencyService,
}

impl CalendarService {
    pub fn new() -> Self {
        Self {
            frequency_service: FrequencyService::new(),
        }
    }

    /// Build the calendar for `window`.
    ///
    /// Emits, per holding:
    /// - the resolved next payment, if it falls in the window,
    /// - optionally every history row whose payment date falls in the window,
    /// - every ex-date in the window with a positive amount.
    ///
    /// `external` events (earnings, splits) are merged into the same
    /// buckets. At most one dividend per symbol and day survives, external
    /// ones included; the resolved event wins because it is emitted first.
    pub fn aggregate(
        &self,
        timelines: &[HoldingTimeline],
        window: DateWindow,
        exchange_rate: f64,
        include_payment_history: bool,
        external: &[CalendarEvent],
    ) -> PortfolioCalendar {
        let rate = effective_exchange_rate(exchange_rate);
        let mut dividends = Vec::new();
        let mut ex_dates = Vec::new();

        for timeline in timelines {
            let holding = &timeline.holding;

            if let Some(next) = &timeline.next_event {
                if window.contains(next.date) {
                    dividends.push(Self::amount_event(
                        CalendarEventType::Dividend,
                        holding,
                        next.date,
                        next.amount_per_share,
                        rate,
                        Some(next.provenance),
                    ));
                }
            }

            if include_payment_history {
                dividends.extend(
                    timeline
                        .records
                        .iter()
                        .filter(|r| window.contains(r.payment_date))
                        .map(|r| {
                            Self::amount_event(
                                CalendarEventType::Dividend,
                                holding,
                                r.payment_date,
                                r.amount_per_share,
                                rate,
                                None,
                            )
                        }),
                );
            }

            ex_dates.extend(
                timeline
                    .records
                    .iter()
                    .filter(|r| window.contains(r.ex_date) && r.amount_per_share > 0.0)
                    .map(|r| {
                        Self::amount_event(
                            CalendarEventType::ExDate,
                            holding,
                            r.ex_date,
                            r.amount_per_share,
                            rate,
                            None,
                        )
                    }),
            );
        }

        let mut seen_dividends: HashSet<(String, String)> = HashSet::new();
        dividends.retain(|e| seen_dividends.insert((e.symbol.clone(), e.date_key.clone())));

        let mut others: Vec<CalendarEvent> = Vec::new();
        for event in external {
            let in_window = NaiveDate::parse_from_str(&event.date_key, "%Y-%m-%d")
                .is_ok_and(|d| window.contains(d));
            if !in_window || others.contains(event) {
                continue;
            }
            if event.event_type == CalendarEventType::Dividend
                && !seen_dividends.insert((event.symbol.clone(), event.date_key.clone()))
            {
                debug!(
                    symbol = %event.symbol,
                    date = %event.date_key,
                    "dropping duplicate external dividend"
                );
                continue;
            }
            others.push(event.clone());
        }

        let mut days: BTreeMap<String, Vec<CalendarEvent>> = BTreeMap::new();
        for event in dividends.into_iter().chain(ex_dates).chain(others) {
            days.entry(event.date_key.clone()).or_default().push(event);
        }
        for events in days.values_mut() {
            events.sort_by(|a, b| {
                a.event_type
                    .cmp(&b.event_type)
                    .then_with(|| a.symbol.cmp(&b.symbol))
            });
        }

        PortfolioCalendar {
            window: Some(window),
            days,
        }
    }

    /// Dividend rows for one watched ticker, ex-dates within
    /// `window_days` either side of `today`, oldest first.
    pub fn watchlist_entries(
        &self,
        records: &[PaymentRecord],
        current_price: Option<f64>,
        today: NaiveDate,
        window_days: u32,
    ) -> Vec<WatchlistDividend> {
        let span = Days::new(u64::from(window_days));
        let from = today.checked_sub_days(span).unwrap_or(NaiveDate::MIN);
        let to = today.checked_add_days(span).unwrap_or(NaiveDate::MAX);
        let frequency = self.frequency_service.classify_by_interval(records);
        let price = current_price.filter(|p| p.is_finite() && *p > 0.0);

        let mut entries: Vec<WatchlistDividend> = records
            .iter()
            .filter(|r| r.ex_date >= from && r.ex_date <= to)
            .map(|r| WatchlistDividend {
                symbol: r.symbol.clone(),
                ex_date: r.ex_date,
                payment_date: r.payment_date,
                dividend: r.amount_per_share,
                yield_percent: price
                    .filter(|_| r.amount_per_share > 0.0)
                    .map(|p| r.amount_per_share / p * 100.0),
                current_price,
                frequency,
            })
            .collect();
        entries.sort_by_key(|e| e.ex_date);
        entries
    }

    fn amount_event(
        event_type: CalendarEventType,
        holding: &HoldingPosition,
        date: NaiveDate,
        amount_per_share: f64,
        rate: f64,
        provenance: Option<Provenance>,
    ) -> CalendarEvent {
        let total = amount_per_share * holding.quantity;
        CalendarEvent {
            date_key: date_key(date),
            event_type,
            symbol: holding.symbol.clone(),
            name: holding.name.clone(),
            amount_per_share_source: amount_per_share,
            amount_per_share_target: amount_per_share * rate,
            total_amount_source: total,
            total_amount_target: total * rate,
            provenance,
            ratio: None,
        }
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new()
    }
}

/// The supplied source→target multiplier, or 1.0 when it is unusable.
pub fn effective_exchange_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        warn!(rate, "invalid exchange rate, amounts stay in source currency");
        1.0
    }
}

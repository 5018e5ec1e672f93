use chrono::{Datelike, Months, NaiveDate};

use crate::models::event::Provenance;
use crate::models::forecast::MonthlyForecast;
use crate::models::profile::HoldingTimeline;
use super::calendar_service::effective_exchange_rate;

/// Projects dividend income month by month.
pub struct ForecastService;

impl ForecastService {
    pub fn new() -> Self {
        Self
    }

    /// One bucket per calendar month, starting with the month of `today`.
    ///
    /// Each holding's resolved next payment is repeated at its cadence
    /// until the horizon ends. Only the resolved payment itself can be
    /// `confirmed` (when the feed published it); every repetition is
    /// `estimated`. Holdings with unknown cadence contribute their next
    /// payment only.
    pub fn monthly_forecast(
        &self,
        timelines: &[HoldingTimeline],
        today: NaiveDate,
        months: u32,
        exchange_rate: f64,
    ) -> Vec<MonthlyForecast> {
        let rate = effective_exchange_rate(exchange_rate);
        let first_month = today.with_day(1).unwrap_or(today);

        let mut buckets: Vec<MonthlyForecast> = (0..months)
            .filter_map(|i| first_month.checked_add_months(Months::new(i)))
            .map(|m| MonthlyForecast {
                year: m.year(),
                month: m.month(),
                confirmed: 0.0,
                estimated: 0.0,
                confirmed_target: 0.0,
                estimated_target: 0.0,
            })
            .collect();

        for timeline in timelines {
            let Some(next) = &timeline.next_event else {
                continue;
            };
            let income = next.amount_per_share * timeline.holding.quantity;
            let frequency = timeline.profile.frequency;

            let mut occurrence = Some(next.date);
            let mut is_first = true;
            while let Some(date) = occurrence {
                let Some(bucket) = month_index(first_month, date).and_then(|i| buckets.get_mut(i))
                else {
                    break;
                };
                if is_first && next.provenance != Provenance::Estimated {
                    bucket.confirmed += income;
                    bucket.confirmed_target += income * rate;
                } else {
                    bucket.estimated += income;
                    bucket.estimated_target += income * rate;
                }
                is_first = false;
                occurrence = frequency.advance(date);
            }
        }

        buckets
    }

    /// Expected income over the whole forecast (source currency).
    pub fn total(forecast: &[MonthlyForecast]) -> f64 {
        forecast.iter().map(|m| m.total()).sum()
    }
}

impl Default for ForecastService {
    fn default() -> Self {
        Self::new()
    }
}

/// Months between the first bucket and `date`, `None` if `date` is earlier.
fn month_index(first_month: NaiveDate, date: NaiveDate) -> Option<usize> {
    let months = (date.year() - first_month.year()) * 12 + date.month() as i32
        - first_month.month() as i32;
    usize::try_from(months).ok()
}

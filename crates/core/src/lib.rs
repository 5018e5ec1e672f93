pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::{Days, NaiveDate};
use models::{
    calendar::{CalendarEvent, DateWindow},
    forecast::WatchlistDividend,
    holding::HoldingPosition,
    profile::{DividendProfile, HoldingTimeline},
    record::ConfirmedCalendar,
    report::PortfolioDividendReport,
    settings::Settings,
};
use providers::registry::ProviderRegistry;
use serde_json::Value;
use services::{
    analytics_service::AnalyticsService, calendar_service::CalendarService,
    dividend_service::DividendService, forecast_service::ForecastService,
    income_service::IncomeService, normalization_service::NormalizationService,
    reconciliation_service::ReconciliationService,
};
use std::collections::HashMap;
use tracing::debug;

use errors::CoreError;

/// How far ahead the confirmed dividend calendar is requested.
const CONFIRMED_LOOKAHEAD_DAYS: u64 = 90;

/// Main entry point for the dividend-forecast core library.
///
/// Holds the configuration and all services. Every computation takes
/// `today` explicitly; only the fetch layer talks to the outside world.
#[must_use]
pub struct DividendForecaster {
    settings: Settings,
    normalization_service: NormalizationService,
    income_service: IncomeService,
    reconciliation_service: ReconciliationService,
    calendar_service: CalendarService,
    forecast_service: ForecastService,
    analytics_service: AnalyticsService,
    dividend_service: DividendService,
}

impl std::fmt::Debug for DividendForecaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DividendForecaster")
            .field("source_currency", &self.settings.source_currency)
            .field("display_currency", &self.settings.display_currency)
            .field("providers", &self.dividend_service.registry().len())
            .finish()
    }
}

impl DividendForecaster {
    /// Create a forecaster with the default feeds for the configured API keys.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let registry = ProviderRegistry::new_with_defaults(&settings.api_keys, settings.history_years);
        Self::with_registry(settings, registry)
    }

    /// Create a forecaster with a caller-supplied provider registry.
    pub fn with_registry(settings: Settings, registry: ProviderRegistry) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self {
            normalization_service: NormalizationService::with_aliases(
                settings.field_aliases.clone(),
            ),
            income_service: IncomeService::new(),
            reconciliation_service: ReconciliationService::new(),
            calendar_service: CalendarService::new(),
            forecast_service: ForecastService::new(),
            analytics_service: AnalyticsService::new(),
            dividend_service: DividendService::new(registry),
            settings,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Pure pipeline ───────────────────────────────────────────────

    /// Normalize, profile and reconcile every holding.
    ///
    /// `histories` maps symbols to raw feed rows; a missing symbol is an
    /// empty history. Holdings are validated first and duplicates of one
    /// symbol are merged into a single position.
    pub fn build_timelines(
        &self,
        holdings: &[HoldingPosition],
        histories: &HashMap<String, Vec<Value>>,
        confirmed: Option<&ConfirmedCalendar>,
        today: NaiveDate,
    ) -> Result<Vec<HoldingTimeline>, CoreError> {
        let positions = merge_positions(holdings)?;
        let histories: HashMap<String, &Vec<Value>> = histories
            .iter()
            .map(|(symbol, rows)| (symbol.trim().to_uppercase(), rows))
            .collect();

        Ok(positions
            .into_iter()
            .map(|holding| {
                let records = histories
                    .get(&holding.symbol)
                    .map(|rows| self.normalization_service.normalize(&holding.symbol, rows))
                    .unwrap_or_default();
                let profile = if records.is_empty() {
                    DividendProfile::empty(holding.symbol.clone())
                } else {
                    self.income_service.build_profile(&holding, &records, today)
                };
                let next_event = self.reconciliation_service.resolve(
                    &holding.symbol,
                    &records,
                    profile.frequency,
                    confirmed,
                    today,
                );
                HoldingTimeline {
                    holding,
                    records,
                    profile,
                    next_event,
                }
            })
            .collect())
    }

    /// Compute the full dividend report from already-fetched inputs.
    ///
    /// `confirmed_rows` are raw confirmed-calendar rows (`None` when the
    /// calendar feed is unavailable); `external_events` are earnings and
    /// split entries to show alongside dividends.
    #[allow(clippy::too_many_arguments)]
    pub fn build_report(
        &self,
        holdings: &[HoldingPosition],
        histories: &HashMap<String, Vec<Value>>,
        confirmed_rows: Option<&[Value]>,
        exchange_rate: f64,
        window: DateWindow,
        external_events: &[CalendarEvent],
        today: NaiveDate,
    ) -> Result<PortfolioDividendReport, CoreError> {
        let window = DateWindow::new(window.start, window.end)?;
        let confirmed = confirmed_rows.map(|rows| {
            ConfirmedCalendar::from_entries(self.normalization_service.normalize_confirmed(rows))
        });

        let timelines = self.build_timelines(holdings, histories, confirmed.as_ref(), today)?;

        let calendar = self.calendar_service.aggregate(
            &timelines,
            window,
            exchange_rate,
            self.settings.calendar.include_payment_history,
            external_events,
        );
        let forecast = self.forecast_service.monthly_forecast(
            &timelines,
            today,
            self.settings.calendar.forecast_months,
            exchange_rate,
        );
        let summary = self.analytics_service.summarize(
            &timelines,
            exchange_rate,
            &self.settings.display_currency,
            today,
        );

        debug!(
            holdings = timelines.len(),
            calendar_events = calendar.len(),
            "dividend report built"
        );

        Ok(PortfolioDividendReport {
            as_of_date: today,
            timelines,
            calendar,
            summary,
            forecast,
        })
    }

    // ── Fetch + compute ─────────────────────────────────────────────

    /// Fetch histories and the confirmed calendar, then build the report.
    ///
    /// Holdings are validated before any request goes out. Fetch failures
    /// only degrade the affected holdings.
    pub async fn load_report(
        &self,
        holdings: &[HoldingPosition],
        window: DateWindow,
        exchange_rate: f64,
        today: NaiveDate,
    ) -> Result<PortfolioDividendReport, CoreError> {
        let positions = merge_positions(holdings)?;
        let symbols: Vec<String> = positions.iter().map(|h| h.symbol.clone()).collect();

        let lookahead_end = today
            .checked_add_days(Days::new(CONFIRMED_LOOKAHEAD_DAYS))
            .unwrap_or(today);
        let (histories, confirmed_rows) = futures::join!(
            self.dividend_service.fetch_histories(&symbols),
            self.dividend_service.fetch_confirmed(today, lookahead_end.max(window.end)),
        );

        self.build_report(
            &positions,
            &histories,
            confirmed_rows.as_deref(),
            exchange_rate,
            window,
            &[],
            today,
        )
    }

    /// Dividend rows around `today` for a list of watched tickers, merged
    /// and sorted by ex-date. `prices` supplies current prices for yields.
    pub async fn load_watchlist_calendar(
        &self,
        tickers: &[String],
        prices: &HashMap<String, f64>,
        today: NaiveDate,
    ) -> Vec<WatchlistDividend> {
        let symbols: Vec<String> = tickers
            .iter()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        if symbols.is_empty() {
            return Vec::new();
        }

        let histories = self.dividend_service.fetch_histories(&symbols).await;
        self.watchlist_calendar(&symbols, &histories, prices, today)
    }

    /// Pure half of `load_watchlist_calendar`.
    pub fn watchlist_calendar(
        &self,
        symbols: &[String],
        histories: &HashMap<String, Vec<Value>>,
        prices: &HashMap<String, f64>,
        today: NaiveDate,
    ) -> Vec<WatchlistDividend> {
        let mut entries: Vec<WatchlistDividend> = symbols
            .iter()
            .flat_map(|symbol| {
                let symbol = symbol.trim().to_uppercase();
                let records = histories
                    .get(&symbol)
                    .map(|rows| self.normalization_service.normalize(&symbol, rows))
                    .unwrap_or_default();
                self.calendar_service.watchlist_entries(
                    &records,
                    prices.get(&symbol).copied(),
                    today,
                    self.settings.calendar.watchlist_window_days,
                )
            })
            .collect();
        entries.sort_by(|a, b| a.ex_date.cmp(&b.ex_date).then_with(|| a.symbol.cmp(&b.symbol)));
        entries
    }
}

/// Validate positions and merge repeated symbols (e.g. the same stock in
/// two depots) by summing quantities. First occurrence keeps its name and
/// price and its place in the order.
fn merge_positions(holdings: &[HoldingPosition]) -> Result<Vec<HoldingPosition>, CoreError> {
    let mut merged: Vec<HoldingPosition> = Vec::with_capacity(holdings.len());
    for holding in holdings {
        holding.validate()?;
        let symbol = holding.symbol.trim().to_uppercase();
        match merged.iter_mut().find(|h| h.symbol == symbol) {
            Some(existing) => {
                debug!(symbol = %symbol, "merging duplicate position");
                existing.quantity += holding.quantity;
            }
            None => merged.push(HoldingPosition {
                symbol,
                ..holding.clone()
            }),
        }
    }
    Ok(merged)
}

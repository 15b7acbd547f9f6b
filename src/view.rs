// 🖥️ View Controller
// Selected year + loading flag, and the numbers derived for them

use crate::aggregation::{round2, GrowthRate};
use crate::config::DashboardConfig;
use crate::engine::{SalesEngine, TimelinePoint, YearView};
use crate::error::{DashboardError, Result};
use crate::fiscal::FiscalYear;
use crate::loading::{LoadingTicket, LoadingTimer};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

/// Currency symbol and unit used for every monetary value
pub const CURRENCY_SYMBOL: &str = "₹";
pub const UNIT_SUFFIX: &str = "L";

/// "₹591.24 L"
pub fn format_lakhs(value: f64) -> String {
    format!("{}{:.2} {}", CURRENCY_SYMBOL, round2(value), UNIT_SUFFIX)
}

/// "₹591.24L", for chart labels and badges
pub fn format_lakhs_compact(value: f64) -> String {
    format!("{}{:.2}{}", CURRENCY_SYMBOL, round2(value), UNIT_SUFFIX)
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Growing,
    Declining,
    NoBaseline,
}

impl Trend {
    pub fn from_growth(growth: GrowthRate) -> Self {
        match growth {
            GrowthRate::Percent(p) if p > 0.0 => Trend::Growing,
            GrowthRate::Percent(_) => Trend::Declining,
            GrowthRate::Unavailable => Trend::NoBaseline,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Growing => "Growing",
            Trend::Declining => "Declining",
            Trend::NoBaseline => "No baseline",
        }
    }
}

/// The three metric cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub fiscal_year: FiscalYear,
    pub is_forecast: bool,

    /// Rounded to 2 decimals
    pub annual_total: f64,

    /// Annual total / 4, rounded to 2 decimals
    pub average_quarterly: f64,

    pub growth: GrowthRate,
    pub trend: Trend,
}

impl DashboardSummary {
    pub fn status(&self) -> &'static str {
        if self.is_forecast {
            "Forecasted"
        } else {
            "Actual"
        }
    }
}

// ============================================================================
// STATE
// ============================================================================

/// One dashboard session: the selection and its loading flag.
///
/// Only `select*` and the timer methods mutate state; every displayed number
/// is derived from the engine when asked for.
#[derive(Debug, Clone)]
pub struct DashboardState {
    engine: SalesEngine,
    selected: FiscalYear,
    loading: LoadingTimer,
}

impl DashboardState {
    /// Opens on `config.initial_year`, loading as after any selection
    pub fn new(engine: SalesEngine, config: &DashboardConfig, now: Instant) -> Result<Self> {
        config.validate(engine.timeline())?;

        let mut loading = LoadingTimer::new(config.loading_delay);
        loading.start(now);

        Ok(DashboardState {
            engine,
            selected: config.initial_year,
            loading,
        })
    }

    pub fn engine(&self) -> &SalesEngine {
        &self.engine
    }

    pub fn selected(&self) -> FiscalYear {
        self.selected
    }

    /// Index of the selection on the timeline
    pub fn selected_index(&self) -> usize {
        self.engine.timeline().position(self.selected).unwrap_or(0)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn is_forecast(&self) -> bool {
        self.engine.is_forecast(self.selected)
    }

    /// Change the selection. Re-selecting the current year is a no-op and
    /// returns `None`; otherwise loading restarts and its ticket is returned.
    pub fn select(&mut self, year: FiscalYear, now: Instant) -> Result<Option<LoadingTicket>> {
        if !self.engine.timeline().contains(year) {
            return Err(DashboardError::UnknownFiscalYear(year.to_string()));
        }
        if year == self.selected {
            return Ok(None);
        }

        debug!("Selected {} (was {})", year, self.selected);
        self.selected = year;
        Ok(Some(self.loading.start(now)))
    }

    pub fn select_index(&mut self, index: usize, now: Instant) -> Result<Option<LoadingTicket>> {
        let year = self
            .engine
            .timeline()
            .years()
            .get(index)
            .copied()
            .ok_or_else(|| DashboardError::UnknownFiscalYear(format!("#{}", index)))?;
        self.select(year, now)
    }

    /// Move one year later, stopping at the end of the timeline
    pub fn select_next(&mut self, now: Instant) -> Result<Option<LoadingTicket>> {
        let last = self.engine.timeline().len() - 1;
        let index = (self.selected_index() + 1).min(last);
        self.select_index(index, now)
    }

    /// Move one year earlier, stopping at the start
    pub fn select_previous(&mut self, now: Instant) -> Result<Option<LoadingTicket>> {
        let index = self.selected_index().saturating_sub(1);
        self.select_index(index, now)
    }

    pub fn select_first(&mut self, now: Instant) -> Result<Option<LoadingTicket>> {
        self.select_index(0, now)
    }

    pub fn select_last(&mut self, now: Instant) -> Result<Option<LoadingTicket>> {
        let last = self.engine.timeline().len() - 1;
        self.select_index(last, now)
    }

    /// Timer callback for a specific selection
    pub fn finish_loading(&mut self, ticket: LoadingTicket, now: Instant) -> bool {
        self.loading.fire(ticket, now)
    }

    /// Event-loop tick
    pub fn tick(&mut self, now: Instant) -> bool {
        self.loading.poll(now)
    }

    pub fn current_view(&self) -> Result<YearView> {
        self.engine.year_view(self.selected)
    }

    pub fn timeline_series(&self) -> Result<Vec<TimelinePoint>> {
        self.engine.timeline_series()
    }

    pub fn growth_for_selection(&self) -> Result<GrowthRate> {
        self.engine.growth_for(self.selected)
    }

    pub fn summary(&self) -> Result<DashboardSummary> {
        let view = self.current_view()?;
        let growth = self.growth_for_selection()?;

        Ok(DashboardSummary {
            fiscal_year: self.selected,
            is_forecast: view.is_forecast,
            annual_total: round2(view.yearly_total),
            average_quarterly: round2(view.yearly_total / 4.0),
            growth,
            trend: Trend::from_growth(growth),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SalesDataset;
    use std::time::Duration;

    fn fy(label: &str) -> FiscalYear {
        label.parse().unwrap()
    }

    fn state(now: Instant) -> DashboardState {
        let engine = SalesEngine::new(SalesDataset::embedded().unwrap()).unwrap();
        DashboardState::new(engine, &DashboardConfig::default(), now).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let t0 = Instant::now();
        let mut s = state(t0);
        assert_eq!(s.selected(), fy("FY2024-25"));
        assert!(s.is_loading());
        assert!(!s.is_forecast());

        assert!(s.tick(t0 + Duration::from_millis(600)));
        assert!(!s.is_loading());
    }

    #[test]
    fn test_rejects_unknown_initial_year() {
        let engine = SalesEngine::new(SalesDataset::embedded().unwrap()).unwrap();
        let config = DashboardConfig {
            initial_year: fy("FY2001-02"),
            ..DashboardConfig::default()
        };
        assert!(DashboardState::new(engine, &config, Instant::now()).is_err());
    }

    #[test]
    fn test_summary_historical() {
        let s = state(Instant::now());
        let summary = s.summary().unwrap();
        assert_eq!(summary.annual_total, 570.67);
        assert_eq!(summary.average_quarterly, 142.67);
        assert_eq!(summary.growth.to_string(), "3.5");
        assert_eq!(summary.trend, Trend::Growing);
        assert_eq!(summary.status(), "Actual");
    }

    #[test]
    fn test_select_forecast_year() {
        let t0 = Instant::now();
        let mut s = state(t0);
        s.tick(t0 + Duration::from_secs(1));

        let ticket = s.select(fy("FY2026-27"), t0 + Duration::from_secs(2)).unwrap();
        assert!(ticket.is_some());
        assert!(s.is_loading());
        assert!(s.is_forecast());

        let view = s.current_view().unwrap();
        assert!(view.is_forecast);
        assert_eq!(view.monthly[0].sales, 40.82);

        let summary = s.summary().unwrap();
        assert_eq!(summary.annual_total, 612.56);
        assert_eq!(summary.status(), "Forecasted");
        assert_eq!(summary.growth.to_string(), "3.6");
    }

    #[test]
    fn test_first_year_growth_is_neutral() {
        let mut s = state(Instant::now());
        s.select_first(Instant::now()).unwrap();
        assert_eq!(s.selected(), fy("FY2023-24"));
        assert_eq!(s.growth_for_selection().unwrap().to_string(), "0.0");
        assert_eq!(s.summary().unwrap().trend, Trend::Declining);
    }

    #[test]
    fn test_select_unknown_year() {
        let mut s = state(Instant::now());
        assert!(matches!(
            s.select(fy("FY2050-51"), Instant::now()),
            Err(DashboardError::UnknownFiscalYear(_))
        ));
        assert_eq!(s.selected(), fy("FY2024-25"));
    }

    #[test]
    fn test_reselect_is_noop() {
        let t0 = Instant::now();
        let mut s = state(t0);
        s.tick(t0 + Duration::from_secs(1));
        assert_eq!(s.select(fy("FY2024-25"), t0 + Duration::from_secs(2)).unwrap(), None);
        assert!(!s.is_loading());
    }

    #[test]
    fn test_rapid_selection_keeps_latest_loading() {
        let t0 = Instant::now();
        let mut s = state(t0);
        let delay = Duration::from_millis(600);

        let a = s.select(fy("FY2025-26"), t0).unwrap().unwrap();
        let b = s.select(fy("FY2026-27"), t0 + Duration::from_millis(200)).unwrap().unwrap();
        let c = s.select(fy("FY2027-28"), t0 + Duration::from_millis(400)).unwrap().unwrap();

        assert!(!s.finish_loading(a, t0 + delay));
        assert!(!s.finish_loading(b, t0 + Duration::from_millis(800)));
        assert!(s.is_loading());

        assert!(s.finish_loading(c, t0 + Duration::from_millis(1000)));
        assert!(!s.is_loading());
        assert_eq!(s.selected(), fy("FY2027-28"));
    }

    #[test]
    fn test_navigation_clamps() {
        let now = Instant::now();
        let mut s = state(now);

        s.select_last(now).unwrap();
        assert_eq!(s.selected(), fy("FY2035-36"));
        assert_eq!(s.select_next(now).unwrap(), None);
        assert_eq!(s.selected(), fy("FY2035-36"));

        s.select_first(now).unwrap();
        assert_eq!(s.select_previous(now).unwrap(), None);
        s.select_next(now).unwrap();
        assert_eq!(s.selected(), fy("FY2024-25"));
        assert_eq!(s.selected_index(), 1);
    }

    #[test]
    fn test_format_lakhs() {
        assert_eq!(format_lakhs(591.2400000001), "₹591.24 L");
        assert_eq!(format_lakhs(142.6675), "₹142.67 L");
        assert_eq!(format_lakhs_compact(40.8), "₹40.80L");
    }
}

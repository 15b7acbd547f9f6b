// ⚙️ Sales Engine
// Derives every displayed number from the immutable dataset, on demand

use crate::aggregation::{growth_rate, quarterly, round2, yearly_total, GrowthRate, QuarterSales};
use crate::dataset::{MonthSales, SalesDataset};
use crate::error::{DashboardError, Result};
use crate::fiscal::FiscalYear;
use crate::forecast::Forecaster;
use crate::timeline::Timeline;
use serde::Serialize;

// ============================================================================
// DERIVED VIEWS
// ============================================================================

/// Everything the dashboard shows for one fiscal year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearView {
    pub fiscal_year: FiscalYear,
    pub monthly: Vec<MonthSales>,

    /// Unrounded sum of `monthly`
    pub yearly_total: f64,

    pub quarterly: [QuarterSales; 4],
    pub is_forecast: bool,
}

/// One point on the year-over-year chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// Label without the "FY" prefix, e.g. "2025-26"
    pub year: String,

    /// Yearly total rounded to 2 decimals
    #[serde(rename = "sales")]
    pub yearly_total: f64,

    pub is_forecast: bool,
}

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct SalesEngine {
    dataset: SalesDataset,
    timeline: Timeline,
    forecaster: Forecaster,
}

impl SalesEngine {
    pub fn new(dataset: SalesDataset) -> Result<Self> {
        let forecaster = Forecaster::from_dataset(&dataset)?;
        let timeline = Timeline::build(&dataset);

        Ok(SalesEngine {
            dataset,
            timeline,
            forecaster,
        })
    }

    pub fn dataset(&self) -> &SalesDataset {
        &self.dataset
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn forecaster(&self) -> &Forecaster {
        &self.forecaster
    }

    pub fn is_forecast(&self, year: FiscalYear) -> bool {
        !self.dataset.contains(year)
    }

    /// Stored months for historical years, extrapolated ones otherwise
    fn monthly_for(&self, year: FiscalYear) -> Result<Vec<MonthSales>> {
        if let Some(historical) = self.dataset.find(year) {
            return Ok(historical.monthly.clone());
        }

        let years_ahead = self
            .timeline
            .years_ahead(year)
            .ok_or_else(|| DashboardError::UnknownFiscalYear(year.to_string()))?;
        self.forecaster.predict_monthly(years_ahead)
    }

    pub fn year_view(&self, year: FiscalYear) -> Result<YearView> {
        let monthly = self.monthly_for(year)?;

        Ok(YearView {
            fiscal_year: year,
            yearly_total: yearly_total(&monthly),
            quarterly: quarterly(&monthly),
            is_forecast: self.is_forecast(year),
            monthly,
        })
    }

    /// Yearly totals for the whole timeline, recomputed on every call
    pub fn timeline_series(&self) -> Result<Vec<TimelinePoint>> {
        self.timeline
            .years()
            .iter()
            .map(|year| {
                let monthly = self.monthly_for(*year)?;
                Ok(TimelinePoint {
                    year: year.short(),
                    yearly_total: round2(yearly_total(&monthly)),
                    is_forecast: self.is_forecast(*year),
                })
            })
            .collect()
    }

    /// Growth against the preceding timeline entry; 0.0 for the first one
    pub fn growth_for(&self, year: FiscalYear) -> Result<GrowthRate> {
        let index = self
            .timeline
            .position(year)
            .ok_or_else(|| DashboardError::UnknownFiscalYear(year.to_string()))?;

        if index == 0 {
            return Ok(GrowthRate::Percent(0.0));
        }

        let series = self.timeline_series()?;
        Ok(growth_rate(
            series[index].yearly_total,
            series[index - 1].yearly_total,
        ))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Month;
    use crate::timeline::FORECAST_HORIZON;

    fn fy(label: &str) -> FiscalYear {
        label.parse().unwrap()
    }

    fn engine() -> SalesEngine {
        SalesEngine::new(SalesDataset::embedded().unwrap()).unwrap()
    }

    #[test]
    fn test_historical_year_view() {
        let view = engine().year_view(fy("FY2024-25")).unwrap();
        assert!(!view.is_forecast);
        assert_eq!(view.monthly.len(), 12);
        assert_eq!(view.monthly[0], MonthSales::new(Month::Apr, 38.71));
        assert_eq!(round2(view.yearly_total), 570.67);
        assert_eq!(view.quarterly[1].sales, 147.11);
    }

    #[test]
    fn test_forecast_year_view() {
        let e = engine();
        let view = e.year_view(fy("FY2026-27")).unwrap();
        assert!(view.is_forecast);
        assert_eq!(view.monthly[0].sales, round2(39.4 * (1.0 + e.forecaster().growth_ratio())));
        assert_eq!(view.monthly, e.forecaster().predict_monthly(1).unwrap());
        assert_eq!(round2(view.yearly_total), 612.56);
    }

    #[test]
    fn test_unknown_year() {
        let e = engine();
        assert!(matches!(
            e.year_view(fy("FY2040-41")),
            Err(DashboardError::UnknownFiscalYear(_))
        ));
        assert!(matches!(
            e.growth_for(fy("FY2019-20")),
            Err(DashboardError::UnknownFiscalYear(_))
        ));
    }

    #[test]
    fn test_timeline_series() {
        let series = engine().timeline_series().unwrap();
        assert_eq!(series.len(), 3 + FORECAST_HORIZON);

        let totals: Vec<f64> = series.iter().map(|p| p.yearly_total).collect();
        assert_eq!(
            totals,
            vec![
                551.23, 570.67, 591.24, 612.56, 634.61, 657.52, 681.22, 705.75, 731.19, 757.55,
                784.86, 813.15, 842.47
            ]
        );

        assert_eq!(series[0].year, "2023-24");
        assert!(!series[2].is_forecast);
        assert!(series[3].is_forecast);
        assert_eq!(series[3].year, "2026-27");
    }

    #[test]
    fn test_growth_for() {
        let e = engine();
        assert_eq!(e.growth_for(fy("FY2023-24")).unwrap().to_string(), "0.0");
        assert_eq!(e.growth_for(fy("FY2024-25")).unwrap(), GrowthRate::Percent(3.5));
        assert_eq!(e.growth_for(fy("FY2025-26")).unwrap(), GrowthRate::Percent(3.6));
        assert_eq!(e.growth_for(fy("FY2026-27")).unwrap(), GrowthRate::Percent(3.6));
    }

    #[test]
    fn test_derivation_leaves_dataset_untouched() {
        let e = engine();
        let before = e.dataset().years().to_vec();
        for year in e.timeline().years() {
            e.year_view(*year).unwrap();
        }
        e.timeline_series().unwrap();
        assert_eq!(e.dataset().years(), before.as_slice());
    }
}

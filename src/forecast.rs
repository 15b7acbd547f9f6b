// 🔮 Forecast Generator
// Compounds the latest year-over-year growth forward from the last historical year

use crate::aggregation::{round2, yearly_total};
use crate::dataset::{MonthSales, SalesDataset};
use crate::error::{DashboardError, Result};
use crate::fiscal::FiscalYear;
use tracing::{debug, trace};

/// Extrapolates future fiscal years from a single fixed growth ratio.
///
/// The ratio comes from the two most recent historical years and is
/// computed once. Every forecast year scales the last historical year by
/// `(1 + ratio)^years_ahead`; forecasts never build on other forecasts.
#[derive(Debug, Clone)]
pub struct Forecaster {
    base_year: FiscalYear,
    base_monthly: Vec<MonthSales>,
    growth_ratio: f64,
}

impl Forecaster {
    pub fn from_dataset(dataset: &SalesDataset) -> Result<Self> {
        if dataset.len() < 2 {
            return Err(DashboardError::InsufficientHistory { found: dataset.len() });
        }

        let last = dataset.last();
        let previous = dataset.second_last();

        let last_total = yearly_total(&last.monthly);
        let previous_total = yearly_total(&previous.monthly);

        if previous_total == 0.0 {
            return Err(DashboardError::ZeroBaseline {
                fiscal_year: previous.fiscal_year.to_string(),
                total: previous_total,
            });
        }

        let growth_ratio = (last_total - previous_total) / previous_total;
        debug!(
            "Growth ratio {:.6} from {} → {}",
            growth_ratio, previous.fiscal_year, last.fiscal_year
        );

        Ok(Forecaster {
            base_year: last.fiscal_year,
            base_monthly: last.monthly.clone(),
            growth_ratio,
        })
    }

    /// Fractional change between the two latest historical totals
    pub fn growth_ratio(&self) -> f64 {
        self.growth_ratio
    }

    /// Last historical year; forecasts are offsets from it
    pub fn base_year(&self) -> FiscalYear {
        self.base_year
    }

    /// Predicted months for the year `years_ahead` after the base year
    pub fn predict_monthly(&self, years_ahead: usize) -> Result<Vec<MonthSales>> {
        if years_ahead == 0 {
            return Err(DashboardError::InvalidForecastOffset(years_ahead));
        }

        let factor = (1.0 + self.growth_ratio).powf(years_ahead as f64);
        trace!("Forecast +{} years, factor {}", years_ahead, factor);

        Ok(self
            .base_monthly
            .iter()
            .map(|m| MonthSales::new(m.month, round2(m.sales * factor)))
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================

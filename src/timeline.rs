// 🗓️ Timeline
// Historical fiscal years followed by a fixed run of forecast years

use crate::dataset::SalesDataset;
use crate::fiscal::FiscalYear;

/// Number of forecast years appended after the last historical year
pub const FORECAST_HORIZON: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    years: Vec<FiscalYear>,
    historical_count: usize,
}

impl Timeline {
    /// Historical labels in stored order, then `FORECAST_HORIZON`
    /// contiguous years starting right after the last one.
    pub fn build(dataset: &SalesDataset) -> Self {
        let mut years: Vec<FiscalYear> = dataset.years().iter().map(|y| y.fiscal_year).collect();
        let last = dataset.last().fiscal_year;

        years.extend((1..=FORECAST_HORIZON as u16).map(|i| last.offset(i)));

        Timeline {
            years,
            historical_count: dataset.len(),
        }
    }

    pub fn years(&self) -> &[FiscalYear] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn historical_count(&self) -> usize {
        self.historical_count
    }

    pub fn historical_years(&self) -> &[FiscalYear] {
        &self.years[..self.historical_count]
    }

    pub fn forecast_years(&self) -> &[FiscalYear] {
        &self.years[self.historical_count..]
    }

    pub fn position(&self, year: FiscalYear) -> Option<usize> {
        self.years.iter().position(|y| *y == year)
    }

    pub fn contains(&self, year: FiscalYear) -> bool {
        self.position(year).is_some()
    }

    /// True for anything that is not a historical year
    pub fn is_forecast(&self, year: FiscalYear) -> bool {
        !self.historical_years().contains(&year)
    }

    /// Offset from the last historical year; `None` for historical or
    /// off-timeline years
    pub fn years_ahead(&self, year: FiscalYear) -> Option<usize> {
        let index = self.position(year)?;
        let last_historical = self.historical_count - 1;
        if index > last_historical {
            Some(index - last_historical)
        } else {
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fy(label: &str) -> FiscalYear {
        label.parse().unwrap()
    }

    fn timeline() -> Timeline {
        Timeline::build(&SalesDataset::embedded().unwrap())
    }

    #[test]
    fn test_length_and_historical_prefix() {
        let t = timeline();
        assert_eq!(t.len(), 3 + FORECAST_HORIZON);
        assert_eq!(t.historical_count(), 3);

        let labels: Vec<String> = t.historical_years().iter().map(|y| y.to_string()).collect();
        assert_eq!(labels, vec!["FY2023-24", "FY2024-25", "FY2025-26"]);
    }

    #[test]
    fn test_forecast_years_are_contiguous() {
        let t = timeline();
        let forecast: Vec<String> = t.forecast_years().iter().map(|y| y.to_string()).collect();
        assert_eq!(forecast.len(), FORECAST_HORIZON);
        assert_eq!(forecast[0], "FY2026-27");
        assert_eq!(forecast[9], "FY2035-36");

        for pair in t.years().windows(2) {
            assert_eq!(pair[1], pair[0].next());
        }
    }

    #[test]
    fn test_is_forecast() {
        let t = timeline();
        assert!(!t.is_forecast(fy("FY2023-24")));
        assert!(!t.is_forecast(fy("FY2025-26")));
        assert!(t.is_forecast(fy("FY2026-27")));
        // absent from the history, so predicted even though off the timeline
        assert!(t.is_forecast(fy("FY2040-41")));
    }

    #[test]
    fn test_years_ahead() {
        let t = timeline();
        assert_eq!(t.years_ahead(fy("FY2025-26")), None);
        assert_eq!(t.years_ahead(fy("FY2026-27")), Some(1));
        assert_eq!(t.years_ahead(fy("FY2030-31")), Some(5));
        assert_eq!(t.years_ahead(fy("FY2035-36")), Some(10));
        assert_eq!(t.years_ahead(fy("FY2036-37")), None);
    }

    #[test]
    fn test_position() {
        let t = timeline();
        assert_eq!(t.position(fy("FY2023-24")), Some(0));
        assert_eq!(t.position(fy("FY2026-27")), Some(3));
        assert!(!t.contains(fy("FY2022-23")));
    }
}

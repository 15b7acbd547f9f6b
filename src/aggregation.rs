// ➕ Sales Aggregation
// Months → quarters → years, plus year-over-year growth

use crate::dataset::{Month, MonthSales};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

// ============================================================================
// ROUNDING
// ============================================================================

/// Round to `places` decimals, ties away from zero.
///
/// Works on the exact binary value of `value`, so `1.005` (stored as
/// 1.00499999...) rounds down to `1.0`, matching what a fixed-point
/// formatter prints. The result is the `f64` nearest to the rounded text.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    let decimal = match Decimal::from_f64_retain(value) {
        Some(d) => d,
        None => return value,
    };

    let rounded = decimal
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
        .parse::<f64>()
        .unwrap_or(value);

    // no negative zero
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub fn round2(value: f64) -> f64 {
    round_half_up(value, 2)
}

// ============================================================================
// QUARTERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Fiscal quarter membership is fixed: Q1 starts in April
    pub fn months(&self) -> [Month; 3] {
        match self {
            Quarter::Q1 => [Month::Apr, Month::May, Month::Jun],
            Quarter::Q2 => [Month::Jul, Month::Aug, Month::Sep],
            Quarter::Q3 => [Month::Oct, Month::Nov, Month::Dec],
            Quarter::Q4 => [Month::Jan, Month::Feb, Month::Mar],
        }
    }

    /// Stable chart tag for this quarter's slice
    pub fn tag(&self) -> &'static str {
        match self {
            Quarter::Q1 => "chart-1",
            Quarter::Q2 => "chart-2",
            Quarter::Q3 => "chart-3",
            Quarter::Q4 => "chart-4",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuarterSales {
    pub quarter: Quarter,

    /// Sum of the quarter's months, rounded to 2 decimals
    pub sales: f64,

    pub tag: &'static str,
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// Sum of all monthly sales, unrounded
pub fn yearly_total(monthly: &[MonthSales]) -> f64 {
    monthly.iter().fold(0.0, |sum, m| sum + m.sales)
}

/// Q1..Q4 breakdown; independent of the order months are given in
pub fn quarterly(monthly: &[MonthSales]) -> [QuarterSales; 4] {
    Quarter::ALL.map(|quarter| {
        let months = quarter.months();
        let sum = monthly
            .iter()
            .filter(|m| months.contains(&m.month))
            .fold(0.0, |sum, m| sum + m.sales);

        QuarterSales {
            quarter,
            sales: round2(sum),
            tag: quarter.tag(),
        }
    })
}

// ============================================================================
// GROWTH
// ============================================================================

/// Year-over-year growth as displayed on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthRate {
    /// Percentage rounded to 1 decimal
    Percent(f64),

    /// Previous total was zero, negative or not a number
    Unavailable,
}

impl GrowthRate {
    pub fn percent(&self) -> Option<f64> {
        match self {
            GrowthRate::Percent(p) => Some(*p),
            GrowthRate::Unavailable => None,
        }
    }

    pub fn is_growing(&self) -> bool {
        matches!(self, GrowthRate::Percent(p) if *p > 0.0)
    }
}

impl fmt::Display for GrowthRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthRate::Percent(p) => write!(f, "{:.1}", p),
            GrowthRate::Unavailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for GrowthRate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `(current - previous) / previous * 100`, to 1 decimal
pub fn growth_rate(current: f64, previous: f64) -> GrowthRate {
    if !previous.is_finite() || previous <= 0.0 || !current.is_finite() {
        return GrowthRate::Unavailable;
    }

    GrowthRate::Percent(round_half_up((current - previous) / previous * 100.0, 1))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::SalesDataset;

    fn months(values: [f64; 12]) -> Vec<MonthSales> {
        Month::ALL
            .iter()
            .zip(values)
            .map(|(m, v)| MonthSales::new(*m, v))
            .collect()
    }

    #[test]
    fn test_round_half_up_ties_go_up() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(2.675), 2.67); // stored as 2.67499999...
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round_half_up(0.25, 1), 0.3);
        assert_eq!(round_half_up(-0.25, 1), -0.3);
    }

    #[test]
    fn test_round_half_up_no_negative_zero() {
        let r = round_half_up(-0.04, 1);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive());
    }

    #[test]
    fn test_yearly_total_unrounded() {
        let dataset = SalesDataset::embedded().unwrap();
        let totals: Vec<f64> = dataset.years().iter().map(|y| round2(yearly_total(&y.monthly))).collect();
        assert_eq!(totals, vec![551.23, 570.67, 591.24]);
    }

    #[test]
    fn test_quarterly_embedded_values() {
        let dataset = SalesDataset::embedded().unwrap();
        let q = quarterly(&dataset.last().monthly);
        let sales: Vec<f64> = q.iter().map(|q| q.sales).collect();
        assert_eq!(sales, vec![131.15, 152.98, 160.15, 146.96]);
        assert_eq!(q[0].tag, "chart-1");
        assert_eq!(q[3].tag, "chart-4");
    }

    #[test]
    fn test_quarters_sum_to_yearly_total() {
        let dataset = SalesDataset::embedded().unwrap();
        for year in dataset.years() {
            let sum: f64 = quarterly(&year.monthly).iter().map(|q| q.sales).sum();
            let total = round2(yearly_total(&year.monthly));
            assert!(
                (sum - total).abs() <= 0.01 + 1e-9,
                "{}: quarters {} vs total {}",
                year.fiscal_year,
                sum,
                total
            );
        }
    }

    #[test]
    fn test_quarterly_ignores_month_order() {
        let ordered = months([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let mut shuffled = ordered.clone();
        shuffled.reverse();
        shuffled.swap(0, 5);

        let a = quarterly(&ordered);
        let b = quarterly(&shuffled);
        assert_eq!(a, b);

        let order: Vec<Quarter> = b.iter().map(|q| q.quarter).collect();
        assert_eq!(order, Quarter::ALL.to_vec());
        assert_eq!(a[0].sales, 6.0);
        assert_eq!(a[3].sales, 33.0);
    }

    #[test]
    fn test_quarterly_always_four_entries() {
        let q = quarterly(&[]);
        assert_eq!(q.len(), 4);
        assert!(q.iter().all(|q| q.sales == 0.0));
    }

    #[test]
    fn test_growth_rate() {
        assert_eq!(growth_rate(570.67, 551.23), GrowthRate::Percent(3.5));
        assert_eq!(growth_rate(591.24, 570.67), GrowthRate::Percent(3.6));
        assert_eq!(growth_rate(90.0, 100.0), GrowthRate::Percent(-10.0));
        assert_eq!(growth_rate(591.24, 570.67).to_string(), "3.6");
        assert_eq!(growth_rate(100.0, 100.0).to_string(), "0.0");
    }

    #[test]
    fn test_growth_rate_zero_baseline() {
        assert_eq!(growth_rate(10.0, 0.0), GrowthRate::Unavailable);
        assert_eq!(growth_rate(10.0, -5.0), GrowthRate::Unavailable);
        assert_eq!(growth_rate(10.0, f64::NAN), GrowthRate::Unavailable);
        assert_eq!(GrowthRate::Unavailable.to_string(), "N/A");
        assert!(!GrowthRate::Unavailable.is_growing());
    }
}

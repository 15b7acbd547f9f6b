// 📦 Historical Sales Dataset
// Monthly sales per fiscal year, in lakhs. Loaded once, never mutated.

use crate::error::{DashboardError, Result};
use crate::fiscal::FiscalYear;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Seed data compiled into the binary
const EMBEDDED_SALES: &str = include_str!("../data/sales.json");

// ============================================================================
// MONTHS
// ============================================================================

/// Calendar month, ordered the way a fiscal year runs (April first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
    Jan,
    Feb,
    Mar,
}

impl Month {
    /// All twelve months in fiscal order
    pub const ALL: [Month; 12] = [
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
        Month::Jan,
        Month::Feb,
        Month::Mar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthSales {
    pub month: Month,

    /// Sales in lakhs
    pub sales: f64,
}

impl MonthSales {
    pub fn new(month: Month, sales: f64) -> Self {
        MonthSales { month, sales }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalYear {
    #[serde(rename = "Financial_Year")]
    pub fiscal_year: FiscalYear,

    /// Twelve months, April first
    pub monthly: Vec<MonthSales>,
}

impl HistoricalYear {
    /// Checks that every month appears exactly once with a usable value
    fn validate(&self) -> Result<()> {
        let label = self.fiscal_year.to_string();

        if self.monthly.len() != Month::ALL.len() {
            return Err(DashboardError::InvalidMonths {
                fiscal_year: label,
                reason: format!("expected 12 months, found {}", self.monthly.len()),
            });
        }

        for month in Month::ALL {
            let count = self.monthly.iter().filter(|m| m.month == month).count();
            if count != 1 {
                return Err(DashboardError::InvalidMonths {
                    fiscal_year: label,
                    reason: format!("{} appears {} times", month, count),
                });
            }
        }

        if let Some(bad) = self
            .monthly
            .iter()
            .find(|m| !m.sales.is_finite() || m.sales < 0.0)
        {
            return Err(DashboardError::InvalidSales {
                fiscal_year: label,
                month: bad.month.to_string(),
                value: bad.sales,
            });
        }

        Ok(())
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// Immutable, chronologically ordered historical years.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    years: Vec<HistoricalYear>,
}

impl SalesDataset {
    /// Dataset shipped with the crate
    pub fn embedded() -> Result<Self> {
        SalesDataset::from_json(EMBEDDED_SALES)
    }

    /// Load an alternate dataset from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DashboardError::DatasetIo {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loading sales dataset from {:?}", path);
        SalesDataset::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let years: Vec<HistoricalYear> = serde_json::from_str(content)?;
        SalesDataset::from_years(years)
    }

    pub fn from_years(years: Vec<HistoricalYear>) -> Result<Self> {
        if years.len() < 2 {
            return Err(DashboardError::InsufficientHistory { found: years.len() });
        }

        for year in &years {
            year.validate()?;
        }

        for pair in years.windows(2) {
            if pair[1].fiscal_year != pair[0].fiscal_year.next() {
                return Err(DashboardError::NonContiguousHistory {
                    previous: pair[0].fiscal_year.to_string(),
                    found: pair[1].fiscal_year.to_string(),
                });
            }
        }

        debug!(
            "Dataset covers {} .. {}",
            years[0].fiscal_year,
            years[years.len() - 1].fiscal_year
        );
        info!("✓ Loaded {} historical fiscal years", years.len());

        Ok(SalesDataset { years })
    }

    pub fn years(&self) -> &[HistoricalYear] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn find(&self, fiscal_year: FiscalYear) -> Option<&HistoricalYear> {
        self.years.iter().find(|y| y.fiscal_year == fiscal_year)
    }

    pub fn contains(&self, fiscal_year: FiscalYear) -> bool {
        self.find(fiscal_year).is_some()
    }

    /// Most recent historical year (validated non-empty at construction)
    pub fn last(&self) -> &HistoricalYear {
        &self.years[self.years.len() - 1]
    }

    pub fn second_last(&self) -> &HistoricalYear {
        &self.years[self.years.len() - 2]
    }
}

// ============================================================================
// TESTS
// ============================================================================

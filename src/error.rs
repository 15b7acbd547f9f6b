// ⚠️ Dashboard Errors
// Every failure the engine and view layer can report

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the sales engine, dataset loading and view state.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Label does not match `FY<start>-<end>`.
    #[error("Invalid fiscal year label '{label}': {reason}")]
    InvalidFiscalYear {
        /// The offending label.
        label: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Label is neither historical nor part of the forecast timeline.
    #[error("Fiscal year '{0}' is not on the timeline")]
    UnknownFiscalYear(String),

    /// Forecasting needs the two most recent historical years.
    #[error("At least 2 historical years are required, found {found}")]
    InsufficientHistory {
        /// Number of historical years in the dataset.
        found: usize,
    },

    /// A historical year is missing months or repeats one.
    #[error("Fiscal year {fiscal_year} must contain each month exactly once: {reason}")]
    InvalidMonths {
        /// Year being validated.
        fiscal_year: String,
        /// What was wrong with its months.
        reason: String,
    },

    /// A sales figure is negative or not a number.
    #[error("Fiscal year {fiscal_year} has an invalid sales value {value} for {month}")]
    InvalidSales {
        /// Year being validated.
        fiscal_year: String,
        /// Month carrying the bad value.
        month: String,
        /// The value itself.
        value: f64,
    },

    /// Historical years are out of order, repeated or have a gap.
    #[error("Fiscal year {found} does not follow {previous}")]
    NonContiguousHistory {
        /// The year before.
        previous: String,
        /// The year that should have been its successor.
        found: String,
    },

    /// Growth ratio would divide by a zero total.
    #[error("Cannot derive a growth ratio: {fiscal_year} has a total of {total}")]
    ZeroBaseline {
        /// Year used as the growth baseline.
        fiscal_year: String,
        /// Its total.
        total: f64,
    },

    /// Forecasts start one year after the last historical year.
    #[error("Forecast offset must be at least 1, got {0}")]
    InvalidForecastOffset(usize),

    #[error("Failed to read dataset {path:?}")]
    DatasetIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid sales JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV export")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

// 🔧 Dashboard Configuration
// Resolved settings shared by the TUI and the report commands

use crate::dataset::SalesDataset;
use crate::error::{DashboardError, Result};
use crate::fiscal::FiscalYear;
use crate::loading::DEFAULT_LOADING_DELAY;
use crate::timeline::Timeline;
use std::path::PathBuf;
use std::time::Duration;

/// Year selected when the dashboard opens
pub const DEFAULT_FISCAL_YEAR: FiscalYear = FiscalYear::new(2024);

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Initial selection
    pub initial_year: FiscalYear,

    /// How long the loading placeholder stays up after a selection
    pub loading_delay: Duration,

    /// Alternate dataset; the embedded one when `None`
    pub data_path: Option<PathBuf>,
}

impl DashboardConfig {
    pub fn load_dataset(&self) -> Result<SalesDataset> {
        match &self.data_path {
            Some(path) => SalesDataset::from_file(path),
            None => SalesDataset::embedded(),
        }
    }

    /// The initial year must be somewhere on the timeline
    pub fn validate(&self, timeline: &Timeline) -> Result<()> {
        if !timeline.contains(self.initial_year) {
            return Err(DashboardError::UnknownFiscalYear(self.initial_year.to_string()));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            initial_year: DEFAULT_FISCAL_YEAR,
            loading_delay: DEFAULT_LOADING_DELAY,
            data_path: None,
        }
    }
}

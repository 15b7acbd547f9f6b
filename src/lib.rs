// Sales Dashboard - Core Library
// Aggregation/forecast engine and view state, shared by the TUI and report commands

pub mod aggregation;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod fiscal;
pub mod forecast;
pub mod loading;
pub mod report;
pub mod timeline;
pub mod view;

// Re-export commonly used types
pub use aggregation::{
    growth_rate, quarterly, round2, round_half_up, yearly_total,
    GrowthRate, Quarter, QuarterSales,
};
pub use config::{DashboardConfig, DEFAULT_FISCAL_YEAR};
pub use dataset::{HistoricalYear, Month, MonthSales, SalesDataset};
pub use engine::{SalesEngine, TimelinePoint, YearView};
pub use error::{DashboardError, Result};
pub use fiscal::FiscalYear;
pub use forecast::Forecaster;
pub use loading::{LoadingTicket, LoadingTimer, DEFAULT_LOADING_DELAY};
pub use report::{write_timeline_csv, DashboardReport};
pub use timeline::{Timeline, FORECAST_HORIZON};
pub use view::{DashboardState, DashboardSummary, Trend};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

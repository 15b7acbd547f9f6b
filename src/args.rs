//! Command-line interface for the sales-dashboard binary.

use clap::{Parser, Subcommand, ValueEnum};
use sales_dashboard::{DashboardConfig, FiscalYear, DEFAULT_FISCAL_YEAR};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;

/// sales-dashboard: Track, analyze, and forecast sales across financial years.
///
/// With no subcommand the interactive terminal dashboard opens. Forecast years are
/// extrapolated from the growth between the two most recent historical years.
#[derive(Debug, Parser, Clone)]
#[command(version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    /// The subcommand, falling back to the interactive dashboard
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Ui)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Open the interactive dashboard (default).
    Ui,
    /// Print the dashboard numbers for the selected year.
    Report(ReportArgs),
    /// Write the year-over-year timeline as CSV.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// Write logs to this file. The interactive dashboard only logs when this is set.
    #[arg(long, env = "SALES_DASHBOARD_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// JSON dataset to use instead of the embedded one.
    #[arg(long, env = "SALES_DASHBOARD_DATA")]
    data: Option<PathBuf>,

    /// Fiscal year selected on start, e.g. FY2024-25.
    #[arg(long, env = "SALES_DASHBOARD_YEAR", default_value_t = DEFAULT_FISCAL_YEAR)]
    year: FiscalYear,

    /// How long the loading placeholder is shown after each selection.
    #[arg(long, env = "SALES_DASHBOARD_LOADING_DELAY_MS", default_value_t = 600)]
    loading_delay_ms: u64,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    pub fn config(&self) -> DashboardConfig {
        DashboardConfig {
            initial_year: self.year,
            loading_delay: Duration::from_millis(self.loading_delay_ms),
            data_path: self.data.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

impl ReportArgs {
    pub fn format(&self) -> ReportFormat {
        self.format
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Destination file. Prints to stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn output(&self) -> Option<&PathBuf> {
        self.output.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sales-dashboard"]).unwrap();
        assert!(matches!(args.command(), Command::Ui));

        let config = args.common().config();
        assert_eq!(config.initial_year.to_string(), "FY2024-25");
        assert_eq!(config.loading_delay, Duration::from_millis(600));
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_report_json() {
        let args = Args::try_parse_from([
            "sales-dashboard",
            "--year",
            "FY2027-28",
            "report",
            "--format",
            "json",
        ])
        .unwrap();

        match args.command() {
            Command::Report(report) => assert_eq!(report.format(), ReportFormat::Json),
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(args.common().config().initial_year.to_string(), "FY2027-28");
    }

    #[test]
    fn test_rejects_bad_year() {
        assert!(Args::try_parse_from(["sales-dashboard", "--year", "2027"]).is_err());
    }

    #[test]
    fn test_export_output() {
        let args = Args::try_parse_from(["sales-dashboard", "export", "-o", "timeline.csv"]).unwrap();
        match args.command() {
            Command::Export(export) => {
                assert_eq!(export.output(), Some(&PathBuf::from("timeline.csv")))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}

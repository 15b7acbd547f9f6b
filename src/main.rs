// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

mod args;

use anyhow::{Context, Result};
use args::{Args, Command, ReportFormat};
use clap::Parser;
use sales_dashboard::{
    write_timeline_csv, DashboardReport, DashboardState, SalesEngine,
};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, error, info, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let command = args.command();
    let interactive = matches!(command, Command::Ui);

    if let Err(e) = init_logger(args.common().log_level(), args.common().log_file(), interactive) {
        eprintln!("❌ {:#}", e);
        return ExitCode::FAILURE;
    }
    debug!("Log level set to {}", args.common().log_level().to_string().to_lowercase());

    match main_inner(&args, command) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            if interactive {
                // the dashboard never logs to the terminal it owns
                eprintln!("❌ {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn main_inner(args: &Args, command: Command) -> Result<()> {
    trace!("{args:?}");
    let config = args.common().config();

    let dataset = config.load_dataset().context("Failed to load sales dataset")?;
    let engine = SalesEngine::new(dataset)?;
    let state = DashboardState::new(engine, &config, Instant::now())?;

    match command {
        Command::Ui => run_ui_mode(state),
        Command::Report(report_args) => run_report(&state, report_args.format()),
        Command::Export(export_args) => run_export(&state, export_args.output()),
    }
}

fn run_report(state: &DashboardState, format: ReportFormat) -> Result<()> {
    let report = DashboardReport::build(state)?;
    match format {
        ReportFormat::Text => println!("{}", report.to_text()),
        ReportFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn run_export(state: &DashboardState, output: Option<&PathBuf>) -> Result<()> {
    let series = state.timeline_series()?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create export file: {:?}", path))?;
            write_timeline_csv(&series, file)?;
            info!("✓ Exported {} fiscal years to {:?}", series.len(), path);
        }
        None => write_timeline_csv(&series, io::stdout().lock())?,
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(state: DashboardState) -> Result<()> {
    info!("Starting dashboard on {}", state.selected());

    let mut app = ui::App::new(state);
    ui::run_ui(&mut app)?;

    info!("Dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_state: DashboardState) -> Result<()> {
    anyhow::bail!(
        "TUI mode not available. Rebuild with `--features tui`, or use the `report` and `export` subcommands"
    )
}

/// Initializes the tracing subscriber.
///
/// The interactive dashboard owns the terminal, so it only logs when a log
/// file is given. Everything else logs to stderr.
fn init_logger(level: LevelFilter, log_file: Option<&PathBuf>, interactive: bool) -> Result<()> {
    let silent = interactive && log_file.is_none();

    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) if !silent => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        _ => {
            // RUST_LOG does not exist; use default log level for this crate only.
            let level = if silent { LevelFilter::OFF } else { level };
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {:?}", path))
}

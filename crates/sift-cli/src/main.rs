mod cli;
mod config;
mod error;
mod logging;
mod progress;

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use bindersift::core::models::job::JobStatus;
use bindersift::engine::progress::ProgressReporter;
use bindersift::workflows;
use clap::Parser;
use tracing::{debug, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, &cli.log_file)?;

    info!("🚀 bindersift v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!("Setting Rayon global thread pool to {} threads.", num_threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    // Configuration problems abort here, before any directory is read.
    let settings = Settings::resolve(&cli)?;
    if !cli.root.is_dir() {
        return Err(CliError::Argument(format!(
            "root directory '{}' does not exist or is not a directory",
            cli.root.display()
        )));
    }

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.callback());

    let records = workflows::scan::run(&cli.root, &settings.scan, &reporter)?;
    let report = workflows::rank::rank(settings.scan.dialect, &records, &settings.rank);
    workflows::rank::write_report(&report, &settings.output, &settings.passing_output)?;
    handler.finish();

    let complete = records
        .iter()
        .filter(|r| r.status == JobStatus::Complete)
        .count();
    let failed = records.len() - complete;
    println!(
        "✓ Scanned {} candidate(s): {} complete, {} with failures recorded.",
        records.len(),
        complete,
        failed
    );
    println!(
        "✓ {} candidate(s) pass the threshold. Report written to: {}",
        report.passing.len(),
        settings.output.display()
    );
    info!("✅ Command completed successfully.");
    Ok(())
}

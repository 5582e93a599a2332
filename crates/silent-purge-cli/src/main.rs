mod commands;
mod logging;
mod progress;

use std::process;

use colored::*;
use commands::Cli;
use dotenv::dotenv;
use progress::CliReporter;
use silent_purge_core::{AppConfig, FfmpegMeter, PurgeEngine, RunSummary};
use tracing::{error, info};

fn main() {
    dotenv().ok();

    // Usage errors exit here, before any logging or store is set up.
    let args = Cli::parse_ordered();

    let _guard = logging::init_logger();

    let config = match silent_purge_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    if !args.root_path.is_dir() {
        error!("Not a directory: {}", args.root_path.display());
        process::exit(1);
    }

    match run_purge(&config, &args) {
        Ok(summary) if summary.delete_failures > 0 => {
            error!("{} files could not be removed", summary.delete_failures);
            process::exit(1);
        }
        Ok(_) => {}
        Err(err) => {
            error!("Error: {}", err);
            process::exit(1);
        }
    }
}

fn run_purge(config: &AppConfig, args: &Cli) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let engine = PurgeEngine::new(&args.root_path, config.clone()).with_dry_run(args.dry_run);
    let meter = FfmpegMeter::new(&config.ffmpeg_path);
    let reporter = CliReporter::new();

    info!("Measurement store: {}", engine.store_path().display());
    let summary = engine.run(&meter, &reporter)?;

    info!(
        "{} cached, {} measured ({} unreadable)",
        format!("{}", summary.cache_hits).green(),
        format!("{}", summary.measured).green(),
        format!("{}", summary.measure_failures).yellow(),
    );
    if args.dry_run {
        info!(
            "{} silent files found (dry run, nothing deleted)",
            format!("{}", summary.flagged).red(),
        );
    } else {
        info!(
            "{} silent files found, {} deleted",
            format!("{}", summary.flagged).red(),
            format!("{}", summary.deleted).red(),
        );
    }

    Ok(summary)
}

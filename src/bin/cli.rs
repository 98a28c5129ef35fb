//! Castells Hora a Hora watcher CLI
//!
//! Meant to be triggered by a scheduler (cron, systemd timer). Running it
//! without arguments performs one check.

use std::path::PathBuf;
use std::process::ExitCode;

use castells_watch::{
    error::Result,
    models::Config,
    notify::{ApnsConfig, ApnsNotifier},
    pipeline,
    services::{CompiledSelectors, EntryFetcher},
    storage::{LocalStateStore, StateStore},
};
use clap::{Parser, Subcommand};

/// castells-watch - push a notification when a new entry appears
#[derive(Parser, Debug)]
#[command(name = "castells-watch", version, about = "Castells Hora a Hora watcher")]
struct Cli {
    /// Directory holding config.toml and the state file
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// State file path (default: from config, relative to storage dir)
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the page once and notify on a new entry (default)
    Run,

    /// Validate configuration, selectors and APNs credentials
    Validate,

    /// Show the stored state
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .target(env_logger::Target::Stdout)
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let dotenv = dotenvy::dotenv();
    init_logging(cli.verbose);

    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    report(run(cli).await)
}

/// Log a failed run once and turn the outcome into the process exit status.
fn report(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.storage_dir.join("config.toml");
    let config = if config_path.exists() {
        Config::load_or_default(&config_path)
    } else {
        log::debug!("No config at {}, using defaults", config_path.display());
        Config::default()
    };

    let state_path = cli
        .state_file
        .clone()
        .unwrap_or_else(|| config.state.path_in(&cli.storage_dir));
    let store = LocalStateStore::new(state_path);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            config.validate()?;
            let apns = ApnsConfig::from_env()?;
            let notifier = ApnsNotifier::new(&apns, &config.notifier)?;
            let fetcher = EntryFetcher::new(&config.fetcher)?;

            log::debug!("Watching {}", fetcher.url());
            pipeline::run_watch(&fetcher, &store, &notifier).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({})", config.fetcher.url);

            CompiledSelectors::compile(&config.fetcher.selectors)?;
            log::info!("✓ Selectors OK");

            let apns = ApnsConfig::from_env()?;
            ApnsNotifier::new(&apns, &config.notifier)?;
            log::info!(
                "✓ APNs credentials OK ({} endpoint, topic {})",
                if apns.sandbox { "sandbox" } else { "production" },
                apns.bundle_id
            );

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!(
                "Config: {}",
                if config_path.exists() {
                    "found"
                } else {
                    "not found (defaults)"
                }
            );
            log::info!("Watching: {}", config.fetcher.url);
            log::info!("State file: {}", store.path().display());

            match store.load().await? {
                Some(record) => {
                    log::info!("Last title: {}", record.last_title);
                    log::info!("Last hash: {}", record.last_hash);
                }
                None => log::info!("No state stored yet."),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use castells_watch::error::AppError;

    #[test]
    fn report_maps_outcome_to_exit_status() {
        assert_eq!(report(Ok(())), ExitCode::SUCCESS);
        assert_eq!(
            report(Err(AppError::retrieval("https://example.com/", "HTTP 500"))),
            ExitCode::FAILURE
        );
    }
}

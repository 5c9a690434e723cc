//! dupesweep - content-based duplicate sweeper
//!
//! Walks a directory tree, fingerprints every regular file with BLAKE3 and
//! moves each later copy of already-seen content into a quarantine folder,
//! leaving the first copy in place.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;
pub mod sweep;

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::Progress;
use crate::signal::ShutdownHandler;
use crate::sweep::{SweepEvent, Sweeper};

/// Run the application for already-parsed arguments.
///
/// # Errors
///
/// Returns the first configuration, scan, move or output error. Interruption
/// surfaces as an error that [`ExitCode::from_error`] maps to 130.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_cli_overrides(&cli);
    config.validate().context("Invalid configuration")?;
    log::debug!("Effective configuration: {config:?}");

    let root = match cli.root {
        Some(ref root) => root.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let shutdown = match signal::install_handler() {
        Ok(handler) => handler,
        Err(e) => {
            log::warn!("{e}; Ctrl+C will terminate immediately");
            ShutdownHandler::new()
        }
    };

    let hide_progress = !config.progress
        || cli.quiet
        || cli.output != OutputFormat::Text
        || !io::stderr().is_terminal();
    let progress = Arc::new(Progress::new(hide_progress));

    let sweeper = Sweeper::new(&root, config)
        .with_dry_run(cli.dry_run)
        .with_shutdown_handler(shutdown)
        .with_progress_callback(progress.clone());

    log::info!(
        "Sweeping {} into {}{}",
        root.display(),
        sweeper.quarantine_dir().display(),
        if cli.dry_run { " (dry run)" } else { "" }
    );

    match cli.output {
        OutputFormat::Text => {
            let color = !cli.no_color && io::stdout().is_terminal();
            let mut text = TextOutput::new(io::stdout().lock(), color);

            let report = sweeper.run(|event| {
                progress
                    .suspend(|| match event {
                        SweepEvent::Found(pair) => text.write_pair(pair),
                        SweepEvent::Moved(_, moved) => text.write_destination(moved),
                    })
                    .context("Failed to write report")
            })?;
            text.write_summary(&report)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            let report = sweeper.run(|_| Ok(()))?;
            JsonOutput::new(&report)
                .write_to(&mut io::stdout().lock())
                .context("Failed to write JSON report")?;
        }
    }

    Ok(ExitCode::Success)
}

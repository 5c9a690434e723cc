//! Signal handling for graceful shutdown.
//!
//! A Ctrl+C sets a shared `AtomicBool`. The walker and hasher stop between
//! files and the relocation loop stops between moves, so a move is never cut
//! off halfway. The process then exits with code 130 (128 + SIGINT).
//!
//! ```rust,no_run
//! use dupesweep::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let flag = handler.get_flag();
//! // Pass flag to FinderConfig::with_shutdown_flag
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Raised by the driver when shutdown is observed between moves.
#[derive(Debug, thiserror::Error)]
#[error("Interrupted before all duplicates were moved")]
pub struct Interrupted;

/// Shared shutdown flag.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a new shutdown handler with the flag initially set to `false`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the shutdown flag for the finder and hasher.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Reset the shutdown flag to `false`.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Fail with [`Interrupted`] if shutdown was requested.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] once the flag is set.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.is_shutdown_requested() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a Ctrl+C handler that sets the shutdown flag on interrupt.
///
/// Calling this more than once in a process (as integration tests do through
/// `run_app`) returns the already-installed handler with its flag reset.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if ctrlc refuses the handler and no
/// earlier handler exists.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);

        let _ = writeln!(std::io::stderr(), "\nInterrupted. Finishing current file...");
        let _ = std::io::stderr().flush();

        log::info!("Shutdown signal received");
    })?;

    let _ = GLOBAL_HANDLER.set(handler.clone());
    Ok(handler)
}

//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the dupesweep application.
///
/// - 0: Success (run completed, whether or not duplicates were found)
/// - 1: General error (hashing, walking or moving failed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Run completed normally.
    Success = 0,
    /// General error: An I/O or configuration error aborted the run.
    GeneralError = 1,
    /// Interrupted: Run was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::Interrupted => "DS130",
        }
    }

    /// Classify an application error.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        let interrupted = err.chain().any(|cause| {
            cause
                .downcast_ref::<crate::duplicates::FinderError>()
                .is_some_and(|e| matches!(e, crate::duplicates::FinderError::Interrupted))
                || cause
                    .downcast_ref::<crate::signal::Interrupted>()
                    .is_some()
        });

        if interrupted {
            Self::Interrupted
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

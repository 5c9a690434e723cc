//! JSON report for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/data",
//!   "quarantine": "/data/duplicates",
//!   "dry_run": false,
//!   "generated_at": "2024-05-01T12:00:00Z",
//!   "duplicates": [
//!     {
//!       "original": "/data/a.txt",
//!       "duplicate": "/data/sub/b.txt",
//!       "destination": "/data/duplicates/b.txt",
//!       "hash": "ea8f163d...",
//!       "size": 5
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 3,
//!     "total_size": 15,
//!     "unique_files": 2,
//!     "duplicate_files": 1,
//!     "moved_files": 1,
//!     "moved_bytes": 5,
//!     "scan_duration_ms": 2
//!   }
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sweep::{MovedDuplicate, RunReport};

/// One duplicate in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    pub original: String,
    pub duplicate: String,
    pub destination: String,
    /// BLAKE3 hash as 64 hex characters
    pub hash: String,
    pub size: u64,
}

impl JsonDuplicate {
    #[must_use]
    pub fn from_moved(moved: &MovedDuplicate) -> Self {
        Self {
            original: moved.pair.original.to_string_lossy().into_owned(),
            duplicate: moved.pair.duplicate.to_string_lossy().into_owned(),
            destination: moved.result.destination.to_string_lossy().into_owned(),
            hash: moved.pair.hash_hex(),
            size: moved.pair.size,
        }
    }
}

/// Run statistics in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Files hashed
    pub total_files: usize,
    /// Bytes hashed
    pub total_size: u64,
    /// Distinct fingerprints
    pub unique_files: usize,
    /// Duplicates found
    pub duplicate_files: usize,
    /// Duplicates moved (or planned in a dry run)
    pub moved_files: usize,
    /// Bytes moved (or planned in a dry run)
    pub moved_bytes: u64,
    /// Scan duration in milliseconds
    pub scan_duration_ms: u64,
}

/// Complete JSON document for a run.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub root: String,
    pub quarantine: String,
    pub dry_run: bool,
    pub generated_at: DateTime<Utc>,
    pub duplicates: Vec<JsonDuplicate>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the document from a finished run, stamped with the current time.
    #[must_use]
    pub fn new(report: &RunReport) -> Self {
        Self {
            root: report.root.to_string_lossy().into_owned(),
            quarantine: report.quarantine.to_string_lossy().into_owned(),
            dry_run: report.dry_run,
            generated_at: Utc::now(),
            duplicates: report.moves.iter().map(JsonDuplicate::from_moved).collect(),
            summary: JsonSummary {
                total_files: report.summary.total_files,
                total_size: report.summary.total_size,
                unique_files: report.summary.unique_files,
                duplicate_files: report.summary.duplicate_files,
                moved_files: report.moved_count(),
                moved_bytes: report.moved_bytes(),
                scan_duration_ms: u64::try_from(report.summary.scan_duration.as_millis())
                    .unwrap_or(u64::MAX),
            },
        }
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the pretty-printed document followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Error type for JSON output operations.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}

//! File actions module.
//!
//! This module provides the relocation step: moving each duplicate into the
//! quarantine directory under a collision-free name.
//!
//! ```no_run
//! use dupesweep::actions::relocate::Quarantine;
//! use std::ffi::OsStr;
//! use std::path::Path;
//!
//! let quarantine = Quarantine::new(Path::new("duplicates"));
//! let dest = quarantine.unique_destination(OsStr::new("report.txt")).unwrap();
//! ```

pub mod relocate;

// Re-export commonly used types
pub use relocate::{resolve_dir, Quarantine, RelocateError, RelocateResult, DEFAULT_MAX_SUFFIX};

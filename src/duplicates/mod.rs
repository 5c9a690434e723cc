//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Fingerprint indexing (first-seen path per content hash)
//! - Single-pass duplicate detection over a directory tree

pub mod finder;
pub mod index;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use index::{DuplicatePair, FingerprintIndex};

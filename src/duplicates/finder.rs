//! Single-pass duplicate finder.
//!
//! # Overview
//!
//! The finder walks a directory tree once, fingerprints every regular file
//! with the streaming [`Hasher`], and classifies each file against a
//! [`FingerprintIndex`]:
//!
//! 1. Unseen fingerprint: the file becomes the original for that content.
//! 2. Seen fingerprint: a [`DuplicatePair`] is emitted pointing at the original.
//!
//! Any walk or hash error aborts the scan. Pairs come back in discovery order.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (pairs, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! for pair in &pairs {
//!     println!("{} duplicates {}", pair.duplicate.display(), pair.original.display());
//! }
//! println!("{} files scanned", summary.total_files);
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::{DuplicatePair, FingerprintIndex};
use crate::progress::ProgressCallback;
use crate::scanner::{FileRecord, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Read chunk size for hashing, in bytes.
    pub chunk_size: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("chunk_size", &self.chunk_size)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            chunk_size: crate::scanner::DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the hashing chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Total number of files hashed
    pub total_files: usize,
    /// Total size of all hashed files in bytes
    pub total_size: u64,
    /// Number of distinct fingerprints
    pub unique_files: usize,
    /// Number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total size of the duplicates in bytes
    pub duplicate_size: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Duplicate size as human-readable string.
    #[must_use]
    pub fn duplicate_size_display(&self) -> String {
        ByteSize::b(self.duplicate_size).to_string()
    }

    /// Total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// Walking the tree failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(HashError),
}

impl From<HashError> for FinderError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::Interrupted(_) => Self::Interrupted,
            other => Self::Hash(other),
        }
    }
}

/// Duplicate finder.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new().with_chunk_size(config.chunk_size);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files beneath `path`.
    ///
    /// Returns the duplicate pairs in discovery order along with summary
    /// statistics. The first file seen for each fingerprint is the original;
    /// it is never replaced by a later one.
    ///
    /// # Errors
    ///
    /// - [`FinderError::Scan`] if the root is missing, not a directory, or a
    ///   directory cannot be read
    /// - [`FinderError::Hash`] if any file cannot be read
    /// - [`FinderError::Interrupted`] if shutdown was requested
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicatePair>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        let mut walker = Walker::new(path, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        walker.validate_root()?;

        log::info!("Starting duplicate scan of {}", path.display());

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("hashing", 0);
            callback.on_message(&format!("Scanning {}", path.display()));
        }

        let mut index = FingerprintIndex::new();
        let mut pairs = Vec::new();
        let mut summary = ScanSummary::default();

        for result in walker.walk() {
            let file = result?;
            if file.is_symlink {
                log::debug!("Hashing symlink target: {}", file.path.display());
            }

            let hash = self.hasher.full_hash(&file.path)?;
            summary.total_files += 1;
            summary.total_size += file.size;

            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(summary.total_files, &file.path.to_string_lossy());
                callback.on_item_completed(file.size);
            }

            let record = FileRecord {
                path: file.path,
                hash,
                size: file.size,
            };

            if let Some(pair) = index.classify(record) {
                log::debug!(
                    "Duplicate: {} matches {}",
                    pair.duplicate.display(),
                    pair.original.display()
                );
                summary.duplicate_files += 1;
                summary.duplicate_size += pair.size;
                pairs.push(pair);
            }
        }

        // The walker ends quietly on shutdown, so check once more
        if self.config.is_shutdown_requested() {
            log::info!("Scan interrupted after {} files", summary.total_files);
            return Err(FinderError::Interrupted);
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("hashing");
        }

        summary.unique_files = index.len();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files, {} duplicates ({}) in {:?}",
            summary.total_files,
            summary.duplicate_files,
            summary.duplicate_size_display(),
            summary.scan_duration
        );

        Ok((pairs, summary))
    }
}

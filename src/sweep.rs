//! One complete run: scan a tree, then move every duplicate into quarantine.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::config::Config;
//! use dupesweep::sweep::{SweepEvent, Sweeper};
//! use std::path::Path;
//!
//! let sweeper = Sweeper::new(Path::new("."), Config::default());
//! let report = sweeper
//!     .run(|event| {
//!         if let SweepEvent::Moved(pair, moved) = event {
//!             println!("{} -> {}", pair.duplicate.display(), moved.destination.display());
//!         }
//!         Ok(())
//!     })
//!     .unwrap();
//! println!("{} duplicates moved", report.moved_count());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{resolve_dir, Quarantine, RelocateResult};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, DuplicatePair, FinderConfig, ScanSummary};
use crate::progress::ProgressCallback;
use crate::scanner::{Walker, WalkerConfig};
use crate::signal::ShutdownHandler;

/// What [`Sweeper::run`] reports to its callback for each duplicate.
#[derive(Debug, Clone, Copy)]
pub enum SweepEvent<'a> {
    /// The duplicate is about to be moved.
    Found(&'a DuplicatePair),
    /// The duplicate has been moved (or planned, in a dry run).
    Moved(&'a DuplicatePair, &'a RelocateResult),
}

/// A duplicate together with where it ended up.
#[derive(Debug, Clone)]
pub struct MovedDuplicate {
    /// What the scanner found
    pub pair: DuplicatePair,
    /// What the relocator did
    pub result: RelocateResult,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Scanned root
    pub root: PathBuf,
    /// Resolved quarantine directory
    pub quarantine: PathBuf,
    /// Whether moves were only planned
    pub dry_run: bool,
    /// Duplicates in discovery order
    pub moves: Vec<MovedDuplicate>,
    /// Scan statistics
    pub summary: ScanSummary,
}

impl RunReport {
    /// Number of duplicates moved (or planned).
    #[must_use]
    pub fn moved_count(&self) -> usize {
        self.moves.len()
    }

    /// Bytes moved into quarantine (or planned).
    #[must_use]
    pub fn moved_bytes(&self) -> u64 {
        self.moves.iter().map(|m| m.result.size).sum()
    }
}

/// Runs the scan and relocation phases for one root.
pub struct Sweeper {
    root: PathBuf,
    config: Config,
    dry_run: bool,
    shutdown: ShutdownHandler,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl Sweeper {
    /// Create a sweeper for `root` with the given configuration.
    #[must_use]
    pub fn new(root: &Path, config: Config) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            dry_run: false,
            shutdown: ShutdownHandler::new(),
            progress_callback: None,
        }
    }

    /// Plan moves without touching the file system.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Use a shared shutdown handler (normally the Ctrl+C one).
    #[must_use]
    pub fn with_shutdown_handler(mut self, handler: ShutdownHandler) -> Self {
        self.shutdown = handler;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Resolved quarantine directory.
    #[must_use]
    pub fn quarantine_dir(&self) -> PathBuf {
        resolve_dir(&self.root, &self.config.quarantine_dir)
    }

    fn finder_config(&self, quarantine_dir: &Path) -> FinderConfig {
        let exclude = if self.config.include_quarantine {
            Vec::new()
        } else {
            vec![quarantine_dir.to_path_buf()]
        };

        let mut config = FinderConfig::default()
            .with_walker_config(WalkerConfig::new(
                self.config.follow_symlinks,
                self.config.sort_entries,
                exclude,
            ))
            .with_chunk_size(self.config.chunk_size)
            .with_shutdown_flag(self.shutdown.get_flag());

        if let Some(ref callback) = self.progress_callback {
            config = config.with_progress_callback(callback.clone());
        }
        config
    }

    /// Scan the root and move each duplicate, reporting to `on_event` around every move.
    ///
    /// The root must be an existing directory. The quarantine directory is
    /// created before scanning starts. Duplicates are handled in discovery
    /// order: [`SweepEvent::Found`] comes before the move is attempted and
    /// [`SweepEvent::Moved`] once it has succeeded.
    ///
    /// # Errors
    ///
    /// The first hashing, walking, moving or callback error ends the run.
    /// Moves already made stay in place.
    pub fn run<F>(&self, mut on_event: F) -> Result<RunReport>
    where
        F: FnMut(SweepEvent<'_>) -> Result<()>,
    {
        Walker::new(&self.root, WalkerConfig::default())
            .validate_root()
            .with_context(|| format!("Failed to scan {}", self.root.display()))?;

        let quarantine_dir = self.quarantine_dir();
        let mut quarantine = Quarantine::new(&quarantine_dir)
            .with_max_suffix(self.config.max_suffix)
            .with_dry_run(self.dry_run);

        quarantine.ensure_exists().with_context(|| {
            format!(
                "Failed to create quarantine directory {}",
                quarantine_dir.display()
            )
        })?;

        let finder = DuplicateFinder::new(self.finder_config(&quarantine_dir));
        let (pairs, summary) = finder
            .find_duplicates(&self.root)
            .with_context(|| format!("Failed to scan {}", self.root.display()))?;

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("relocating", pairs.len());
        }

        let mut moves = Vec::with_capacity(pairs.len());
        for (i, pair) in pairs.into_iter().enumerate() {
            self.shutdown.check()?;
            on_event(SweepEvent::Found(&pair))?;

            let result = quarantine.relocate(&pair).with_context(|| {
                format!("Failed to move duplicate {}", pair.duplicate.display())
            })?;

            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(i + 1, &pair.duplicate.to_string_lossy());
            }

            on_event(SweepEvent::Moved(&pair, &result))?;
            moves.push(MovedDuplicate { pair, result });
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("relocating");
        }

        Ok(RunReport {
            root: self.root.clone(),
            quarantine: quarantine_dir,
            dry_run: self.dry_run,
            moves,
            summary,
        })
    }
}

//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and yielding every regular file in it. Traversal is single-threaded and
//! depth-first; each directory is fully listed before moving on.
//!
//! # Features
//!
//! - Files of a directory are visited before any of its subdirectories
//! - Optional per-directory sorting by file name for deterministic order
//! - Pruning of excluded directories (the quarantine directory)
//! - Symlinks to files are yielded; symlinked directories are only
//!   descended into when following is enabled
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().collect::<Result<_, _>>().unwrap();
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Canonical forms of the excluded directories that exist on disk
    canonical_exclude: Vec<PathBuf>,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        let canonical_exclude = config
            .exclude
            .iter()
            .filter_map(|p| fs::canonicalize(p).ok())
            .collect();

        Self {
            root: path.to_path_buf(),
            config,
            canonical_exclude,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Check that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotFound`] if the root does not exist
    /// - [`ScanError::NotADirectory`] if the root is a file
    /// - [`ScanError::PermissionDenied`] / [`ScanError::Io`] if it cannot be inspected
    pub fn validate_root(&self) -> Result<(), ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound(self.root.clone()),
            io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(self.root.clone()),
            _ => ScanError::Io {
                path: self.root.clone(),
                source: e,
            },
        })?;

        if metadata.is_dir() {
            Ok(())
        } else {
            Err(ScanError::NotADirectory(self.root.clone()))
        }
    }

    /// Whether a directory entry is one of the excluded directories.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() || self.config.exclude.is_empty() {
            return false;
        }

        let path = entry.path();
        if self.config.exclude.iter().any(|p| p == path) {
            return true;
        }

        fs::canonicalize(path).is_ok_and(|canonical| self.canonical_exclude.contains(&canonical))
    }

    /// Walk the directory tree, yielding file entries in traversal order.
    ///
    /// Within each directory the files come first, then each subdirectory is
    /// walked in turn. Directories are traversed but never yielded. Errors are
    /// yielded as [`ScanError`] values; the caller decides whether to stop.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let sort_by_name = self.config.sort_entries;

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            // Stable sort, so without names the file-system order survives
            // inside each group
            .sort_by(move |a, b| {
                let files_first = a.file_type().is_dir().cmp(&b.file_type().is_dir());
                if sort_by_name {
                    files_first.then_with(|| a.file_name().cmp(b.file_name()))
                } else {
                    files_first
                }
            })
            .into_iter()
            .filter_entry(move |entry| {
                if self.is_excluded(entry) {
                    log::debug!("Excluding directory: {}", entry.path().display());
                    false
                } else {
                    true
                }
            })
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => Some(Err(self.map_walk_error(e))),
            })
    }

    /// Turn a walkdir entry into a [`FileEntry`] if it is a file or a link to one.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        // Only reachable when links are not followed
        if file_type.is_symlink() {
            return Self::process_symlink(entry);
        }

        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.map_walk_error(e))),
        };

        log::trace!("Found file: {}", entry.path().display());

        Some(Ok(FileEntry::new(
            entry.path().to_path_buf(),
            metadata.len(),
            entry.path_is_symlink(),
        )))
    }

    /// Resolve an unfollowed symlink.
    ///
    /// Links to files are yielded with the target's size. A dangling link is
    /// yielded too, so hashing it fails like any unreadable file. Links to
    /// directories and special files are skipped.
    fn process_symlink(entry: &DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let path = entry.path();

        match fs::metadata(path) {
            Ok(target) if target.is_file() => {
                log::trace!("Found symlink to file: {}", path.display());
                Some(Ok(FileEntry::new(path.to_path_buf(), target.len(), true)))
            }
            Ok(_) => {
                log::trace!("Skipping symlink: {}", path.display());
                None
            }
            Err(e) => {
                log::debug!("Unresolvable symlink {}: {}", path.display(), e);
                Some(Ok(FileEntry::new(path.to_path_buf(), 0, true)))
            }
        }
    }

    fn map_walk_error(&self, e: walkdir::Error) -> ScanError {
        let path = e
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let message = e.to_string();

        match e.into_io_error() {
            Some(io_err) => match io_err.kind() {
                io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path),
                io::ErrorKind::NotFound => ScanError::NotFound(path),
                _ => ScanError::Io {
                    path,
                    source: io_err,
                },
            },
            // Symlink loop detected by walkdir
            None => ScanError::Io {
                path,
                source: io::Error::new(io::ErrorKind::Other, message),
            },
        }
    }
}

//! Moving duplicates into the quarantine directory.
//!
//! # Overview
//!
//! Each duplicate keeps its base file name inside the quarantine directory.
//! When that name is taken, `_1`, `_2`, ... is inserted before the final
//! extension (`report.txt` -> `report_1.txt`). The search is capped by
//! `max_suffix` so a pre-populated directory cannot cause an endless loop.
//!
//! Moves use `fs::rename`, falling back to copy + remove when the quarantine
//! lives on another file system. A destination that shows up between choosing
//! a name and moving is never overwritten.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::actions::relocate::Quarantine;
//! use dupesweep::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let mut quarantine = Quarantine::new(Path::new("./duplicates"));
//! quarantine.ensure_exists().unwrap();
//!
//! let (pairs, _) = DuplicateFinder::with_defaults().find_duplicates(Path::new(".")).unwrap();
//! for pair in &pairs {
//!     let moved = quarantine.relocate(pair).unwrap();
//!     println!("Moved to: {}", moved.destination.display());
//! }
//! ```

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duplicates::DuplicatePair;

/// Default cap on the collision suffix.
pub const DEFAULT_MAX_SUFFIX: u32 = 10_000;

/// Error type for relocation operations.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// Source file was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when moving or creating the quarantine directory.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The duplicate path has no file name component.
    #[error("path has no file name: {0}")]
    NoFileName(PathBuf),

    /// Every candidate name up to the suffix cap is already in use.
    #[error("no free name for {name} in {dir} after {max_suffix} attempts")]
    NameCollisionExhausted {
        name: String,
        dir: PathBuf,
        max_suffix: u32,
    },

    /// Something appeared at the chosen destination before the move.
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// The rename (or cross-device copy) failed.
    #[error("failed to move {from} to {to}: {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a successful (or planned, in dry-run mode) relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocateResult {
    /// Where the duplicate was.
    pub source: PathBuf,
    /// Where the duplicate is now (or would be).
    pub destination: PathBuf,
    /// Size of the file in bytes.
    pub size: u64,
    /// True when nothing was moved.
    pub dry_run: bool,
}

/// The quarantine directory and its naming state for one run.
#[derive(Debug)]
pub struct Quarantine {
    dir: PathBuf,
    max_suffix: u32,
    dry_run: bool,
    /// Destinations handed out in dry-run mode, treated as taken.
    claimed: HashSet<PathBuf>,
}

impl Quarantine {
    /// Create a quarantine rooted at `dir`.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            max_suffix: DEFAULT_MAX_SUFFIX,
            dry_run: false,
            claimed: HashSet::new(),
        }
    }

    /// Set the collision suffix cap (minimum 1).
    #[must_use]
    pub fn with_max_suffix(mut self, max_suffix: u32) -> Self {
        self.max_suffix = max_suffix.max(1);
        self
    }

    /// Plan moves without touching the file system.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create the quarantine directory (and parents) if absent.
    ///
    /// Does nothing in dry-run mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a non-directory
    /// already occupies the path.
    pub fn ensure_exists(&self) -> Result<(), RelocateError> {
        if self.dry_run {
            return Ok(());
        }

        fs::create_dir_all(&self.dir).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => RelocateError::PermissionDenied(self.dir.clone()),
            _ => RelocateError::Io {
                path: self.dir.clone(),
                source: e,
            },
        })?;

        log::debug!("Quarantine directory ready: {}", self.dir.display());
        Ok(())
    }

    fn is_taken(&self, candidate: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as occupied
        fs::symlink_metadata(candidate).is_ok() || self.claimed.contains(candidate)
    }

    /// First free destination for `file_name` inside the quarantine.
    ///
    /// # Errors
    ///
    /// [`RelocateError::NameCollisionExhausted`] if every suffix up to the cap is taken.
    pub fn unique_destination(&self, file_name: &OsStr) -> Result<PathBuf, RelocateError> {
        let initial = self.dir.join(file_name);
        if !self.is_taken(&initial) {
            return Ok(initial);
        }

        for counter in 1..=self.max_suffix {
            let candidate = self.dir.join(suffixed_name(file_name, counter));
            if !self.is_taken(&candidate) {
                return Ok(candidate);
            }
        }

        Err(RelocateError::NameCollisionExhausted {
            name: file_name.to_string_lossy().into_owned(),
            dir: self.dir.clone(),
            max_suffix: self.max_suffix,
        })
    }

    /// Move the duplicate of `pair` into the quarantine.
    ///
    /// # Errors
    ///
    /// Any failure is returned as-is; earlier moves are not rolled back.
    pub fn relocate(&mut self, pair: &DuplicatePair) -> Result<RelocateResult, RelocateError> {
        let source = &pair.duplicate;
        let file_name = source
            .file_name()
            .ok_or_else(|| RelocateError::NoFileName(source.clone()))?;

        if fs::symlink_metadata(source).is_err() {
            return Err(RelocateError::NotFound(source.clone()));
        }

        let destination = self.unique_destination(file_name)?;

        if self.dry_run {
            log::debug!(
                "Dry run: would move {} to {}",
                source.display(),
                destination.display()
            );
            self.claimed.insert(destination.clone());
        } else {
            move_file(source, &destination)?;
            log::debug!("Moved {} to {}", source.display(), destination.display());
        }

        Ok(RelocateResult {
            source: source.clone(),
            destination,
            size: pair.size,
            dry_run: self.dry_run,
        })
    }
}

/// Resolve the quarantine setting against the scan root.
///
/// Relative names live under `root`; absolute paths are used as-is.
#[must_use]
pub fn resolve_dir(root: &Path, quarantine: &Path) -> PathBuf {
    if quarantine.is_absolute() {
        quarantine.to_path_buf()
    } else {
        root.join(quarantine)
    }
}

/// `<stem>_<counter><.ext>` for a file name.
fn suffixed_name(file_name: &OsStr, counter: u32) -> OsString {
    let path = Path::new(file_name);
    let stem = path.file_stem().unwrap_or(file_name);

    let mut name = stem.to_os_string();
    name.push(format!("_{counter}"));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

fn is_cross_device_error(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices
}

/// Rename `from` to `to`, copying across file systems when needed.
///
/// Fails with [`RelocateError::DestinationExists`] instead of replacing an
/// existing `to`.
fn move_file(from: &Path, to: &Path) -> Result<(), RelocateError> {
    // rename would replace it silently
    if fs::symlink_metadata(to).is_ok() {
        return Err(RelocateError::DestinationExists(to.to_path_buf()));
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if is_cross_device_error(&err) => {
            log::debug!(
                "Cross-device move, copying {} to {}",
                from.display(),
                to.display()
            );
            copy_then_remove(from, to).map_err(|source| match source.kind() {
                io::ErrorKind::AlreadyExists => RelocateError::DestinationExists(to.to_path_buf()),
                _ => RelocateError::MoveFailed {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                    source,
                },
            })
        }
        Err(err) => Err(match err.kind() {
            io::ErrorKind::PermissionDenied => RelocateError::PermissionDenied(from.to_path_buf()),
            _ => RelocateError::MoveFailed {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source: err,
            },
        }),
    }
}

/// Copy `from` into a newly created `to`, then remove `from`.
///
/// Symlinks are recreated rather than copied through on unix.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(from)?;

    #[cfg(unix)]
    {
        if metadata.file_type().is_symlink() {
            std::os::unix::fs::symlink(fs::read_link(from)?, to)?;
            return fs::remove_file(from);
        }
    }

    let mut source = fs::File::open(from)?;
    let mut target = fs::File::create_new(to)?;
    let copied = io::copy(&mut source, &mut target)
        .and_then(|_| target.set_permissions(metadata.permissions()))
        .and_then(|()| target.sync_all());
    if let Err(err) = copied {
        drop(target);
        let _ = fs::remove_file(to);
        return Err(err);
    }

    fs::remove_file(from)
}

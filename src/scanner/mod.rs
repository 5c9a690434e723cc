//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Single-threaded directory walking using walkdir
//! - Content fingerprinting with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     exclude: vec![Path::new("./duplicates").to_path_buf()],
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{hash_bytes, hash_to_hex, Hash, Hasher, DEFAULT_CHUNK_SIZE};
pub use walker::Walker;

/// A file, or a symlink to one, discovered by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the file, as produced by the walk (root-joined)
    pub path: PathBuf,
    /// File size in bytes (the target's size for a symlink)
    pub size: u64,
    /// Whether the path itself is a symbolic link
    pub is_symlink: bool,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, is_symlink: bool) -> Self {
        Self {
            path,
            size,
            is_symlink,
        }
    }
}

/// A file paired with its content fingerprint.
///
/// Only lives for the duration of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file
    pub path: PathBuf,
    /// BLAKE3 digest of the full content
    pub hash: Hash,
    /// File size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Hex-encoded fingerprint (64 lowercase characters).
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Descend into symlinked directories.
    /// Symlinks to files are yielded either way.
    pub follow_symlinks: bool,

    /// Sort entries by file name within each directory.
    /// When false, files and subdirectories keep file-system order, though
    /// files still come first.
    pub sort_entries: bool,

    /// Directories pruned from the walk (e.g. the quarantine directory).
    pub exclude: Vec<PathBuf>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            sort_entries: true,
            exclude: Vec::new(),
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `follow_symlinks` - Whether to follow symbolic links
    /// * `sort_entries` - Whether to sort entries per directory
    /// * `exclude` - Directories to prune from the walk
    #[must_use]
    pub fn new(follow_symlinks: bool, sort_entries: bool, exclude: Vec<PathBuf>) -> Self {
        Self {
            follow_symlinks,
            sort_entries,
            exclude,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Shutdown was requested while the file was being read.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

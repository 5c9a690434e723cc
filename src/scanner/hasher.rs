//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing BLAKE3 fingerprints
//! of file contents. Files are read in fixed-size chunks and fed into an
//! incremental hasher, so memory use is bounded by the chunk size no matter how
//! large the file is.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let hash = hasher.full_hash(Path::new("report.txt")).unwrap();
//! println!("{}", hash_to_hex(&hash));
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::HashError;

/// A 32-byte BLAKE3 digest.
pub type Hash = [u8; 32];

/// Default read chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Length of a hex-encoded fingerprint.
pub const HEX_LEN: usize = 64;

/// Streaming content hasher.
///
/// The hasher holds no per-file state; a fresh BLAKE3 accumulator is created
/// for every call, so one `Hasher` can be reused for a whole scan.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher that reads files in [`DEFAULT_CHUNK_SIZE`] chunks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
        }
    }

    /// Set the read chunk size. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the shutdown flag checked between chunks.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Current read chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash the entire content of a file.
    ///
    /// # Errors
    ///
    /// - [`HashError::NotFound`] if the file does not exist (or a symlink is broken)
    /// - [`HashError::PermissionDenied`] if the file cannot be opened for reading
    /// - [`HashError::Interrupted`] if shutdown was requested mid-file
    /// - [`HashError::Io`] for any other read failure
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| map_io_error(path, e))?;
        self.hash_reader(path, file)
    }

    /// Hash the entire content of a file and return it hex-encoded.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::full_hash`].
    pub fn fingerprint(&self, path: &Path) -> Result<String, HashError> {
        self.full_hash(path).map(|hash| hash_to_hex(&hash))
    }

    /// Hash everything readable from `reader`, chunk by chunk.
    ///
    /// `path` is only used for error reporting.
    fn hash_reader<R: Read>(&self, path: &Path, mut reader: R) -> Result<Hash, HashError> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];
        let mut total: u64 = 0;

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(path.to_path_buf()));
            }

            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io_error(path, e)),
            };

            hasher.update(&buffer[..read]);
            total += read as u64;
        }

        log::trace!("Hashed {} ({} bytes)", path.display(), total);
        Ok(*hasher.finalize().as_bytes())
    }
}

/// Hash an in-memory byte slice.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Encode a hash as a lowercase hexadecimal string.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    let mut out = String::with_capacity(HEX_LEN);
    for byte in hash {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

fn map_io_error(path: &Path, e: io::Error) -> HashError {
    match e.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

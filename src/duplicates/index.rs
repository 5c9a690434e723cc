//! Fingerprint index and duplicate pair types.
//!
//! The [`FingerprintIndex`] maps each fingerprint to the first path that
//! produced it. It is owned by a single scan and never shared.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{hash_to_hex, FileRecord, Hash};

/// A later-encountered file whose content matches an earlier one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    /// The file found to be a duplicate
    pub duplicate: PathBuf,
    /// The first file seen with the same content
    pub original: PathBuf,
    /// Shared content hash
    pub hash: Hash,
    /// Size of the duplicate in bytes
    pub size: u64,
}

impl DuplicatePair {
    /// Hex-encoded fingerprint shared by both files.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }
}

/// Mapping from fingerprint to the first-seen path.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    first_seen: HashMap<Hash, PathBuf>,
}

impl FingerprintIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a record against the index.
    ///
    /// Unseen fingerprints are recorded with this path as the original and
    /// `None` is returned. Seen fingerprints return a [`DuplicatePair`]; the
    /// recorded original is left untouched.
    pub fn classify(&mut self, record: FileRecord) -> Option<DuplicatePair> {
        match self.first_seen.entry(record.hash) {
            Entry::Occupied(original) => Some(DuplicatePair {
                duplicate: record.path,
                original: original.get().clone(),
                hash: record.hash,
                size: record.size,
            }),
            Entry::Vacant(slot) => {
                slot.insert(record.path);
                None
            }
        }
    }

    /// Number of distinct fingerprints seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    /// Whether no fingerprint has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}

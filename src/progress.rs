//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display progress on stderr while the report itself goes to stdout.
//!
//! Two phases are shown:
//! - `hashing`: a spinner counting files and bytes as they are fingerprinted
//! - `relocating`: a bar over the duplicates being moved

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use bytesize::ByteSize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress callback for the scan and relocation phases.
///
/// Implement this trait to receive progress updates. The library never
/// draws anything itself.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ("hashing" or "relocating")
    /// * `total` - Total number of items to process (0 if unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item has been processed, providing its size.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    hashing: Mutex<Option<ProgressBar>>,
    relocating: Mutex<Option<ProgressBar>>,
    hashed_bytes: AtomicU64,
    hidden: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `hidden` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupesweep::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        let multi = if hidden {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::stderr())
        };

        Self {
            multi,
            hashing: Mutex::new(None),
            relocating: Mutex::new(None),
            hashed_bytes: AtomicU64::new(0),
            hidden,
        }
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.green} {msg} [{elapsed_precise}] {pos} files, {prefix}",
        )
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn relocating_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// Run `f` with the bars cleared, e.g. to write a report line to stdout.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.multi.suspend(f)
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.hidden {
            return;
        }

        match phase {
            "hashing" => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                pb.set_prefix(ByteSize::b(0).to_string());
                self.hashed_bytes.store(0, Ordering::Relaxed);
                pb.enable_steady_tick(Duration::from_millis(100));
                if let Ok(mut slot) = self.hashing.lock() {
                    *slot = Some(pb);
                }
            }
            _ => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::relocating_style());
                pb.set_message("Moving duplicates");
                if let Ok(mut slot) = self.relocating.lock() {
                    *slot = Some(pb);
                }
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.hidden {
            return;
        }

        let message = truncate_path(path, 40);
        if let Ok(slot) = self.relocating.lock() {
            if let Some(ref pb) = *slot {
                pb.set_position(current as u64);
                pb.set_message(message);
                return;
            }
        }
        if let Ok(slot) = self.hashing.lock() {
            if let Some(ref pb) = *slot {
                pb.set_position(current as u64);
                pb.set_message(message);
            }
        }
    }

    fn on_item_completed(&self, bytes: u64) {
        if self.hidden {
            return;
        }

        let total = self.hashed_bytes.fetch_add(bytes, Ordering::Relaxed) + bytes;
        if let Ok(slot) = self.hashing.lock() {
            if let Some(ref pb) = *slot {
                pb.set_prefix(ByteSize::b(total).to_string());
            }
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.hidden {
            return;
        }

        let slot = if phase == "hashing" {
            &self.hashing
        } else {
            &self.relocating
        };
        if let Some(pb) = slot.lock().ok().and_then(|mut s| s.take()) {
            pb.finish_and_clear();
        }
    }

    fn on_message(&self, message: &str) {
        if self.hidden {
            return;
        }

        if let Ok(slot) = self.hashing.lock() {
            if let Some(ref pb) = *slot {
                pb.set_message(message.to_string());
            }
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}

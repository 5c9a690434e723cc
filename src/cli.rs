//! Command-line interface definitions for dupesweep.
//!
//! This module defines all CLI arguments using the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Move duplicates under the current directory into ./duplicates
//! dupesweep
//!
//! # Scan a specific tree, quarantining into a custom folder
//! dupesweep ~/Pictures --quarantine dupes
//!
//! # See what would happen, as JSON
//! dupesweep ~/Pictures --dry-run --output json
//!
//! # Verbose mode for debugging
//! dupesweep -v ~/Pictures
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find duplicate files by content and move them into a quarantine folder.
///
/// The first copy of each file found during the walk stays where it is;
/// every later copy is moved into the quarantine directory.
#[derive(Debug, Parser)]
#[command(name = "dupesweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Quarantine directory name or path (relative paths live under ROOT)
    ///
    /// Defaults to `duplicates`.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub quarantine: Option<PathBuf>,

    /// Report what would be moved without moving anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Also scan files already inside the quarantine directory
    #[arg(long)]
    pub include_quarantine: bool,

    /// Process entries in file-system order instead of sorting by name
    ///
    /// Which copy counts as the original then depends on the file system.
    #[arg(long)]
    pub fs_order: bool,

    /// Descend into symlinked directories (links to files are always hashed)
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Read chunk size for hashing (e.g., 4096, 64KiB, 1MB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub chunk_size: Option<u64>,

    /// Highest numeric suffix tried when a name is taken in quarantine
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_suffix: Option<u32>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON document for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupesweep::cli::parse_size;
///
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err("Size cannot be negative".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}

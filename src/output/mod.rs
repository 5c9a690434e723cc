//! Report formatters.
//!
//! - Text, streamed to stdout as each duplicate is moved
//! - JSON, written once the run has finished
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::config::Config;
//! use dupesweep::output::JsonOutput;
//! use dupesweep::sweep::Sweeper;
//! use std::path::Path;
//!
//! let report = Sweeper::new(Path::new("."), Config::default())
//!     .with_dry_run(true)
//!     .run(|_| Ok(()))
//!     .unwrap();
//! println!("{}", JsonOutput::new(&report).to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;

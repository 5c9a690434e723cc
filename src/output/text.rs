//! Human-readable report written while duplicates are being moved.
//!
//! The `Original:`/`Duplicate:` lines go out before the move is attempted, so
//! a failed move still shows which pair it was.
//!
//! ```text
//! ============================================================
//! DUPLICATE FILES DETECTED
//! ============================================================
//!
//! Original: /data/a.txt
//! Duplicate: /data/sub/b.txt
//! Moved to: /data/duplicates/b.txt
//! ------------------------------------------------------------
//!
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::actions::RelocateResult;
use crate::duplicates::DuplicatePair;
use crate::sweep::RunReport;

const RULE_WIDTH: usize = 60;

/// Streaming text reporter.
pub struct TextOutput<W: Write> {
    writer: W,
    color: bool,
    header_written: bool,
}

impl<W: Write> TextOutput<W> {
    /// Create a reporter writing to `writer`.
    pub fn new(writer: W, color: bool) -> Self {
        Self {
            writer,
            color,
            header_written: false,
        }
    }

    fn label(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Write the banner. Only the first call has any effect.
    pub fn write_header(&mut self) -> io::Result<()> {
        if self.header_written {
            return Ok(());
        }
        self.header_written = true;

        let rule = "=".repeat(RULE_WIDTH);
        let title = if self.color {
            "DUPLICATE FILES DETECTED".yellow().bold().to_string()
        } else {
            "DUPLICATE FILES DETECTED".to_string()
        };
        writeln!(self.writer, "{rule}")?;
        writeln!(self.writer, "{title}")?;
        writeln!(self.writer, "{rule}")?;
        writeln!(self.writer)
    }

    /// Write the pair about to be moved, preceded by the banner if needed.
    pub fn write_pair(&mut self, pair: &DuplicatePair) -> io::Result<()> {
        self.write_header()?;

        let original = self.label("Original:");
        let duplicate = self.label("Duplicate:");

        writeln!(self.writer, "{original} {}", pair.original.display())?;
        writeln!(self.writer, "{duplicate} {}", pair.duplicate.display())?;
        self.writer.flush()
    }

    /// Finish the entry started by [`TextOutput::write_pair`].
    pub fn write_destination(&mut self, moved: &RelocateResult) -> io::Result<()> {
        let verb = if moved.dry_run {
            "Would move to:"
        } else {
            "Moved to:"
        };
        let destination = self.label(verb);

        writeln!(self.writer, "{destination} {}", moved.destination.display())?;
        writeln!(self.writer, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(self.writer)?;
        self.writer.flush()
    }

    /// Write the closing lines once the run has finished.
    pub fn write_summary(&mut self, report: &RunReport) -> io::Result<()> {
        if report.moves.is_empty() {
            let line = if self.color {
                "No duplicate files found".green().to_string()
            } else {
                "No duplicate files found".to_string()
            };
            writeln!(self.writer, "{line}")?;
        }

        let action = if report.dry_run {
            "would be moved"
        } else {
            "moved"
        };
        writeln!(
            self.writer,
            "Scanned {} files ({}), {} duplicates {action} to {} ({} reclaimed)",
            report.summary.total_files,
            report.summary.total_size_display(),
            report.moved_count(),
            report.quarantine.display(),
            ByteSize::b(report.moved_bytes()),
        )?;
        self.writer.flush()
    }

    /// Consume the reporter and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

//! Report rendering for the one-shot subcommands.
//!
//! Every report implements both [`Render`] (text) and `Serialize` (JSON);
//! [`OutputWriter`] picks one based on `--output`.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Writes reports in the selected format.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a report to stdout.
    pub fn render<T: Render + Serialize>(&self, report: &T) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(&mut handle, report)
    }

    /// Render a report to an arbitrary writer.
    pub fn render_to<T: Render + Serialize>(&self, w: &mut dyn Write, report: &T) -> Result<()> {
        match self.format {
            OutputFormat::Text => report.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, report)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Human-readable text rendering.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

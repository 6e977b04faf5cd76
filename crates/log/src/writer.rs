//! Writer implementations

use std::io;

use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::WriterConfig;
use crate::core::LogResult;

/// Guards returned alongside a writer that must outlive the logger
/// (kept for symmetry with non-blocking writer setups; currently always empty).
pub type WriterGuards = Vec<()>;

/// Create a writer from configuration
pub fn make_writer(config: &WriterConfig) -> LogResult<(BoxMakeWriter, WriterGuards)> {
    let writer = match config {
        WriterConfig::Stderr => BoxMakeWriter::new(io::stderr),
        WriterConfig::Stdout => BoxMakeWriter::new(io::stdout),
    };

    Ok((writer, Vec::new()))
}

//! Error taxonomy shared by all stages.
//!
//! Five variants with an [`Error::is_per_file`] predicate the batch loop
//! uses to decide skip-vs-abort, plus a crate-wide [`Result`] alias.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced across the decode → probe → render pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Unreadable or missing input file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Symphonia probe/decode rejected the container or codec.
    #[error("unsupported format {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// ffprobe invocation or JSON parse failure (per-file, non-fatal).
    #[error("metadata probe failed for {path}: {reason}")]
    Probe { path: PathBuf, reason: String },

    /// PNG encode or write failure.
    #[error("failed to render {path}: {reason}")]
    Render { path: PathBuf, reason: String },

    /// Invalid CLI path or missing ffprobe binary; fatal before any
    /// processing begins.
    #[error("{0}")]
    Config(String),
}

impl Error {
    /// Whether this error pertains to a single input file and should be
    /// logged-and-skipped rather than aborting the whole batch. Only
    /// [`Error::Config`] is fatal.
    pub fn is_per_file(&self) -> bool {
        !matches!(self, Error::Config(_))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

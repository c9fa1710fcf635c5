//! Spectroview - Batch spectrogram renderer for audio files
//!
//! Turns audio files into labeled spectrogram PNGs: decode to a mono
//! sample buffer, compute a Hann-windowed STFT, convert magnitude to a
//! decibel scale clamped to [-120, 0] dB, and render an inferno heatmap
//! with calibrated mm:ss / kHz axes, a dB colorbar, and a metadata
//! subtitle pulled from the container via ffprobe.
//!
//! ## Module Structure
//!
//! - `core` - Decoding, metadata probing, spectrogram math, rendering
//! - `batch` - Directory traversal and the per-file pipeline loop
//! - `error` - Error taxonomy shared by all stages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spectroview::batch::BatchRunner;
//! use spectroview::core::NullProbe;
//!
//! let runner = BatchRunner::new(Box::new(NullProbe));
//! let summary = runner.run(path)?;
//!
//! println!("rendered {}, skipped {}", summary.rendered, summary.skipped);
//! ```
//!
//! Per-file failures (undecodable content, probe errors, write errors)
//! are logged and skipped; the batch keeps going. Only an invalid input
//! path or a missing ffprobe binary aborts the run.

// Batch traversal and pipeline driver
pub mod batch;

// Decoding, probing, spectrogram computation, rendering
pub mod core;

// Error taxonomy
pub mod error;

// Re-export commonly used types at crate root for convenience
pub use crate::batch::{BatchRunner, BatchSummary};
pub use crate::core::{
    calibrate, compute, decode_audio, AudioBuffer, AxisCalibration, Colormap, DecibelMatrix,
    FfprobeProbe, FigureConfig, MetadataProbe, NullProbe, SpectrogramConfig, Tick, TrackMetadata,
};
pub use crate::error::{Error, Result};

//! Core pipeline stages: decode, probe, transform, render

pub mod decoder;
pub mod dsp;
pub mod format;
pub mod probe;
pub mod spectrogram;
pub mod visualization;

pub use decoder::{decode_audio, AudioBuffer};
pub use probe::{FfprobeProbe, MetadataProbe, NullProbe, TrackMetadata};
pub use spectrogram::{calibrate, compute, AxisCalibration, DecibelMatrix, SpectrogramConfig, Tick};
pub use visualization::{Colormap, FigureConfig};

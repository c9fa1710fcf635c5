//! DSP primitives shared by the spectrogram engine

pub mod fft;
pub mod windows;

pub use fft::FftProcessor;
pub use windows::{create_window, WindowType};

// src/core/spectrogram.rs
//
// Spectrogram computation and axis calibration.
//
// The engine turns a mono sample buffer into a decibel-scaled
// frequency-by-time matrix, referenced to the loudest magnitude in the
// matrix and clamped to a fixed display range. Axis calibration maps
// the matrix extents onto labeled tick positions for the renderer.

use crate::core::decoder::AudioBuffer;
use crate::core::dsp::{FftProcessor, WindowType};
use crate::core::format::format_timestamp;

/// Number of ticks on the time axis (including both endpoints).
const TIME_TICK_COUNT: usize = 13;

/// Spacing of intermediate frequency ticks, in Hz.
const FREQ_TICK_STEP_HZ: f64 = 5000.0;

/// Floor for the decibel reference so silence never produces log(0).
const REFERENCE_EPSILON: f32 = 1e-10;

#[derive(Debug, Clone)]
pub struct SpectrogramConfig {
    pub window_size: usize,
    pub hop_size: usize,
    pub window: WindowType,
    pub min_db: f32,
    pub max_db: f32,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        let window_size = 2048;
        Self {
            window_size,
            hop_size: window_size / 4,
            window: WindowType::Hann,
            min_db: -120.0,
            max_db: 0.0,
        }
    }
}

/// Decibel-scaled spectrogram, indexed `[frequency bin][time frame]`.
///
/// Bin count is `window_size / 2 + 1` (DC through Nyquist). A buffer
/// shorter than one window yields zero frames. Values always lie in
/// `[min_db, max_db]` and are finite.
#[derive(Debug, Clone)]
pub struct DecibelMatrix {
    values: Vec<Vec<f32>>,
    min_db: f32,
    max_db: f32,
}

impl DecibelMatrix {
    pub fn bins(&self) -> usize {
        self.values.len()
    }

    pub fn frames(&self) -> usize {
        self.values.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn value(&self, bin: usize, frame: usize) -> f32 {
        self.values[bin][frame]
    }

    pub fn min_db(&self) -> f32 {
        self.min_db
    }

    pub fn max_db(&self) -> f32 {
        self.max_db
    }
}

/// Compute the decibel spectrogram of a buffer.
pub fn compute(buffer: &AudioBuffer, config: &SpectrogramConfig) -> DecibelMatrix {
    let bins = config.window_size / 2 + 1;
    let frames = if buffer.samples.len() < config.window_size {
        0
    } else {
        (buffer.samples.len() - config.window_size) / config.hop_size + 1
    };

    let mut fft = FftProcessor::new(config.window_size, config.window);
    let mut magnitudes = vec![vec![0.0f32; frames]; bins];

    for frame in 0..frames {
        let start = frame * config.hop_size;
        let spectrum = fft.magnitude_spectrum(&buffer.samples[start..start + config.window_size]);
        for (bin, mag) in spectrum.into_iter().enumerate() {
            magnitudes[bin][frame] = mag;
        }
    }

    // Reference is the loudest magnitude in the whole matrix, so the
    // peak always maps to max_db. Silence floors at min_db.
    let reference = magnitudes
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f32, |acc, &m| acc.max(m))
        .max(REFERENCE_EPSILON);

    let values = magnitudes
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|mag| {
                    if mag > 0.0 {
                        (20.0 * (mag / reference).log10()).clamp(config.min_db, config.max_db)
                    } else {
                        config.min_db
                    }
                })
                .collect()
        })
        .collect();

    DecibelMatrix {
        values,
        min_db: config.min_db,
        max_db: config.max_db,
    }
}

/// One labeled tick position on an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Position in axis units: seconds for time, Hz for frequency.
    pub position: f64,
    pub label: String,
}

/// Tick positions and labels for both plot axes.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisCalibration {
    pub time: Vec<Tick>,
    pub freq: Vec<Tick>,
}

/// Calibrate axis ticks for a clip of the given duration and rate.
///
/// Time: `TIME_TICK_COUNT` evenly spaced ticks over [0, duration],
/// labeled zero-padded `mm:ss`. Frequency: a tick every 5 kHz plus a
/// final tick at the Nyquist frequency rounded to the nearest 1000 Hz,
/// labeled in integer kHz. Zero duration or rate degrades to a single
/// tick at 0 instead of dividing by zero.
pub fn calibrate(duration_secs: f64, sample_rate: u32) -> AxisCalibration {
    AxisCalibration {
        time: time_ticks(duration_secs),
        freq: freq_ticks(sample_rate as f64 / 2.0),
    }
}

fn time_ticks(duration_secs: f64) -> Vec<Tick> {
    if duration_secs <= 0.0 {
        return vec![Tick {
            position: 0.0,
            label: format_timestamp(0.0),
        }];
    }

    (0..TIME_TICK_COUNT)
        .map(|i| {
            let position = duration_secs * i as f64 / (TIME_TICK_COUNT - 1) as f64;
            Tick {
                position,
                label: format_timestamp(position),
            }
        })
        .collect()
}

fn freq_ticks(nyquist_hz: f64) -> Vec<Tick> {
    if nyquist_hz <= 0.0 {
        return vec![Tick {
            position: 0.0,
            label: "0".into(),
        }];
    }

    let rounded_khz = (nyquist_hz / 1000.0).round();
    let final_position = if rounded_khz > 0.0 {
        rounded_khz * 1000.0
    } else {
        nyquist_hz
    };

    let mut ticks = Vec::new();
    let mut hz = 0.0;
    while hz < final_position {
        ticks.push(Tick {
            position: hz,
            label: format!("{}", (hz / 1000.0) as u64),
        });
        hz += FREQ_TICK_STEP_HZ;
    }
    ticks.push(Tick {
        position: final_position,
        label: format!("{}", rounded_khz as u64),
    });
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine_buffer(freq_hz: f32, sample_rate: u32, secs: f32) -> AudioBuffer {
        let n = (sample_rate as f32 * secs) as usize;
        AudioBuffer {
            samples: (0..n)
                .map(|i| (2.0 * PI * freq_hz * i as f32 / sample_rate as f32).sin())
                .collect(),
            sample_rate,
        }
    }

    #[test]
    fn test_empty_buffer_yields_zero_frames() {
        let buffer = AudioBuffer {
            samples: Vec::new(),
            sample_rate: 44100,
        };
        let matrix = compute(&buffer, &SpectrogramConfig::default());
        assert_eq!(matrix.frames(), 0);
        assert_eq!(matrix.bins(), 1025);
    }

    #[test]
    fn test_silent_buffer_floors_at_min_db() {
        let buffer = AudioBuffer {
            samples: vec![0.0; 8192],
            sample_rate: 44100,
        };
        let matrix = compute(&buffer, &SpectrogramConfig::default());
        assert!(matrix.frames() > 0);
        for bin in 0..matrix.bins() {
            for frame in 0..matrix.frames() {
                let v = matrix.value(bin, frame);
                assert!(v.is_finite());
                assert_eq!(v, -120.0);
            }
        }
    }

    #[test]
    fn test_peak_is_zero_db_and_range_clamped() {
        let matrix = compute(&sine_buffer(1000.0, 44100, 0.5), &SpectrogramConfig::default());
        let mut max = f32::NEG_INFINITY;
        let mut min = f32::INFINITY;
        for bin in 0..matrix.bins() {
            for frame in 0..matrix.frames() {
                let v = matrix.value(bin, frame);
                assert!(v.is_finite());
                max = max.max(v);
                min = min.min(v);
            }
        }
        assert_eq!(max, 0.0);
        assert!(min >= -120.0);
    }

    #[test]
    fn test_frame_count_matches_hop() {
        let config = SpectrogramConfig::default();
        let buffer = AudioBuffer {
            samples: vec![0.1; 2048 + 512 * 3],
            sample_rate: 44100,
        };
        assert_eq!(compute(&buffer, &config).frames(), 4);
    }

    #[test]
    fn test_buffer_shorter_than_window_is_degenerate() {
        let buffer = AudioBuffer {
            samples: vec![0.1; 1000],
            sample_rate: 44100,
        };
        assert_eq!(compute(&buffer, &SpectrogramConfig::default()).frames(), 0);
    }

    #[test]
    fn test_calibrate_is_deterministic() {
        assert_eq!(calibrate(225.0, 44100), calibrate(225.0, 44100));
    }

    #[test]
    fn test_time_ticks_span_duration() {
        let cal = calibrate(240.0, 44100);
        assert_eq!(cal.time.len(), 13);
        assert_eq!(cal.time[0].label, "00:00");
        assert_eq!(cal.time.last().unwrap().position, 240.0);
        assert_eq!(cal.time.last().unwrap().label, "04:00");
        for pair in cal.time.windows(2) {
            assert!(pair[0].position < pair[1].position);
        }
    }

    #[test]
    fn test_freq_ticks_44100() {
        let cal = calibrate(10.0, 44100);
        let last = cal.freq.last().unwrap();
        // Nyquist 22050 rounds to a clean 22 kHz final tick.
        assert_eq!(last.position, 22000.0);
        assert_eq!(last.label, "22");
        assert_eq!(cal.freq[0].position, 0.0);
        assert_eq!(cal.freq[0].label, "0");
        assert_eq!(cal.freq[1].position, 5000.0);
        assert_eq!(cal.freq[1].label, "5");
        for pair in cal.freq.windows(2) {
            assert!(pair[0].position < pair[1].position);
        }
    }

    #[test]
    fn test_freq_ticks_drop_step_colliding_with_final() {
        // Nyquist 20050 rounds to 20000, which would duplicate the
        // 20000 step tick; positions must stay strictly increasing.
        let cal = calibrate(10.0, 40100);
        let positions: Vec<f64> = cal.freq.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0.0, 5000.0, 10000.0, 15000.0, 20000.0]);
        for pair in cal.freq.windows(2) {
            assert!(pair[0].position < pair[1].position);
        }
    }

    #[test]
    fn test_degenerate_calibration() {
        let cal = calibrate(0.0, 0);
        assert_eq!(cal.time.len(), 1);
        assert_eq!(cal.time[0].position, 0.0);
        assert_eq!(cal.freq.len(), 1);
        assert_eq!(cal.freq[0].position, 0.0);
    }

    #[test]
    fn test_low_rate_keeps_true_nyquist() {
        // Nyquist 400 Hz rounds to 0 kHz; the final tick falls back to
        // the true Nyquist rather than collapsing onto the origin.
        let cal = calibrate(10.0, 800);
        assert_eq!(cal.freq.last().unwrap().position, 400.0);
        assert_eq!(cal.freq.last().unwrap().label, "0");
    }
}

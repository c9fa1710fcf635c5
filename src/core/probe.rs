// src/core/probe.rs
//
// Container metadata extraction via ffprobe.
//
// The probe is a capability trait so the pipeline can run without
// ffmpeg installed: `FfprobeProbe` shells out to the real tool,
// `NullProbe` returns placeholder text for tests and degraded runs.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::core::format::format_duration;
use crate::error::{Error, Result};

/// Stream-level metadata for one audio file, formatted for the plot
/// subtitle. Built once per file, read once by the renderer.
#[derive(Debug, Clone)]
pub struct TrackMetadata {
    pub codec: String,
    pub bit_rate: Option<u64>,
    pub bits_per_sample: Option<u32>,
    pub channel_layout: String,
    pub sample_rate: Option<u32>,
    pub duration_secs: f64,
}

impl TrackMetadata {
    /// Placeholder used when probing fails or is disabled.
    pub fn placeholder() -> Self {
        Self {
            codec: "metadata unavailable".into(),
            bit_rate: None,
            bits_per_sample: None,
            channel_layout: String::new(),
            sample_rate: None,
            duration_secs: 0.0,
        }
    }

    /// One-line display string:
    /// `codec, bitrate-or-depth, layout, rate Hz, m:s`.
    ///
    /// Bitrate wins over bit depth when both are present and is reported
    /// in kb/s via integer division by 1000.
    pub fn display_line(&self) -> String {
        let rate = match (self.bit_rate, self.bits_per_sample) {
            (Some(bits_per_sec), _) => format!("{} kb/s", bits_per_sec / 1000),
            (None, Some(bits)) => format!("{} bit", bits),
            (None, None) => "unknown".into(),
        };
        let sample_rate = self
            .sample_rate
            .map(|sr| sr.to_string())
            .unwrap_or_else(|| "unknown".into());

        format!(
            "{}, {}, {}, {} Hz, {}",
            self.codec,
            rate,
            self.channel_layout,
            sample_rate,
            format_duration(self.duration_secs)
        )
    }
}

/// Capability interface for container metadata extraction.
pub trait MetadataProbe {
    fn probe(&self, path: &Path) -> Result<TrackMetadata>;
}

/// Probe backed by the external `ffprobe` executable.
pub struct FfprobeProbe {
    executable: PathBuf,
}

impl FfprobeProbe {
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("ffprobe"),
        }
    }

    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Verify the executable runs. Called once at startup; a missing
    /// tool is a fatal configuration error, not a per-file one.
    pub fn check_available(&self) -> Result<()> {
        let ok = Command::new(&self.executable)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if ok {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "{} not found; metadata probing requires ffmpeg on PATH",
                self.executable.display()
            )))
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<TrackMetadata> {
        let output = Command::new(&self.executable)
            .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
            .arg(path)
            .output()
            .map_err(|e| probe_error(path, format!("failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(probe_error(path, format!("ffprobe exited with {}", output.status)));
        }

        parse_report(path, &output.stdout)
    }
}

/// No-op probe returning placeholder metadata.
pub struct NullProbe;

impl MetadataProbe for NullProbe {
    fn probe(&self, _path: &Path) -> Result<TrackMetadata> {
        Ok(TrackMetadata::placeholder())
    }
}

// ffprobe reports numeric fields as JSON strings ("bit_rate": "128000").
#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    streams: Vec<StreamInfo>,
}

#[derive(Debug, Deserialize)]
struct StreamInfo {
    codec_long_name: Option<String>,
    sample_rate: Option<String>,
    bit_rate: Option<String>,
    bits_per_raw_sample: Option<String>,
    channel_layout: Option<String>,
    duration: Option<String>,
}

fn parse_report(path: &Path, json: &[u8]) -> Result<TrackMetadata> {
    let report: ProbeReport = serde_json::from_slice(json)
        .map_err(|e| probe_error(path, format!("unparseable ffprobe output: {}", e)))?;

    let stream = report
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| probe_error(path, "no streams reported".into()))?;

    Ok(TrackMetadata {
        codec: stream.codec_long_name.unwrap_or_else(|| "unknown".into()),
        bit_rate: stream.bit_rate.and_then(|s| s.parse().ok()),
        bits_per_sample: stream.bits_per_raw_sample.and_then(|s| s.parse().ok()),
        channel_layout: stream.channel_layout.unwrap_or_else(|| "unknown".into()),
        sample_rate: stream.sample_rate.and_then(|s| s.parse().ok()),
        duration_secs: stream
            .duration
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0),
    })
}

fn probe_error(path: &Path, reason: String) -> Error {
    Error::Probe {
        path: path.to_path_buf(),
        reason,
    }
}

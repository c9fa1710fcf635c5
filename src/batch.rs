// src/batch.rs
//
// Batch driver: resolve the input path to a list of audio files and run
// the probe -> decode -> transform -> render pipeline over each one.
// Per-file failures are logged and skipped; only a bad input path
// aborts the run.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use walkdir::WalkDir;

use crate::core::decoder::decode_audio;
use crate::core::probe::{MetadataProbe, TrackMetadata};
use crate::core::spectrogram::{calibrate, compute, SpectrogramConfig};
use crate::core::visualization::{render, FigureConfig};
use crate::error::{Error, Result};

/// Extensions accepted by the directory walk (case-insensitive).
pub const AUDIO_EXTENSIONS: [&str; 4] = ["m4a", "mp3", "flac", "wav"];

/// Outcome of one batch run. Skipped files are surfaced, not silently
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub rendered: usize,
    pub skipped: usize,
}

pub struct BatchRunner {
    probe: Box<dyn MetadataProbe>,
    spectrogram: SpectrogramConfig,
    figure: FigureConfig,
}

impl BatchRunner {
    pub fn new(probe: Box<dyn MetadataProbe>) -> Self {
        Self {
            probe,
            spectrogram: SpectrogramConfig::default(),
            figure: FigureConfig::default(),
        }
    }

    /// Process every audio file under `input`, writing one PNG next to
    /// each source file. Returns the rendered/skipped counts.
    pub fn run(&self, input: &Path) -> Result<BatchSummary> {
        let files = collect_audio_files(input)?;
        if files.is_empty() {
            warn!("no audio files found under {}", input.display());
            return Ok(BatchSummary {
                rendered: 0,
                skipped: 0,
            });
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} Rendering [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap()
            .progress_chars("#>-"),
        );

        let mut summary = BatchSummary {
            rendered: 0,
            skipped: 0,
        };

        for (i, file) in files.iter().enumerate() {
            info!("processing file {}/{}: {}", i + 1, files.len(), file.display());
            pb.set_message(
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );

            match self.process_file(file) {
                Ok(()) => summary.rendered += 1,
                Err(e) if e.is_per_file() => {
                    warn!("skipping {}: {}", file.display(), e);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
            pb.inc(1);
        }

        pb.finish_with_message("done");
        Ok(summary)
    }

    fn process_file(&self, path: &Path) -> Result<()> {
        // A failed probe downgrades to placeholder metadata; it must
        // not cost us the spectrogram itself.
        let metadata = match self.probe.probe(path) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("{}", e);
                TrackMetadata::placeholder()
            }
        };

        let buffer = decode_audio(path)?;
        let matrix = compute(&buffer, &self.spectrogram);
        let calibration = calibrate(buffer.duration_secs(), buffer.sample_rate);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        render(
            &matrix,
            &calibration,
            buffer.sample_rate as f64 / 2.0,
            &format!("'{}' spectrogram", name),
            &metadata.display_line(),
            &output_path_for(path),
            &self.figure,
        )
    }
}

/// Resolve `input` to the list of files to process: a single file is
/// taken as-is, a directory is walked recursively and filtered by
/// extension. Entries are sorted by file name so batch order is
/// deterministic.
pub fn collect_audio_files(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(Error::Config(format!(
            "input path does not exist: {}",
            input.display()
        )));
    }

    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let files = WalkDir::new(input)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_audio_extension(p))
        .collect();

    Ok(files)
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Derive the output PNG path from the input path:
/// `<parent>/<stem>_<ext>_spectrogram.png`.
pub fn output_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    path.with_file_name(format!("{}_{}_spectrogram.png", stem, ext))
}

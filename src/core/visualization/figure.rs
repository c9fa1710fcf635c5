// src/core/visualization/figure.rs
//
// Spectrogram plot assembly.
//
// A `Figure` is an explicit value: create it, apply drawing steps, then
// `save` consumes it. Nothing is shared between figures, so repeated or
// concurrent renders cannot cross-contaminate. The PNG is written to a
// temporary sibling path and renamed into place, so a failed render
// never leaves a partial file at the final path.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::core::spectrogram::{AxisCalibration, DecibelMatrix, Tick};
use crate::core::visualization::colormap::Colormap;
use crate::core::visualization::text::{draw_text, draw_text_vertical, text_width};
use crate::error::{Error, Result};

// 14x7 source units at 100 px per unit.
const DEFAULT_WIDTH: u32 = 1400;
const DEFAULT_HEIGHT: u32 = 700;

const MARGIN_LEFT: u32 = 90;
const MARGIN_RIGHT: u32 = 120;
const MARGIN_TOP: u32 = 70;
const MARGIN_BOTTOM: u32 = 70;

const COLORBAR_GAP: u32 = 30;
const COLORBAR_WIDTH: u32 = 25;
const COLORBAR_LABEL_STEP_DB: f32 = 20.0;

const TICK_LEN: u32 = 5;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
    pub colormap: Colormap,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            colormap: Colormap::Inferno,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

impl PlotArea {
    fn right(&self) -> u32 {
        self.left + self.width
    }

    fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

pub struct Figure {
    img: RgbImage,
    plot: PlotArea,
    colormap: Colormap,
}

impl Figure {
    pub fn new(config: &FigureConfig) -> Self {
        let width = config.width.max(MARGIN_LEFT + MARGIN_RIGHT + 1);
        let height = config.height.max(MARGIN_TOP + MARGIN_BOTTOM + 1);
        Self {
            img: RgbImage::from_pixel(width, height, BACKGROUND),
            plot: PlotArea {
                left: MARGIN_LEFT,
                top: MARGIN_TOP,
                width: width - MARGIN_LEFT - MARGIN_RIGHT,
                height: height - MARGIN_TOP - MARGIN_BOTTOM,
            },
            colormap: config.colormap,
        }
    }

    /// Paint the decibel matrix into the plot area, origin bottom-left,
    /// nearest-neighbor sampled to the pixel grid.
    pub fn draw_heatmap(&mut self, matrix: &DecibelMatrix) {
        let (bins, frames) = (matrix.bins(), matrix.frames());
        if bins == 0 || frames == 0 {
            return;
        }
        let span = (matrix.max_db() - matrix.min_db()).max(f32::EPSILON);

        for py in 0..self.plot.height {
            // Bottom pixel row maps to bin 0.
            let frac = 1.0 - (py as f32 + 0.5) / self.plot.height as f32;
            let bin = ((frac * bins as f32) as usize).min(bins - 1);
            for px in 0..self.plot.width {
                let frame =
                    (((px as f32 + 0.5) / self.plot.width as f32 * frames as f32) as usize)
                        .min(frames - 1);
                let t = (matrix.value(bin, frame) - matrix.min_db()) / span;
                self.img
                    .put_pixel(self.plot.left + px, self.plot.top + py, self.colormap.sample(t));
            }
        }
    }

    pub fn draw_axes(&mut self) {
        for dy in 0..=self.plot.height {
            self.img.put_pixel(self.plot.left, self.plot.top + dy, INK);
        }
        for dx in 0..=self.plot.width {
            self.img.put_pixel(self.plot.left + dx, self.plot.bottom(), INK);
        }
    }

    /// Tick marks and `mm:ss` labels along the bottom edge, plus the
    /// axis caption.
    pub fn draw_time_axis(&mut self, ticks: &[Tick]) {
        let max = ticks.last().map(|t| t.position).unwrap_or(0.0);

        for tick in ticks {
            let x = if max > 0.0 {
                self.plot.left + ((tick.position / max) * self.plot.width as f64) as u32
            } else {
                self.plot.left
            }
            .min(self.plot.right());

            for dy in 0..TICK_LEN {
                self.img.put_pixel(x, self.plot.bottom() + dy, INK);
            }
            draw_text(
                &mut self.img,
                x as i32 - text_width(&tick.label, 1) as i32 / 2,
                (self.plot.bottom() + 8) as i32,
                &tick.label,
                1,
                INK,
            );
        }

        let caption = "Time (mm:ss)";
        let img_height = self.img.height() as i32;
        draw_text(
            &mut self.img,
            (self.plot.left + self.plot.width / 2) as i32 - text_width(caption, 2) as i32 / 2,
            img_height - 24,
            caption,
            2,
            INK,
        );
    }

    /// Tick marks and kHz labels along the left edge, plus the vertical
    /// axis caption. `nyquist_hz` is the true axis maximum; tick
    /// positions beyond it (a rounded-up final tick) clamp to the top.
    pub fn draw_freq_axis(&mut self, ticks: &[Tick], nyquist_hz: f64) {
        for tick in ticks {
            let y = if nyquist_hz > 0.0 {
                let frac = (tick.position / nyquist_hz).clamp(0.0, 1.0);
                self.plot.bottom() - (frac * self.plot.height as f64) as u32
            } else {
                self.plot.bottom()
            };

            for dx in 1..=TICK_LEN {
                self.img.put_pixel(self.plot.left - dx, y, INK);
            }
            draw_text(
                &mut self.img,
                self.plot.left as i32 - 8 - text_width(&tick.label, 1) as i32,
                y as i32 - 4,
                &tick.label,
                1,
                INK,
            );
        }

        let caption = "Frequency (kHz)";
        draw_text_vertical(
            &mut self.img,
            14,
            (self.plot.top + self.plot.height / 2) as i32 + text_width(caption, 2) as i32 / 2,
            caption,
            2,
            INK,
        );
    }

    /// Vertical gradient bar right of the plot, labeled in dB with an
    /// explicit sign (`+0 dB`, `-40 dB`).
    pub fn draw_colorbar(&mut self, min_db: f32, max_db: f32) {
        let bar_x = self.plot.right() + COLORBAR_GAP;
        let span = (max_db - min_db).max(f32::EPSILON);

        for i in 0..self.plot.height {
            let t = 1.0 - (i as f32 + 0.5) / self.plot.height as f32;
            let color = self.colormap.sample(t);
            for j in 0..COLORBAR_WIDTH {
                self.img.put_pixel(bar_x + j, self.plot.top + i, color);
            }
        }

        for i in 0..self.plot.height {
            self.img.put_pixel(bar_x, self.plot.top + i, INK);
            self.img.put_pixel(bar_x + COLORBAR_WIDTH - 1, self.plot.top + i, INK);
        }
        for j in 0..COLORBAR_WIDTH {
            self.img.put_pixel(bar_x + j, self.plot.top, INK);
            self.img.put_pixel(bar_x + j, self.plot.bottom() - 1, INK);
        }

        let mut db = max_db;
        while db >= min_db - 0.5 {
            let y = self.plot.top + (((max_db - db) / span) * self.plot.height as f32) as u32;
            let y = y.min(self.plot.bottom() - 1);
            for dx in 0..4 {
                self.img.put_pixel(bar_x + COLORBAR_WIDTH + dx, y, INK);
            }
            draw_text(
                &mut self.img,
                (bar_x + COLORBAR_WIDTH + 6) as i32,
                y as i32 - 4,
                &format!("{:+.0} dB", db),
                1,
                INK,
            );
            db -= COLORBAR_LABEL_STEP_DB;
        }
    }

    /// Two-line header: file name suptitle over the metadata subtitle.
    pub fn draw_titles(&mut self, suptitle: &str, subtitle: &str) {
        let center = self.img.width() as i32 / 2;
        draw_text(
            &mut self.img,
            center - text_width(suptitle, 2) as i32 / 2,
            14,
            suptitle,
            2,
            INK,
        );
        draw_text(
            &mut self.img,
            center - text_width(subtitle, 1) as i32 / 2,
            44,
            subtitle,
            1,
            INK,
        );
    }

    /// Encode to PNG, consuming the figure. Writes `<name>.tmp` next to
    /// the target and renames over it once the encode has finished.
    pub fn save(self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .ok_or_else(|| render_error(path, "output path has no file name".into()))?;
        let tmp = path.with_file_name(format!("{}.tmp", name.to_string_lossy()));

        if let Err(e) = self.img.save_with_format(&tmp, ImageFormat::Png) {
            let _ = std::fs::remove_file(&tmp);
            return Err(render_error(path, e.to_string()));
        }
        std::fs::rename(&tmp, path).map_err(|e| render_error(path, e.to_string()))
    }
}

/// Draw the complete plot and write it to `output_path`.
pub fn render(
    matrix: &DecibelMatrix,
    calibration: &AxisCalibration,
    nyquist_hz: f64,
    suptitle: &str,
    subtitle: &str,
    output_path: &Path,
    config: &FigureConfig,
) -> Result<()> {
    let mut figure = Figure::new(config);
    figure.draw_heatmap(matrix);
    figure.draw_axes();
    figure.draw_time_axis(&calibration.time);
    figure.draw_freq_axis(&calibration.freq, nyquist_hz);
    figure.draw_colorbar(matrix.min_db(), matrix.max_db());
    figure.draw_titles(suptitle, subtitle);
    figure.save(output_path)
}

fn render_error(path: &Path, reason: String) -> Error {
    Error::Render {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoder::AudioBuffer;
    use crate::core::spectrogram::{calibrate, compute, SpectrogramConfig};
    use std::f32::consts::PI;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spectroview-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn test_matrix() -> (DecibelMatrix, AxisCalibration, f64) {
        let sample_rate = 8000;
        let buffer = AudioBuffer {
            samples: (0..8000)
                .map(|i| (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin())
                .collect(),
            sample_rate,
        };
        let matrix = compute(&buffer, &SpectrogramConfig::default());
        let calibration = calibrate(buffer.duration_secs(), sample_rate);
        (matrix, calibration, sample_rate as f64 / 2.0)
    }

    #[test]
    fn test_render_writes_png_and_no_temp_residue() {
        let dir = temp_dir();
        let out = dir.join("tone_spectrogram.png");
        let (matrix, calibration, nyquist) = test_matrix();

        render(
            &matrix,
            &calibration,
            nyquist,
            "'tone.wav' spectrogram",
            "test subtitle",
            &out,
            &FigureConfig::default(),
        )
        .unwrap();

        assert!(out.exists());
        assert_eq!(image::image_dimensions(&out).unwrap(), (1400, 700));
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_render_overwrites_existing_output() {
        let dir = temp_dir();
        let out = dir.join("tone_spectrogram.png");
        std::fs::write(&out, b"stale").unwrap();
        let (matrix, calibration, nyquist) = test_matrix();

        render(
            &matrix,
            &calibration,
            nyquist,
            "'tone.wav' spectrogram",
            "",
            &out,
            &FigureConfig::default(),
        )
        .unwrap();

        assert!(std::fs::metadata(&out).unwrap().len() > 5);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory_is_render_error() {
        let out = PathBuf::from("/nonexistent-dir/tone_spectrogram.png");
        let (matrix, calibration, nyquist) = test_matrix();
        let err = render(
            &matrix,
            &calibration,
            nyquist,
            "t",
            "",
            &out,
            &FigureConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Render { .. }));
    }

    #[test]
    fn test_degenerate_matrix_still_renders() {
        let dir = temp_dir();
        let out = dir.join("empty_spectrogram.png");
        let empty = AudioBuffer {
            samples: Vec::new(),
            sample_rate: 44100,
        };
        let matrix = compute(&empty, &SpectrogramConfig::default());
        let calibration = calibrate(0.0, 44100);

        render(&matrix, &calibration, 22050.0, "t", "", &out, &FigureConfig::default()).unwrap();
        assert!(out.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

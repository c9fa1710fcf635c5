// src/core/visualization/colormap.rs
//
// Perceptual colormaps for the spectrogram heatmap, as piecewise-linear
// ramps over 11 anchor colors.

use image::Rgb;

/// Color map for spectrogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    Inferno,
    Viridis,
    Grayscale,
}

impl Default for Colormap {
    fn default() -> Self {
        Self::Inferno
    }
}

const INFERNO: [[u8; 3]; 11] = [
    [0, 0, 4],
    [22, 11, 57],
    [66, 10, 104],
    [106, 23, 110],
    [147, 38, 103],
    [188, 55, 84],
    [221, 81, 58],
    [243, 120, 25],
    [252, 165, 10],
    [246, 215, 70],
    [252, 255, 164],
];

const VIRIDIS: [[u8; 3]; 11] = [
    [68, 1, 84],
    [72, 40, 120],
    [62, 74, 137],
    [49, 104, 142],
    [38, 130, 142],
    [31, 158, 137],
    [53, 183, 121],
    [109, 205, 89],
    [180, 222, 44],
    [223, 227, 24],
    [253, 231, 37],
];

impl Colormap {
    /// Sample the map at `t` in [0, 1]; 0 is the quietest color, 1 the
    /// loudest. Out-of-range values clamp to the ends.
    pub fn sample(self, t: f32) -> Rgb<u8> {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Colormap::Inferno => lerp_anchors(&INFERNO, t),
            Colormap::Viridis => lerp_anchors(&VIRIDIS, t),
            Colormap::Grayscale => {
                let v = (t * 255.0) as u8;
                Rgb([v, v, v])
            }
        }
    }
}

fn lerp_anchors(anchors: &[[u8; 3]; 11], t: f32) -> Rgb<u8> {
    let scaled = t * (anchors.len() - 1) as f32;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(anchors.len() - 1);
    let frac = scaled - lo as f32;

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let a = anchors[lo][i] as f32;
        let b = anchors[hi][i] as f32;
        *channel = (a + (b - a) * frac).round() as u8;
    }
    Rgb(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inferno_endpoints() {
        assert_eq!(Colormap::Inferno.sample(0.0), Rgb([0, 0, 4]));
        assert_eq!(Colormap::Inferno.sample(1.0), Rgb([252, 255, 164]));
    }

    #[test]
    fn test_grayscale_is_neutral() {
        let Rgb([r, g, b]) = Colormap::Grayscale.sample(0.5);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(Colormap::Viridis.sample(-3.0), Colormap::Viridis.sample(0.0));
        assert_eq!(Colormap::Viridis.sample(9.0), Colormap::Viridis.sample(1.0));
        assert_eq!(Colormap::Inferno.sample(f32::NAN), Colormap::Inferno.sample(0.0));
    }

    #[test]
    fn test_inferno_brightness_increases() {
        let luma = |t: f32| {
            let Rgb([r, g, b]) = Colormap::Inferno.sample(t);
            0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
        };
        assert!(luma(0.0) < luma(0.5));
        assert!(luma(0.5) < luma(1.0));
    }
}

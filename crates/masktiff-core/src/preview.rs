//! Preview rendering for the interactive alignment loop.
//!
//! Diffraction images have a huge dynamic range dominated by a few hot
//! pixels, so a naive min/max display shows a black rectangle. The preview
//! windows intensities around the median (with adjustable crop factors for
//! the low and high sides), reduces the result to a screen-sized 8-bit
//! thumbnail, and tints masked regions so the user can judge orientation at
//! a glance.
//!
//! Rendering is pure: the frontend hands in data, the current mask
//! candidate, and view settings, and receives RGBA pixels for the widget
//! layer.

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma};
use serde::{Deserialize, Serialize};

use crate::decode::ImageData;
use crate::mask::Mask;

/// Overlay color for masked regions (warm red, like the mask colormaps of
/// common diffraction tools).
const MASK_TINT: [f64; 3] = [230.0, 80.0, 30.0];

/// Overlay opacity for masked regions.
const MASK_ALPHA: f64 = 0.2;

/// Display settings for preview rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Maximum edge length of the rendered preview in pixels.
    pub max_edge: u32,
    /// Crop factor for the low-intensity side of the display window.
    pub crop_factor_low: f64,
    /// Crop factor for the high-intensity side of the display window.
    pub crop_factor_high: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            max_edge: 1500,
            crop_factor_low: 1.0,
            crop_factor_high: 1.0,
        }
    }
}

/// An intensity display window computed from image statistics.
///
/// The window is centered on the median: the low bound pulls in a tenth of
/// the median-to-minimum span (scaled by the low crop factor), the high
/// bound a tenth of the median-to-maximum span (scaled by the high crop
/// factor). A uniform intensity shift moves median, minimum and maximum
/// together, so shifted data renders identically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityWindow {
    /// Intensity mapped to black.
    pub low: f64,
    /// Intensity mapped to white.
    pub high: f64,
}

impl IntensityWindow {
    /// Compute a display window from raw samples.
    pub fn from_samples(samples: &[f64], crop_factor_low: f64, crop_factor_high: f64) -> Self {
        if samples.is_empty() {
            return Self { low: 0.0, high: 1.0 };
        }

        let mut sorted = samples.to_vec();
        let mid = sorted.len() / 2;
        let (_, median, _) = sorted.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        let median = *median;

        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });

        let low = median - (median - min) * 0.1 * crop_factor_low;
        let high = median + (max - median) * 0.1 * crop_factor_high;

        if high > low {
            Self { low, high }
        } else {
            // Degenerate window (constant image or zero crop factors):
            // fall back to the full range.
            Self {
                low: min,
                high: if max > min { max } else { min + 1.0 },
            }
        }
    }

    /// Map a sample to an 8-bit display level.
    #[inline]
    pub fn level(&self, value: f64) -> u8 {
        let t = (value - self.low) / (self.high - self.low);
        (t.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// A rendered preview with RGBA pixel data.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    /// Preview width in pixels.
    pub width: u32,
    /// Preview height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

/// Render a preview of the data with the current mask candidate overlaid.
///
/// The data is windowed to 8-bit gray and resized to fit
/// `settings.max_edge`; the mask (if any) is resized to the same thumbnail
/// dimensions with nearest-neighbor sampling and blended on top as a warm
/// tint. Resizing the mask to the data thumbnail keeps the overlay visible
/// even while shapes still disagree, which is exactly when the user needs
/// to see what a rotation would do; shape equality is enforced at apply
/// time, not here.
pub fn render_preview(
    data: &ImageData,
    mask: Option<&Mask>,
    settings: &ViewSettings,
) -> PreviewImage {
    let window = IntensityWindow::from_samples(
        &data.samples,
        settings.crop_factor_low,
        settings.crop_factor_high,
    );

    let gray: GrayImage = ImageBuffer::from_fn(data.width.max(1), data.height.max(1), |x, y| {
        if x < data.width && y < data.height {
            Luma([window.level(data.sample(y as usize, x as usize))])
        } else {
            Luma([0])
        }
    });

    let (preview_width, preview_height) =
        fit_dimensions(gray.width(), gray.height(), settings.max_edge.max(1));
    let base = imageops::resize(&gray, preview_width, preview_height, FilterType::Triangle);

    let overlay = mask.map(|m| {
        let mask_gray: GrayImage = ImageBuffer::from_fn(m.width.max(1), m.height.max(1), |x, y| {
            if x < m.width && y < m.height && m.is_masked(y as usize, x as usize) {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        imageops::resize(&mask_gray, preview_width, preview_height, FilterType::Nearest)
    });

    let mut pixels = Vec::with_capacity((preview_width * preview_height * 4) as usize);
    for y in 0..preview_height {
        for x in 0..preview_width {
            let level = f64::from(base.get_pixel(x, y).0[0]);
            let masked = overlay
                .as_ref()
                .is_some_and(|m| m.get_pixel(x, y).0[0] > 0);

            if masked {
                for channel in 0..3 {
                    let blended = level * (1.0 - MASK_ALPHA) + MASK_TINT[channel] * MASK_ALPHA;
                    pixels.push(blended.clamp(0.0, 255.0).round() as u8);
                }
            } else {
                let g = level.round() as u8;
                pixels.extend_from_slice(&[g, g, g]);
            }
            pixels.push(255);
        }
    }

    PreviewImage {
        width: preview_width,
        height: preview_height,
        pixels,
    }
}

/// Calculate dimensions to fit within max_edge while preserving aspect ratio.
fn fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_width = max_edge;
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (new_width, new_height.max(1))
    } else {
        let new_height = max_edge;
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), new_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::SampleFormat;

    fn image_of(width: u32, height: u32, samples: Vec<f64>) -> ImageData {
        ImageData::new(width, height, samples, SampleFormat::Unsigned)
    }

    #[test]
    fn test_window_from_known_samples() {
        // min 0, median 4, max 8
        let samples = vec![0.0, 2.0, 4.0, 6.0, 8.0];
        let window = IntensityWindow::from_samples(&samples, 1.0, 1.0);

        assert_eq!(window.low, 4.0 - 0.4);
        assert_eq!(window.high, 4.0 + 0.4);
    }

    #[test]
    fn test_window_crop_factors_widen() {
        let samples = vec![0.0, 2.0, 4.0, 6.0, 8.0];
        let narrow = IntensityWindow::from_samples(&samples, 1.0, 1.0);
        let wide = IntensityWindow::from_samples(&samples, 10.0, 10.0);

        assert!(wide.low < narrow.low);
        assert!(wide.high > narrow.high);
    }

    #[test]
    fn test_window_shift_invariant() {
        let samples = vec![0.0, 2.0, 4.0, 6.0, 8.0];
        let shifted: Vec<f64> = samples.iter().map(|v| v + 100.0).collect();

        let a = IntensityWindow::from_samples(&samples, 1.0, 1.0);
        let b = IntensityWindow::from_samples(&shifted, 1.0, 1.0);

        assert!((b.low - a.low - 100.0).abs() < 1e-9);
        assert!((b.high - a.high - 100.0).abs() < 1e-9);
        // Same normalized levels either way
        assert_eq!(a.level(4.0), b.level(104.0));
    }

    #[test]
    fn test_window_constant_image() {
        let window = IntensityWindow::from_samples(&[5.0; 9], 1.0, 1.0);
        assert!(window.high > window.low);
        assert_eq!(window.level(5.0), 0);
    }

    #[test]
    fn test_window_empty_samples() {
        let window = IntensityWindow::from_samples(&[], 1.0, 1.0);
        assert!(window.high > window.low);
    }

    #[test]
    fn test_level_clamps() {
        let window = IntensityWindow { low: 0.0, high: 10.0 };
        assert_eq!(window.level(-5.0), 0);
        assert_eq!(window.level(0.0), 0);
        assert_eq!(window.level(10.0), 255);
        assert_eq!(window.level(1000.0), 255);
        assert_eq!(window.level(5.0), 128);
    }

    #[test]
    fn test_render_small_image_keeps_dimensions() {
        let data = image_of(4, 3, (0..12).map(f64::from).collect());
        let preview = render_preview(&data, None, &ViewSettings::default());

        assert_eq!(preview.width, 4);
        assert_eq!(preview.height, 3);
        assert_eq!(preview.pixels.len(), 4 * 3 * 4);
    }

    #[test]
    fn test_render_resizes_to_max_edge() {
        let data = image_of(100, 50, vec![1.0; 5000]);
        let settings = ViewSettings {
            max_edge: 10,
            ..ViewSettings::default()
        };
        let preview = render_preview(&data, None, &settings);

        assert_eq!(preview.width, 10);
        assert_eq!(preview.height, 5);
    }

    #[test]
    fn test_render_without_mask_is_gray() {
        let data = image_of(2, 2, vec![0.0, 100.0, 200.0, 300.0]);
        let preview = render_preview(&data, None, &ViewSettings::default());

        for pixel in preview.pixels.chunks_exact(4) {
            assert_eq!(pixel[0], pixel[1]);
            assert_eq!(pixel[1], pixel[2]);
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn test_render_mask_tints_masked_pixels() {
        let data = image_of(2, 1, vec![100.0, 100.0]);
        let mask = Mask::new(2, 1, vec![true, false]);
        let preview = render_preview(&data, Some(&mask), &ViewSettings::default());

        let masked = &preview.pixels[0..4];
        let clear = &preview.pixels[4..8];

        // Tinted pixel leans red
        assert!(masked[0] > masked[2], "expected warm tint, got {masked:?}");
        // Clear pixel stays gray
        assert_eq!(clear[0], clear[1]);
        assert_eq!(clear[1], clear[2]);
    }

    #[test]
    fn test_render_mismatched_mask_still_renders() {
        let data = image_of(8, 4, vec![10.0; 32]);
        let mask = Mask::new(4, 8, vec![true; 32]);

        let preview = render_preview(&data, Some(&mask), &ViewSettings::default());
        assert_eq!(preview.width, 8);
        assert_eq!(preview.height, 4);
    }

    #[test]
    fn test_fit_dimensions() {
        assert_eq!(fit_dimensions(100, 50, 200), (100, 50));
        assert_eq!(fit_dimensions(400, 200, 100), (100, 50));
        assert_eq!(fit_dimensions(200, 400, 100), (50, 100));
        assert_eq!(fit_dimensions(1000, 1, 10), (10, 1));
    }
}

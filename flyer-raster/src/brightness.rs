//! Background brightness analysis.
//!
//! Flyer text sits over the upper part of the background photo; the
//! bottom band is reserved for the photographic subject. This pass
//! finds bright pixels in the eligible rows: grayscale, threshold,
//! then a morphological closing to smooth speckle into solid regions
//! a contrast overlay can cover.

use flyer_core::SafeArea;

use crate::mask::Mask;
use crate::pixels::PixelBuffer;

/// Tuning knobs for the brightness analysis.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Grayscale value a pixel must exceed to count as bright.
    pub brightness_threshold: u8,
    /// Fraction of the image height, from the top, that is eligible
    /// for masking. Rows at or below this boundary are left alone.
    pub roi_top_fraction: f32,
    /// Radius of the square closing element (side `2 * radius + 1`).
    pub kernel_radius: usize,
    /// How many dilate and erode passes the closing runs.
    pub iterations: usize,
    /// Fraction of bright pixels at or above which a candidate text
    /// area counts as already clear.
    pub clear_threshold: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            brightness_threshold: 180,
            roi_top_fraction: 0.7,
            kernel_radius: 2,
            iterations: 2,
            clear_threshold: 0.8,
        }
    }
}

/// Result of analyzing one background image.
#[derive(Debug, Clone)]
pub struct BrightnessAnalysis {
    /// Bright-region mask over the full image, set cells marking
    /// pixels an overlay should cover.
    pub mask: Mask,
    /// Fraction of region-of-interest pixels that ended up masked.
    pub bright_fraction: f32,
}

/// Find the bright regions in the eligible part of a background image.
///
/// Pixels count as bright when their grayscale value exceeds the
/// threshold and their row lies above the region-of-interest boundary,
/// the top `roi_top_fraction` of the image height. The reserved band
/// below the boundary is never masked. The thresholded mask is then
/// closed to fill pinholes.
#[must_use]
pub fn analyze(buffer: &PixelBuffer, config: &AnalysisConfig) -> BrightnessAnalysis {
    let gray = buffer.grayscale();
    let (width, height) = (buffer.width(), buffer.height());
    let boundary = roi_boundary_row(height, config.roi_top_fraction);

    let mut mask = Mask::new(width, height);
    for y in 0..boundary {
        for x in 0..width {
            let value = gray[y as usize * width as usize + x as usize];
            if value > config.brightness_threshold {
                mask.set(x, y, true);
            }
        }
    }
    let mask = mask.close(config.kernel_radius, config.iterations);

    let bright_fraction = roi_masked_fraction(&mask, boundary);
    tracing::debug!(
        width,
        height,
        boundary,
        bright_fraction,
        "background analyzed"
    );
    BrightnessAnalysis {
        mask,
        bright_fraction,
    }
}

/// Fraction of pixels inside a candidate text area that are brighter
/// than the threshold. The area is clipped to the image bounds.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn region_clear_fraction(
    buffer: &PixelBuffer,
    area: &SafeArea,
    config: &AnalysisConfig,
) -> f32 {
    let gray = buffer.grayscale();
    let (width, height) = (buffer.width(), buffer.height());

    let x0 = clamp_coord(area.x, width);
    let y0 = clamp_coord(area.y, height);
    let x1 = clamp_coord(area.x + area.width, width);
    let y1 = clamp_coord(area.y + area.height, height);
    if x0 >= x1 || y0 >= y1 {
        return 0.0;
    }

    let mut bright = 0usize;
    for y in y0..y1 {
        for x in x0..x1 {
            if gray[y as usize * width as usize + x as usize] > config.brightness_threshold {
                bright += 1;
            }
        }
    }
    let total = (x1 - x0) as usize * (y1 - y0) as usize;
    bright as f32 / total as f32
}

/// Whether a candidate text area needs a contrast mask: true when the
/// fraction of bright pixels falls below the clear threshold.
#[must_use]
pub fn needs_masking(buffer: &PixelBuffer, area: &SafeArea, config: &AnalysisConfig) -> bool {
    region_clear_fraction(buffer, area, config) < config.clear_threshold
}

/// First row past the eligible region: `floor(height * fraction)`,
/// clamped to the image. The product is taken in `f32`, so `0.7` of
/// 100 rows is row 70, not 69.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn roi_boundary_row(height: u32, fraction: f32) -> u32 {
    let row = (height as f32 * fraction).floor();
    (row.max(0.0) as u32).min(height)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_coord(value: f32, max: u32) -> u32 {
    (value.max(0.0).floor() as u32).min(max)
}

#[allow(clippy::cast_precision_loss)]
fn roi_masked_fraction(mask: &Mask, boundary: u32) -> f32 {
    let width = mask.width();
    if boundary == 0 || width == 0 {
        return 0.0;
    }
    let mut set = 0usize;
    for y in 0..boundary {
        for x in 0..width {
            if mask.get(x, y) {
                set += 1;
            }
        }
    }
    let total = width as usize * boundary as usize;
    set as f32 / total as f32
}

//! Safe text area detection.
//!
//! Walks the background in fixed-size blocks and keeps the ones bright
//! enough to carry dark text. When nothing qualifies, a margin-derived
//! default box covers the usual flyer text zone.

use flyer_core::SafeArea;

use crate::pixels::PixelBuffer;

/// Tuning knobs for safe-area detection.
#[derive(Debug, Clone)]
pub struct SafeAreaConfig {
    /// Side length of the scanned blocks, in pixels.
    pub block_size: u32,
    /// Mean of the color channels a block must exceed to count as
    /// safe.
    pub block_brightness_min: f32,
    /// Top margin of the fallback box, as a fraction of image height.
    pub top_margin: f32,
    /// Bottom edge of the fallback box, as a fraction of image height.
    pub bottom_margin: f32,
    /// Side margins of the fallback box, as a fraction of image width.
    pub side_margin: f32,
}

impl Default for SafeAreaConfig {
    fn default() -> Self {
        Self {
            block_size: 20,
            block_brightness_min: 200.0,
            top_margin: 0.05,
            bottom_margin: 0.85,
            side_margin: 0.15,
        }
    }
}

/// Scan the image in blocks and return one [`SafeArea`] per block whose
/// mean brightness exceeds the configured minimum. Blocks overhanging
/// the right and bottom edges are clamped to the image, so narrow edge
/// strips are judged like any other block.
#[must_use]
pub fn detect(buffer: &PixelBuffer, config: &SafeAreaConfig) -> Vec<SafeArea> {
    let block = config.block_size;
    if block == 0 {
        return Vec::new();
    }
    let (width, height) = (buffer.width(), buffer.height());

    let mut areas = Vec::new();
    let mut by = 0;
    while by < height {
        let block_h = block.min(height - by);
        let mut bx = 0;
        while bx < width {
            let block_w = block.min(width - bx);
            if block_mean(buffer, bx, by, block_w, block_h) > config.block_brightness_min {
                areas.push(SafeArea::new(
                    to_f32(bx),
                    to_f32(by),
                    to_f32(block_w),
                    to_f32(block_h),
                ));
            }
            bx += block;
        }
        by += block;
    }
    tracing::debug!(blocks = areas.len(), "safe areas detected");
    areas
}

/// The margin-derived default text box for images with no detectable
/// bright region.
#[must_use]
pub fn fallback(config: &SafeAreaConfig, width: u32, height: u32) -> SafeArea {
    let (w, h) = (to_f32(width), to_f32(height));
    let x = w * config.side_margin;
    let y = h * config.top_margin;
    SafeArea::new(x, y, w - 2.0 * x, h * config.bottom_margin - y)
}

/// Detect safe areas, substituting the fallback box when the scan finds
/// none.
#[must_use]
pub fn detect_with_fallback(buffer: &PixelBuffer, config: &SafeAreaConfig) -> Vec<SafeArea> {
    let areas = detect(buffer, config);
    if areas.is_empty() {
        tracing::warn!("no bright blocks, using fallback area");
        vec![fallback(config, buffer.width(), buffer.height())]
    } else {
        areas
    }
}

/// Mean of the RGB channels over one block, alpha ignored.
#[allow(clippy::cast_precision_loss)]
fn block_mean(buffer: &PixelBuffer, bx: u32, by: u32, block_w: u32, block_h: u32) -> f32 {
    let data = buffer.data();
    let width = buffer.width() as usize;
    let mut sum = 0u64;
    for y in by..by + block_h {
        for x in bx..bx + block_w {
            let i = (y as usize * width + x as usize) * 4;
            sum += u64::from(data[i]) + u64::from(data[i + 1]) + u64::from(data[i + 2]);
        }
    }
    let count = u64::from(block_w) * u64::from(block_h);
    sum as f32 / 3.0 / count as f32
}

#[allow(clippy::cast_precision_loss)]
fn to_f32(value: u32) -> f32 {
    value as f32
}

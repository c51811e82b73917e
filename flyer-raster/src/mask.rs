//! Binary masks and morphology.
//!
//! Masks mark the pixels a contrast overlay should cover. The closing
//! operation (dilate, then erode) fills pinholes left by thresholding
//! noisy photos without growing the overall covered region.

use image::ImageEncoder;

use crate::error::{RasterError, RasterResult};
use crate::pixels::PixelBuffer;

/// A binary image, one byte per pixel, row-major. Cells are 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Create an all-clear mask.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Create an all-set mask.
    #[must_use]
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![1; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the cell at `(x, y)` is set. Out-of-bounds reads are
    /// clear.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[y as usize * self.width as usize + x as usize] != 0
    }

    /// Set or clear the cell at `(x, y)`. Out-of-bounds writes are
    /// ignored.
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.data[y as usize * self.width as usize + x as usize] = u8::from(value);
    }

    /// Fraction of cells that are set, from 0.0 to 1.0.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn set_fraction(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let set = self.data.iter().filter(|&&v| v != 0).count();
        set as f32 / self.data.len() as f32
    }

    /// Grow set regions by a square structuring element of side
    /// `2 * radius + 1`, repeated `iterations` times. Each pass reads
    /// the previous mask and writes a fresh one; the window clips at
    /// the borders.
    #[must_use]
    pub fn dilate(&self, radius: usize, iterations: usize) -> Self {
        let mut current = self.clone();
        for _ in 0..iterations {
            current = current.dilate_once(radius);
        }
        current
    }

    /// Shrink set regions by the same structuring element, repeated
    /// `iterations` times.
    #[must_use]
    pub fn erode(&self, radius: usize, iterations: usize) -> Self {
        let mut current = self.clone();
        for _ in 0..iterations {
            current = current.erode_once(radius);
        }
        current
    }

    /// Morphological closing: dilation followed by erosion with the
    /// same element. A uniform mask (all set or all clear) comes back
    /// unchanged.
    #[must_use]
    pub fn close(&self, radius: usize, iterations: usize) -> Self {
        self.dilate(radius, iterations).erode(radius, iterations)
    }

    fn dilate_once(&self, radius: usize) -> Self {
        let mut out = Self::new(self.width, self.height);
        let (w, h) = (self.width as usize, self.height as usize);
        for y in 0..h {
            for x in 0..w {
                let mut any = false;
                'window: for yy in y.saturating_sub(radius)..=(y + radius).min(h - 1) {
                    for xx in x.saturating_sub(radius)..=(x + radius).min(w - 1) {
                        if self.data[yy * w + xx] != 0 {
                            any = true;
                            break 'window;
                        }
                    }
                }
                out.data[y * w + x] = u8::from(any);
            }
        }
        out
    }

    fn erode_once(&self, radius: usize) -> Self {
        let mut out = Self::new(self.width, self.height);
        let (w, h) = (self.width as usize, self.height as usize);
        for y in 0..h {
            for x in 0..w {
                let mut all = true;
                'window: for yy in y.saturating_sub(radius)..=(y + radius).min(h - 1) {
                    for xx in x.saturating_sub(radius)..=(x + radius).min(w - 1) {
                        if self.data[yy * w + xx] == 0 {
                            all = false;
                            break 'window;
                        }
                    }
                }
                out.data[y * w + x] = u8::from(all);
            }
        }
        out
    }

    /// Render the mask as a white-on-black RGBA image.
    #[must_use]
    pub fn to_image(&self) -> PixelBuffer {
        let mut data = Vec::with_capacity(self.data.len() * 4);
        for &cell in &self.data {
            let v = if cell != 0 { 255 } else { 0 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
        // Length is width * height * 4 by construction.
        PixelBuffer::new(self.width, self.height, data)
            .unwrap_or_else(|_| PixelBuffer::solid(self.width, self.height, [0, 0, 0, 255]))
    }

    /// Encode the white-on-black visualization as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Encode`] if PNG encoding fails.
    pub fn to_png(&self) -> RasterResult<Vec<u8>> {
        let image = self.to_image();
        let mut bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
        encoder
            .write_image(
                image.data(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| RasterError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

//! Pixel buffer loading and grayscale conversion.
//!
//! Backgrounds arrive either as encoded image bytes or as browser data
//! URIs; both decode into the same RGBA8 buffer the analysis passes
//! work on.

use crate::error::{RasterError, RasterResult};

/// Red weight of the luminosity transform.
pub const LUMA_R: f32 = 0.299;

/// Green weight of the luminosity transform.
pub const LUMA_G: f32 = 0.587;

/// Blue weight of the luminosity transform.
pub const LUMA_B: f32 = 0.114;

/// An RGBA8 image in row-major order, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidBuffer`] if the byte count does
    /// not match `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> RasterResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RasterError::InvalidBuffer(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer filled with one color.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Decode encoded image bytes (PNG, JPEG, ...) into a buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Decode`] if the bytes are not a readable
    /// image.
    pub fn from_bytes(data: &[u8]) -> RasterResult<Self> {
        let img = image::load_from_memory(data)
            .map_err(|e| RasterError::Decode(format!("failed to decode image: {e}")))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            data: rgba.into_raw(),
        })
    }

    /// Decode a base64 data URI like `data:image/png;base64,iVBOR...`.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Decode`] if the URI is malformed, not
    /// base64, or the payload is not a readable image.
    pub fn from_data_uri(uri: &str) -> RasterResult<Self> {
        let Some(rest) = uri.strip_prefix("data:") else {
            return Err(RasterError::Decode("not a data URI".to_string()));
        };
        let Some((metadata, payload)) = rest.split_once(',') else {
            return Err(RasterError::Decode(
                "invalid data URI: missing comma".to_string(),
            ));
        };
        if !metadata.contains(";base64") {
            return Err(RasterError::Decode(
                "data URI payload is not base64".to_string(),
            ));
        }

        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| RasterError::Decode(format!("failed to decode base64: {e}")))?;
        Self::from_bytes(&bytes)
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

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Convert to one grayscale byte per pixel using the luminosity
    /// weights, rounded to the nearest integer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn grayscale(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .map(|px| {
                let luma = LUMA_R * f32::from(px[0])
                    + LUMA_G * f32::from(px[1])
                    + LUMA_B * f32::from(px[2]);
                luma.round() as u8
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A valid 1x1 red PNG.
    const RED_PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_new_validates_length() {
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
        let result = PixelBuffer::new(2, 2, vec![0; 15]);
        assert!(matches!(result, Err(RasterError::InvalidBuffer(_))));
    }

    #[test]
    fn test_solid_fill() {
        let buffer = PixelBuffer::solid(2, 2, [10, 20, 30, 255]);
        assert_eq!(buffer.data().len(), 16);
        assert_eq!(&buffer.data()[0..4], &[10, 20, 30, 255]);
        assert_eq!(&buffer.data()[12..16], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_grayscale_weights() {
        // Pure red: 0.299 * 255 = 76.245, rounds to 76.
        let red = PixelBuffer::solid(1, 1, [255, 0, 0, 255]);
        assert_eq!(red.grayscale(), vec![76]);

        // Pure green: 0.587 * 255 = 149.685, rounds to 150.
        let green = PixelBuffer::solid(1, 1, [0, 255, 0, 255]);
        assert_eq!(green.grayscale(), vec![150]);

        // White stays white.
        let white = PixelBuffer::solid(1, 1, [255, 255, 255, 255]);
        assert_eq!(white.grayscale(), vec![255]);
    }

    #[test]
    fn test_data_uri_decodes() {
        let uri = format!("data:image/png;base64,{RED_PIXEL_PNG}");
        let buffer = PixelBuffer::from_data_uri(&uri).expect("decode");
        assert_eq!(buffer.width(), 1);
        assert_eq!(buffer.height(), 1);
    }

    #[test]
    fn test_bad_data_uris_are_rejected() {
        assert!(PixelBuffer::from_data_uri("not a data uri").is_err());
        assert!(PixelBuffer::from_data_uri("data:image/png").is_err());
        assert!(PixelBuffer::from_data_uri("data:image/png,rawdata").is_err());
        assert!(PixelBuffer::from_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_undecodable_bytes_are_rejected() {
        let result = PixelBuffer::from_bytes(&[0, 1, 2, 3]);
        assert!(matches!(result, Err(RasterError::Decode(_))));
    }
}

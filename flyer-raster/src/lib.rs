//! # Flyer Raster
//!
//! Background image analysis for the flyer editor: decodes uploaded
//! backgrounds, finds the bright regions that would wash out overlay
//! text, and detects the areas where text stays readable.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                flyer-raster                 │
//! ├─────────────────────────────────────────────┤
//! │  Pixels          │  Brightness              │
//! │  - Decode bytes  │  - Grayscale + threshold │
//! │  - Data URIs     │  - Morphological closing │
//! ├─────────────────────────────────────────────┤
//! │  Masks           │  Safe Areas              │
//! │  - Dilate/erode  │  - Block scan            │
//! │  - PNG output    │  - Margin fallback       │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod brightness;
pub mod error;
pub mod mask;
pub mod pixels;
pub mod safe_area;

pub use brightness::{analyze, needs_masking, region_clear_fraction, AnalysisConfig, BrightnessAnalysis};
pub use error::{RasterError, RasterResult};
pub use mask::Mask;
pub use pixels::{PixelBuffer, LUMA_B, LUMA_G, LUMA_R};
pub use safe_area::{detect, detect_with_fallback, fallback, SafeAreaConfig};

/// Flyer raster version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

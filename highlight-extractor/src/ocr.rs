//! Text recognition over page rasters.
//!
//! The extraction pipeline only needs "pixels in, text out", so recognition
//! sits behind [`TextRecognizer`]. The production backend shells out to
//! Tesseract; tests substitute scripted recognizers.

mod tesseract;

use image::RgbImage;

use crate::error::OcrError;

pub use tesseract::TesseractRecognizer;

/// Trait for text recognition backends.
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text in a raster. Blank or unreadable input yields an
    /// empty string rather than an error.
    fn recognize(&self, image: &RgbImage) -> Result<String, OcrError>;

    /// Check if this backend is available (dependencies installed).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    ///
    /// Does not re-check availability; call after [`Self::is_available`] fails.
    fn availability_hint(&self) -> String;
}

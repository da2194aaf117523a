//! Page rasterization.
//!
//! Documents are opened once and rendered page by page, so at most one page
//! raster is alive at a time. Closing happens when the [`RasterDocument`] is
//! dropped.

mod pdfium;

use std::path::Path;

use image::RgbImage;

use crate::error::ExtractionError;

pub use pdfium::PdfiumRasterizer;

/// Opens documents for rasterization.
pub trait Rasterizer {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>, ExtractionError>;
}

/// An open document whose pages can be rendered to RGB rasters.
pub trait RasterDocument {
    fn page_count(&self) -> usize;

    /// Render page `index` (0-based) at `zoom` times its native size.
    fn render_page(&self, index: usize, zoom: f32) -> Result<RgbImage, ExtractionError>;
}

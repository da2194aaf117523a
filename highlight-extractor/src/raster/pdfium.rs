//! PDF rasterization using pdfium-render.

use std::path::Path;

use image::RgbImage;
use pdfium_render::prelude::*;
use tracing::debug;

use super::{RasterDocument, Rasterizer};
use crate::error::{ExtractionError, ServiceError, ServiceResult};

/// Rasterizer backed by a dynamically linked PDFium.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind to libpdfium.
    ///
    /// Searches for libpdfium in:
    /// 1. Current directory (./libpdfium.so)
    /// 2. vendor/pdfium/lib/
    /// 3. System library paths
    pub fn new() -> ServiceResult<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                    "./vendor/pdfium/lib/",
                ))
            })
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| ServiceError::Config {
                message: format!(
                    "Failed to load PDFium library. Place libpdfium next to the binary or install it system-wide: {:?}",
                    e
                ),
            })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>, ExtractionError> {
        if !path.is_file() {
            return Err(ExtractionError::DocumentOpen {
                path: path.to_path_buf(),
                message: "file does not exist".to_string(),
            });
        }

        let document = self.pdfium.load_pdf_from_file(path, None).map_err(|e| {
            ExtractionError::DocumentOpen {
                path: path.to_path_buf(),
                message: format!("{:?}", e),
            }
        })?;

        debug!(
            path = %path.display(),
            pages = document.pages().len(),
            "Opened PDF"
        );

        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, zoom: f32) -> Result<RgbImage, ExtractionError> {
        let page_number = index + 1;
        let page_index = u16::try_from(index).map_err(|_| ExtractionError::Render {
            page: page_number,
            message: "page index out of range".to_string(),
        })?;

        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|e| ExtractionError::Render {
                page: page_number,
                message: format!("Failed to get page: {:?}", e),
            })?;

        let config = PdfRenderConfig::new().scale_page_by_factor(zoom);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| ExtractionError::Render {
                page: page_number,
                message: format!("Failed to render page: {:?}", e),
            })?;

        // pdfium-render handles the BGRA byte order; drop alpha for segmentation
        Ok(bitmap.as_image().to_rgb8())
    }
}


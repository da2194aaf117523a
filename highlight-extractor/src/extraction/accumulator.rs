//! Per-document text accumulation across pages.

use image::RgbImage;
use tracing::debug;

use super::PageSettings;
use super::proportion::text_length;
use crate::error::ExtractionError;
use crate::ocr::TextRecognizer;
use crate::raster::RasterDocument;
use crate::segmentation::{apply_mask, highlight_mask, mask_coverage};

/// Running full-page and highlighted-region text for one document.
///
/// Page text is appended in page order with no separator or deduplication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAccumulator {
    pub total: String,
    pub highlighted: String,
    pages: usize,
}

impl TextAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment one page raster and append both recognition results.
    ///
    /// `page_number` is 1-based and only used for diagnostics. Nothing is
    /// appended if either recognition fails.
    pub fn process_page(
        &mut self,
        page_number: usize,
        raster: &RgbImage,
        settings: &PageSettings,
        recognizer: &dyn TextRecognizer,
    ) -> Result<(), ExtractionError> {
        let mask = highlight_mask(raster, &settings.band, settings.dilation_radius);
        debug!(
            page = page_number,
            width = raster.width(),
            height = raster.height(),
            coverage = format!("{:.4}", mask_coverage(&mask)),
            "Computed highlight mask"
        );
        let highlighted_raster = apply_mask(raster, &mask);

        let page_total = recognizer
            .recognize(raster)
            .map_err(|source| ExtractionError::Recognition {
                page: page_number,
                source,
            })?;
        let page_highlighted = recognizer
            .recognize(&highlighted_raster)
            .map_err(|source| ExtractionError::Recognition {
                page: page_number,
                source,
            })?;

        self.total.push_str(&page_total);
        self.highlighted.push_str(&page_highlighted);
        self.pages += 1;
        Ok(())
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn total_length(&self) -> usize {
        text_length(&self.total)
    }

    pub fn highlighted_length(&self) -> usize {
        text_length(&self.highlighted)
    }
}

/// Rasterize and recognize every page of an open document, in order.
///
/// The first failing page aborts the whole document.
pub fn accumulate_document(
    document: &dyn RasterDocument,
    settings: &PageSettings,
    recognizer: &dyn TextRecognizer,
) -> Result<TextAccumulator, ExtractionError> {
    let mut accumulator = TextAccumulator::new();

    for index in 0..document.page_count() {
        // Raster and mask are dropped at the end of each iteration
        let raster = document.render_page(index, settings.zoom)?;
        accumulator.process_page(index + 1, &raster, settings, recognizer)?;
    }

    Ok(accumulator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::extraction::proportion::proportion;
    use crate::extraction::test_support::{
        FakeRasterizer, PixelReader, ScriptedRecognizer, strip,
    };
    use crate::raster::Rasterizer;
    use std::path::Path;

    fn no_dilation() -> PageSettings {
        PageSettings {
            dilation_radius: 0,
            ..PageSettings::default()
        }
    }

    #[test]
    fn test_masked_pass_sees_only_highlight() {
        let mut accumulator = TextAccumulator::new();
        accumulator
            .process_page(1, &strip(10, 5), &no_dilation(), &PixelReader)
            .unwrap();

        assert_eq!(accumulator.total_length(), 10);
        assert_eq!(accumulator.highlighted_length(), 5);
        assert_eq!(accumulator.pages(), 1);
    }

    #[test]
    fn test_default_dilation_widens_highlight() {
        let mut accumulator = TextAccumulator::new();
        accumulator
            .process_page(1, &strip(10, 5), &PageSettings::default(), &PixelReader)
            .unwrap();

        // One extra column on the right edge of the marker run
        assert_eq!(accumulator.highlighted_length(), 6);
    }

    #[test]
    fn test_pages_appended_in_order() {
        let rasterizer = FakeRasterizer::default().with_document("doc.pdf", vec![strip(4, 0); 2]);
        let recognizer = ScriptedRecognizer::pages(&[("first ", "one"), ("second", "two")]);

        let document = rasterizer.open(Path::new("doc.pdf")).unwrap();
        let accumulator =
            accumulate_document(document.as_ref(), &PageSettings::default(), &recognizer).unwrap();

        assert_eq!(accumulator.total, "first second");
        assert_eq!(accumulator.highlighted, "onetwo");
        assert_eq!(accumulator.pages(), 2);
    }

    #[test]
    fn test_page_order_changes_text_not_proportion() {
        let forward = FakeRasterizer::default()
            .with_document("doc.pdf", vec![strip(10, 2), strip(6, 6)]);
        let reversed = FakeRasterizer::default()
            .with_document("doc.pdf", vec![strip(6, 6), strip(10, 2)]);
        let settings = no_dilation();

        let a = accumulate_document(
            forward.open(Path::new("doc.pdf")).unwrap().as_ref(),
            &settings,
            &PixelReader,
        )
        .unwrap();
        let b = accumulate_document(
            reversed.open(Path::new("doc.pdf")).unwrap().as_ref(),
            &settings,
            &PixelReader,
        )
        .unwrap();

        assert_eq!(a.total_length(), b.total_length());
        assert_eq!(a.highlighted_length(), b.highlighted_length());
        assert_eq!(
            proportion(a.total_length(), a.highlighted_length()),
            proportion(b.total_length(), b.highlighted_length())
        );
        assert_eq!(a.highlighted_length(), 8);
        assert_eq!(a.total_length(), 16);
    }

    #[test]
    fn test_render_failure_aborts_document() {
        let rasterizer = FakeRasterizer::default()
            .with_document("doc.pdf", vec![strip(4, 1); 3])
            .with_broken_page("doc.pdf", 1);

        let document = rasterizer.open(Path::new("doc.pdf")).unwrap();
        let err = accumulate_document(document.as_ref(), &PageSettings::default(), &PixelReader)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Render { page: 2, .. }));
    }

    #[test]
    fn test_recognition_failure_names_page() {
        let rasterizer = FakeRasterizer::default().with_document("doc.pdf", vec![strip(4, 1); 2]);
        let recognizer = ScriptedRecognizer::new(vec![
            Ok("page one".to_string()),
            Ok("one".to_string()),
            Ok("page two".to_string()),
            Err(OcrError::RecognitionFailed("engine crashed".to_string())),
        ]);

        let document = rasterizer.open(Path::new("doc.pdf")).unwrap();
        let err = accumulate_document(document.as_ref(), &PageSettings::default(), &recognizer)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Recognition { page: 2, .. }));
    }

    #[test]
    fn test_empty_document() {
        let rasterizer = FakeRasterizer::default().with_document("doc.pdf", Vec::new());
        let document = rasterizer.open(Path::new("doc.pdf")).unwrap();
        let accumulator =
            accumulate_document(document.as_ref(), &PageSettings::default(), &PixelReader).unwrap();

        assert_eq!(accumulator, TextAccumulator::new());
        assert_eq!(accumulator.total_length(), 0);
    }
}

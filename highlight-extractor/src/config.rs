//! Extractor configuration.
//!
//! Every field has a default, so the extractor runs with no config file at all.
//! Values can be overridden from `config.{toml,yaml,json}` or `HIGHLIGHT__*`
//! environment variables (see [`loader`]).

pub mod loader;

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{ServiceError, ServiceResult};
use crate::segmentation::{HUE_MAX, HsvBand};

pub use loader::load_config;

/// Top-level extractor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_extraction")]
    pub extraction: ExtractionConfig,

    #[serde(default = "default_segmentation")]
    pub segmentation: SegmentationConfig,

    #[serde(default = "default_ocr")]
    pub ocr: OcrConfig,

    #[serde(default = "default_output")]
    pub output: OutputConfig,
}

/// Which documents to process and how to rasterize them
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Folder holding `1.pdf`, `2.pdf`, ...
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Documents `1..=document_count` are processed.
    #[serde(default = "default_document_count")]
    pub document_count: u32,

    /// Magnification applied to the native page size when rasterizing.
    #[serde(default = "default_zoom")]
    pub zoom: f32,
}

/// Highlight color segmentation settings
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentationConfig {
    #[serde(default)]
    pub band: HsvBand,

    /// Radius of the square dilation applied to the raw mask (1 = 3x3). 0 disables.
    #[serde(default = "default_dilation_radius")]
    pub dilation_radius: u8,
}

/// Tesseract settings
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_language")]
    pub language: String,

    /// Passed to tesseract as `--psm` when set.
    #[serde(default)]
    pub page_segmentation_mode: Option<u8>,
}

/// Results dataset location
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    #[serde(default = "default_sheet")]
    pub sheet: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            extraction: default_extraction(),
            segmentation: default_segmentation(),
            ocr: default_ocr(),
            output: default_output(),
        }
    }
}

impl ExtractorConfig {
    /// Reject settings that would make every document fail or the mask meaningless.
    pub fn validate(&self) -> ServiceResult<()> {
        if !(self.extraction.zoom.is_finite() && self.extraction.zoom > 0.0) {
            return Err(ServiceError::Config {
                message: format!(
                    "extraction.zoom must be positive, got {}",
                    self.extraction.zoom
                ),
            });
        }

        let band = &self.segmentation.band;
        for (name, [lo, hi]) in [
            ("hue", band.hue),
            ("saturation", band.saturation),
            ("value", band.value),
        ] {
            if lo > hi {
                return Err(ServiceError::Config {
                    message: format!(
                        "segmentation.band.{} lower bound {} exceeds upper bound {}",
                        name, lo, hi
                    ),
                });
            }
        }
        if band.hue[1] > HUE_MAX {
            return Err(ServiceError::Config {
                message: format!(
                    "segmentation.band.hue upper bound {} exceeds {}",
                    band.hue[1], HUE_MAX
                ),
            });
        }

        if self.output.sheet.trim().is_empty() {
            return Err(ServiceError::Config {
                message: "output.sheet must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

// ==================== Default Value Functions ====================

pub(crate) fn default_extraction() -> ExtractionConfig {
    ExtractionConfig {
        source_dir: default_source_dir(),
        document_count: default_document_count(),
        zoom: default_zoom(),
    }
}

pub(crate) fn default_segmentation() -> SegmentationConfig {
    SegmentationConfig {
        band: HsvBand::default(),
        dilation_radius: default_dilation_radius(),
    }
}

pub(crate) fn default_ocr() -> OcrConfig {
    OcrConfig {
        language: default_language(),
        page_segmentation_mode: None,
    }
}

pub(crate) fn default_output() -> OutputConfig {
    OutputConfig {
        dataset_path: default_dataset_path(),
        sheet: default_sheet(),
    }
}

pub(crate) fn default_source_dir() -> PathBuf {
    PathBuf::from("data/passages/highlighted_passages")
}

pub(crate) fn default_document_count() -> u32 {
    2
}

pub(crate) fn default_zoom() -> f32 {
    2.0
}

pub(crate) fn default_dilation_radius() -> u8 {
    1
}

pub(crate) fn default_language() -> String {
    "eng".to_string()
}

pub(crate) fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/participant_responses.xlsx")
}

pub(crate) fn default_sheet() -> String {
    "highlighted_portions".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction.document_count, 2);
        assert_eq!(config.extraction.zoom, 2.0);
        assert_eq!(config.segmentation.band, HsvBand::default());
        assert_eq!(config.output.sheet, "highlighted_portions");
    }

    #[test]
    fn test_rejects_non_positive_zoom() {
        let mut config = ExtractorConfig::default();
        config.extraction.zoom = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ServiceError::Config { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_band() {
        let mut config = ExtractorConfig::default();
        config.segmentation.band.saturation = [200, 100];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("saturation"));
    }

    #[test]
    fn test_rejects_hue_out_of_range() {
        let mut config = ExtractorConfig::default();
        config.segmentation.band.hue = [20, 200];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hue"));
    }
}

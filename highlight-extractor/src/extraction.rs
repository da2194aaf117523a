//! Highlight proportion extraction.
//!
//! The pipeline for one document:
//! - rasterize each page (see [`crate::raster`])
//! - segment the highlight color into a mask (see [`crate::segmentation`])
//! - recognize text on the full raster and on the masked raster
//! - compare trimmed character counts of the accumulated text
//!
//! [`extract_batch`] runs this over numbered documents and isolates failures
//! per document.

mod accumulator;
mod batch;
mod proportion;

use crate::config::ExtractorConfig;
use crate::segmentation::HsvBand;

pub use batch::{ProportionRecord, extract_batch};

/// Per-page processing settings, shared across a batch.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub zoom: f32,
    pub band: HsvBand,
    pub dilation_radius: u8,
}

impl PageSettings {
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            zoom: config.extraction.zoom,
            band: config.segmentation.band,
            dilation_radius: config.segmentation.dilation_radius,
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

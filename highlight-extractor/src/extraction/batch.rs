//! Best-effort extraction over a numbered set of documents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use super::PageSettings;
use super::accumulator::accumulate_document;
use super::proportion::proportion;
use crate::error::ExtractionError;
use crate::ocr::TextRecognizer;
use crate::raster::Rasterizer;

/// Outcome of a successfully processed document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub id: u32,
    pub pages: usize,
    pub total_length: usize,
    pub highlighted_length: usize,
    pub proportion: f64,
}

/// Highlight proportion (percent) per successfully processed document id.
///
/// Failed documents are absent rather than zero. Keys are ordered only so
/// printed output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProportionRecord(BTreeMap<u32, f64>);

impl ProportionRecord {
    pub fn get(&self, id: u32) -> Option<f64> {
        self.0.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u32, f64)> for ProportionRecord {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-document outcomes of a batch, success or failure, keyed by id.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: BTreeMap<u32, Result<DocumentSummary, ExtractionError>>,
}

impl BatchReport {
    /// Number of documents attempted.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn summaries(&self) -> impl Iterator<Item = &DocumentSummary> {
        self.outcomes.values().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (u32, &ExtractionError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, o)| o.as_ref().err().map(|e| (*id, e)))
    }

    /// Proportions of the documents that succeeded.
    pub fn proportions(&self) -> ProportionRecord {
        self.summaries().map(|s| (s.id, s.proportion)).collect()
    }
}

/// Location of document `id` inside `folder`.
pub fn document_path(folder: &Path, id: u32) -> PathBuf {
    folder.join(format!("{}.pdf", id))
}

/// Extract the highlight proportion of a single document.
///
/// The document is closed before this returns, whether or not it succeeded.
pub fn extract_document(
    id: u32,
    path: &Path,
    rasterizer: &dyn Rasterizer,
    recognizer: &dyn TextRecognizer,
    settings: &PageSettings,
) -> Result<DocumentSummary, ExtractionError> {
    let accumulated = {
        let document = rasterizer.open(path)?;
        accumulate_document(document.as_ref(), settings, recognizer)?
    };

    let total_length = accumulated.total_length();
    let highlighted_length = accumulated.highlighted_length();
    let summary = DocumentSummary {
        id,
        pages: accumulated.pages(),
        total_length,
        highlighted_length,
        proportion: proportion(total_length, highlighted_length),
    };

    info!(
        document_id = summary.id,
        pages = summary.pages,
        total_length = summary.total_length,
        highlighted_length = summary.highlighted_length,
        proportion = summary.proportion,
        "Extracted highlight proportion"
    );

    Ok(summary)
}

/// Extract documents `1..=count` from `folder`, one at a time.
///
/// A failing document is logged and recorded in the report; it never stops the
/// remaining documents from being processed.
pub fn extract_batch(
    folder: &Path,
    count: u32,
    rasterizer: &dyn Rasterizer,
    recognizer: &dyn TextRecognizer,
    settings: &PageSettings,
) -> BatchReport {
    let mut report = BatchReport::default();

    for id in 1..=count {
        let path = document_path(folder, id);
        let outcome = extract_document(id, &path, rasterizer, recognizer, settings);
        if let Err(e) = &outcome {
            warn!(document_id = id, error = %e, "Failed to process document");
        }
        report.outcomes.insert(id, outcome);
    }

    info!(
        attempted = report.attempted(),
        failed = report.failures().count(),
        "Batch extraction complete"
    );

    report
}

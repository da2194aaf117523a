use tracing::{info, warn};

mod config;
mod dataset;
mod error;
mod extraction;
mod ocr;
mod raster;
mod segmentation;

use crate::config::load_config;
use crate::dataset::{XlsxStore, merge_proportions};
use crate::extraction::{PageSettings, extract_batch};
use crate::ocr::{TesseractRecognizer, TextRecognizer};
use crate::raster::PdfiumRasterizer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    init_logging();

    info!(
        "Starting highlight extractor v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = load_config()?;
    info!(
        source_dir = %config.extraction.source_dir.display(),
        documents = config.extraction.document_count,
        zoom = config.extraction.zoom,
        dataset = %config.output.dataset_path.display(),
        sheet = %config.output.sheet,
        "Configuration loaded"
    );

    let rasterizer = PdfiumRasterizer::new()?;
    let recognizer = TesseractRecognizer::new(config.ocr.clone());
    if !recognizer.is_available() {
        // Keep going: every document will fail individually and be reported
        warn!(hint = %recognizer.availability_hint(), "OCR backend unavailable");
    }

    let report = extract_batch(
        &config.extraction.source_dir,
        config.extraction.document_count,
        &rasterizer,
        &recognizer,
        &PageSettings::from_config(&config),
    );
    let proportions = report.proportions();
    if proportions.is_empty() {
        warn!(
            attempted = report.attempted(),
            "No document produced a highlight proportion"
        );
    } else {
        info!(
            succeeded = proportions.len(),
            attempted = report.attempted(),
            "Highlight proportions computed"
        );
    }

    println!("{}", serde_json::to_string_pretty(&proportions)?);

    match merge_proportions(
        &XlsxStore::new(),
        &config.output.dataset_path,
        &config.output.sheet,
        &proportions,
    ) {
        Ok(matched) => info!(matched, "Dataset updated"),
        Err(e) => warn!(error = %e, "Failed to update dataset"),
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("highlight_extractor=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

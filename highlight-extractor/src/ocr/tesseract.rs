//! Tesseract OCR backend.
//!
//! Uses the `tesseract` command-line tool. Each raster is written to a
//! temporary PNG and recognized with output sent to stdout.

use std::path::Path;
use std::process::Command;

use image::RgbImage;
use tempfile::TempDir;
use tracing::trace;

use super::TextRecognizer;
use crate::config::OcrConfig;
use crate::error::OcrError;

const TESSERACT_BINARY: &str = "tesseract";

/// Tesseract OCR backend.
pub struct TesseractRecognizer {
    config: OcrConfig,
}

impl TesseractRecognizer {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Arguments following the input image path.
    fn arguments(&self) -> Vec<String> {
        let mut args = vec![
            "stdout".to_string(),
            "-l".to_string(),
            self.config.language.clone(),
        ];
        if let Some(psm) = self.config.page_segmentation_mode {
            args.push("--psm".to_string());
            args.push(psm.to_string());
        }
        args
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, OcrError> {
        let output = Command::new(TESSERACT_BINARY)
            .arg(image_path)
            .args(self.arguments())
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::RecognitionFailed(format!(
                        "tesseract failed: {}",
                        stderr.trim()
                    )))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &RgbImage) -> Result<String, OcrError> {
        let temp_dir = TempDir::new()?;
        let image_path = temp_dir.path().join("page.png");
        image
            .save(&image_path)
            .map_err(|e| OcrError::Image(format!("Failed to write raster: {}", e)))?;

        let text = self.run_tesseract(&image_path)?;
        trace!(
            width = image.width(),
            height = image.height(),
            chars = text.len(),
            "Tesseract recognized raster"
        );
        Ok(text)
    }

    fn is_available(&self) -> bool {
        Command::new(TESSERACT_BINARY)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn availability_hint(&self) -> String {
        format!(
            "Tesseract not installed or language '{}' missing. Install with: apt install tesseract-ocr tesseract-ocr-{}",
            self.config.language, self.config.language
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_ocr;

    #[test]
    fn test_default_arguments() {
        let recognizer = TesseractRecognizer::new(default_ocr());
        assert_eq!(recognizer.arguments(), vec!["stdout", "-l", "eng"]);
    }

    #[test]
    fn test_availability_hint_names_language() {
        let recognizer = TesseractRecognizer::new(OcrConfig {
            language: "deu".to_string(),
            page_segmentation_mode: None,
        });
        let hint = recognizer.availability_hint();
        assert!(hint.contains("tesseract-ocr-deu"), "hint was {}", hint);
    }

    #[test]
    fn test_page_segmentation_mode_argument() {
        let recognizer = TesseractRecognizer::new(OcrConfig {
            language: "deu".to_string(),
            page_segmentation_mode: Some(6),
        });
        assert_eq!(
            recognizer.arguments(),
            vec!["stdout", "-l", "deu", "--psm", "6"]
        );
    }
}

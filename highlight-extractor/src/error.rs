use std::path::PathBuf;

use thiserror::Error;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Per-document extraction errors.
///
/// Any of these aborts the document it was raised for, never the batch.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to open document {}: {message}", path.display())]
    DocumentOpen { path: PathBuf, message: String },

    #[error("Failed to render page {page}: {message}")]
    Render { page: usize, message: String },

    #[error("Text recognition failed on page {page}: {source}")]
    Recognition {
        page: usize,
        #[source]
        source: OcrError,
    },
}

/// Errors from text recognition backends.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    RecognitionFailed(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Results dataset errors
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Failed to read dataset {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Sheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    #[error("Column not found: {column}")]
    MissingColumn { column: String },

    #[error("Failed to write dataset {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_names_page() {
        let err = ExtractionError::Recognition {
            page: 3,
            source: OcrError::RecognitionFailed("bad image".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Text recognition failed on page 3: OCR failed: bad image"
        );
        assert_eq!(
            std::error::Error::source(&err).map(|s| s.to_string()),
            Some("OCR failed: bad image".to_string())
        );
    }

    #[test]
    fn test_document_open_names_path() {
        let err = ExtractionError::DocumentOpen {
            path: PathBuf::from("data/7.pdf"),
            message: "file does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to open document data/7.pdf: file does not exist"
        );
    }
}

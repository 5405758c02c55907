//! Narrow interfaces to the external document-extraction collaborators.
//!
//! The ingestion pipeline consumes three things per page: zero or more
//! tables (2-D string grids), optional narrative text, and zero or more
//! image regions. This crate defines those seams ([`PageSource`],
//! [`OcrEngine`]) and the concrete implementations shipped with docint.

mod error;
mod manifest;
mod ocr;
mod page;
mod pdf;

pub use error::{ExtractError, ExtractResult};
pub use manifest::ManifestSource;
pub use ocr::TesseractOcr;
pub use page::{ImageRegion, OcrEngine, PageContent, PageSource, Table};
pub use pdf::PdfSource;

use std::path::Path;

/// Open the appropriate page source for a file, by extension.
pub fn source_for_path(path: &Path) -> ExtractResult<Box<dyn PageSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => Ok(Box::new(PdfSource::open(path)?)),
        "json" => Ok(Box::new(ManifestSource::open(path)?)),
        other => Err(ExtractError::UnsupportedFileType(other.to_string())),
    }
}

/// Whether a file is something the ingestion run should pick up.
pub fn is_supported(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("pdf") | Some("json")
    )
}

//! Per-page extraction contracts.

use crate::error::ExtractResult;

/// A raw table: a 2-D grid of cell strings, row 0 being the headers.
pub type Table = Vec<Vec<String>>;

/// A croppable bitmap region embedded in a page, as encoded image bytes.
#[derive(Debug, Clone)]
pub struct ImageRegion {
    pub data: Vec<u8>,
    /// File extension hint for the encoding ("png", "jpg", ...).
    pub format: String,
}

/// Everything extracted from one page of a document.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub tables: Vec<Table>,
    pub text: Option<String>,
    pub images: Vec<ImageRegion>,
    /// Image regions that could not be loaded, with the reason. The page
    /// survives; callers record these in their ingestion report.
    pub skipped_images: Vec<String>,
}

/// A document opened for per-page extraction.
///
/// Implementations wrap the external table/text/image extraction service;
/// docint ships a PDF text source and a JSON page-manifest source.
pub trait PageSource {
    /// The pages of the document, in order. Page numbers are 1-based
    /// positions in the returned vector.
    fn pages(&self) -> ExtractResult<Vec<PageContent>>;
}

/// Bitmap to recognized text. The returned text may be empty.
pub trait OcrEngine {
    fn recognize(&self, region: &ImageRegion) -> ExtractResult<String>;
}

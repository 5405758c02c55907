//! PDF page source.
//!
//! Uses `pdf-extract` for narrative text. Table grids and embedded image
//! regions are not recoverable through this library; documents that carry
//! them are ingested through a page manifest instead (see
//! [`crate::ManifestSource`]).

use crate::error::{ExtractError, ExtractResult};
use crate::page::{PageContent, PageSource};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Page source for PDF files (narrative text only).
#[derive(Debug)]
pub struct PdfSource {
    path: PathBuf,
}

impl PdfSource {
    pub fn open(path: &Path) -> ExtractResult<Self> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl PageSource for PdfSource {
    fn pages(&self) -> ExtractResult<Vec<PageContent>> {
        debug!("Extracting text from PDF: {:?}", self.path);

        let raw = pdf_extract::extract_text(&self.path).map_err(|e| ExtractError::ParseError {
            path: self.path.clone(),
            message: format!("Failed to extract text from PDF: {}", e),
        })?;

        // pdf-extract separates pages with form feeds.
        let pages = raw
            .split('\x0C')
            .map(|page_text| {
                let cleaned = clean_page_text(page_text);
                PageContent {
                    text: if cleaned.is_empty() { None } else { Some(cleaned) },
                    ..PageContent::default()
                }
            })
            .collect();

        Ok(pages)
    }
}

/// Clean up extracted page text: trim lines, collapse repeated blank lines.
fn clean_page_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .fold(Vec::new(), |mut acc: Vec<&str>, line| {
            let last_was_empty = acc.last().map(|s| s.is_empty()).unwrap_or(false);
            if !(line.is_empty() && last_was_empty) {
                acc.push(line);
            }
            acc
        })
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_page_text() {
        let messy = "  Hello  \n\n\n\nWorld  \n\nTest";
        let cleaned = clean_page_text(messy);
        assert!(!cleaned.contains("\n\n\n"));
        assert!(cleaned.starts_with("Hello"));
        assert!(cleaned.ends_with("Test"));
    }

    #[test]
    fn test_open_missing_file() {
        let err = PdfSource::open(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound(_)));
    }
}

//! Ingestion run reporting.
//!
//! Every extraction step that is skipped gets a tagged record instead of
//! being silently dropped, so a run can be audited after the fact.

use serde::{Deserialize, Serialize};

/// Which extraction step was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipStage {
    /// The whole document could not be opened or paged.
    Document,
    /// A page's narrative text was dropped.
    Text,
    /// An image region's OCR was dropped.
    Ocr,
}

/// One skipped step, with the page it happened on when known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSkip {
    pub stage: SkipStage,
    pub page: Option<u32>,
    pub reason: String,
}

impl StepSkip {
    pub fn new(stage: SkipStage, page: Option<u32>, reason: impl Into<String>) -> Self {
        Self {
            stage,
            page,
            reason: reason.into(),
        }
    }
}

/// Per-document outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub source: String,
    /// SHA-256 of the source file, when it could be read.
    pub content_hash: Option<String>,
    pub units: usize,
    pub chunks: usize,
    pub skips: Vec<StepSkip>,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub documents: Vec<DocumentReport>,
    pub total_chunks: usize,
}

impl IngestReport {
    pub fn total_units(&self) -> usize {
        self.documents.iter().map(|d| d.units).sum()
    }

    pub fn total_skips(&self) -> usize {
        self.documents.iter().map(|d| d.skips.len()).sum()
    }

    /// True when the run found nothing to index. Not an error: a missing
    /// uploads directory or an empty document reports zero chunks.
    pub fn is_empty(&self) -> bool {
        self.total_chunks == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let report = IngestReport {
            documents: vec![
                DocumentReport {
                    source: "a.pdf".into(),
                    content_hash: None,
                    units: 3,
                    chunks: 5,
                    skips: vec![StepSkip::new(SkipStage::Ocr, Some(2), "tesseract failed")],
                },
                DocumentReport {
                    source: "b.pdf".into(),
                    content_hash: None,
                    units: 0,
                    chunks: 0,
                    skips: vec![],
                },
            ],
            total_chunks: 5,
        };

        assert_eq!(report.total_units(), 3);
        assert_eq!(report.total_skips(), 1);
        assert!(!report.is_empty());
    }
}

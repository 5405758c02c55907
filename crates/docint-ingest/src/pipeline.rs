//! The ingestion run: documents in, ordered corpus + report out.

use crate::error::IngestResult;
use crate::extract::ContentExtractor;
use crate::report::{DocumentReport, IngestReport, SkipStage, StepSkip};
use crate::splitter::Splitter;
use crate::table::TableNormalizer;
use docint_config::Config;
use docint_core::{Chunk, ContentUnit, Modality};
use docint_extract::{source_for_path, OcrEngine, TesseractOcr};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Result of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestOutput {
    /// The ordered corpus; chunk identity is the position in this sequence.
    pub corpus: Vec<Chunk>,
    pub report: IngestReport,
}

/// Drives extraction, normalization and splitting for a batch of documents.
pub struct Ingestor {
    normalizer: TableNormalizer,
    splitter: Splitter,
    ocr: Option<Box<dyn OcrEngine>>,
}

impl Ingestor {
    /// Create an ingestor, picking up Tesseract when it is installed.
    pub fn new(config: &Config) -> Self {
        let ocr: Option<Box<dyn OcrEngine>> = match TesseractOcr::new() {
            Ok(engine) => Some(Box::new(engine)),
            Err(e) => {
                warn!("OCR disabled: {}", e);
                None
            }
        };
        Self::with_ocr(config, ocr)
    }

    /// Create an ingestor with an explicit OCR engine (or none).
    pub fn with_ocr(config: &Config, ocr: Option<Box<dyn OcrEngine>>) -> Self {
        Self {
            normalizer: TableNormalizer::new(&config.ingest),
            splitter: Splitter::new(&config.chunking),
            ocr,
        }
    }

    /// Ingest every supported document under `uploads_dir`.
    ///
    /// A missing directory is a soft no-op reporting zero chunks. Documents
    /// are visited in sorted path order so repeated runs over unchanged
    /// input produce the same corpus in the same order.
    pub fn run(&self, uploads_dir: &Path) -> IngestResult<IngestOutput> {
        let mut output = IngestOutput::default();

        if !uploads_dir.is_dir() {
            info!("No uploads directory at {:?}; nothing to ingest", uploads_dir);
            return Ok(output);
        }

        for entry in WalkDir::new(uploads_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_dir() || is_hidden(path) || !docint_extract::is_supported(path) {
                continue;
            }

            let source_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            info!("Ingesting {}", source_name);
            self.ingest_document(path, &source_name, &mut output);
        }

        output.report.total_chunks = output.corpus.len();
        info!(
            "Ingestion complete: {} chunks from {} documents ({} steps skipped)",
            output.report.total_chunks,
            output.report.documents.len(),
            output.report.total_skips()
        );

        Ok(output)
    }

    /// Ingest a single document into the output, recording its report.
    /// Failures stay inside the document report; the run continues.
    fn ingest_document(&self, path: &Path, source_name: &str, output: &mut IngestOutput) {
        let extractor = ContentExtractor::new(&self.normalizer, self.ocr.as_deref());

        let (units, skips) = match source_for_path(path) {
            Ok(source) => extractor.extract(source_name, source.as_ref()),
            Err(e) => (
                Vec::new(),
                vec![StepSkip::new(SkipStage::Document, None, e.to_string())],
            ),
        };

        let chunks = self.split_units(&units);

        output.report.documents.push(DocumentReport {
            source: source_name.to_string(),
            content_hash: hash_file(path),
            units: units.len(),
            chunks: chunks.len(),
            skips,
        });
        output.corpus.extend(chunks);
    }

    /// Split content units into chunks.
    ///
    /// Table units map 1:1 to chunks unconditionally; only narrative and
    /// OCR units pass through the bounded splitter.
    pub fn split_units(&self, units: &[ContentUnit]) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for unit in units {
            match unit.modality {
                Modality::Table => chunks.push(Chunk::from_unit(unit, unit.content.clone())),
                Modality::Text | Modality::Image => {
                    chunks.extend(
                        self.splitter
                            .split(&unit.content)
                            .into_iter()
                            .map(|window| Chunk::from_unit(unit, window)),
                    );
                }
            }
        }

        chunks
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// SHA-256 of a file's contents, hex encoded.
fn hash_file(path: &Path) -> Option<String> {
    let content = std::fs::read(path).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    let digest = hasher.finalize();
    Some(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docint_config::ChunkingConfig;

    fn ingestor() -> Ingestor {
        Ingestor::with_ocr(&Config::default(), None)
    }

    fn write_manifest(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    const MANIFEST: &str = r#"{
        "pages": [
            {
                "tables": [[["Year", "GDP growth (%)"], ["2022", "3.5"]]],
                "text": "GDP grew 3.5 percent."
            },
            { "text": "The non-hydrocarbon sector continued its expansion." }
        ]
    }"#;

    #[test]
    fn test_missing_uploads_dir_is_soft_noop() {
        let output = ingestor().run(Path::new("/nonexistent/uploads")).unwrap();
        assert!(output.corpus.is_empty());
        assert!(output.report.is_empty());
        assert!(output.report.documents.is_empty());
    }

    #[test]
    fn test_run_over_manifest() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), "report.json", MANIFEST);

        let output = ingestor().run(dir.path()).unwrap();

        // Page 1: table statement only (numeric prose suppressed).
        // Page 2: one narrative chunk.
        assert_eq!(output.corpus.len(), 2);
        assert_eq!(
            output.corpus[0].text,
            "In 2022, Qatar's GDP growth was 3.5 % (Page 1, Table)"
        );
        assert_eq!(output.corpus[0].meta.modality, Modality::Table);
        assert_eq!(output.corpus[0].meta.page, 1);
        assert_eq!(output.corpus[0].meta.source, "report.json");
        assert_eq!(output.corpus[1].meta.modality, Modality::Text);
        assert_eq!(output.report.total_chunks, 2);
        assert_eq!(output.report.documents.len(), 1);
        assert_eq!(output.report.documents[0].skips.len(), 1);
        assert!(output.report.documents[0].content_hash.is_some());
    }

    #[test]
    fn test_run_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), "b.json", MANIFEST);
        write_manifest(
            dir.path(),
            "a.json",
            r#"{ "pages": [ { "text": "Standalone narrative page." } ] }"#,
        );

        let first = ingestor().run(dir.path()).unwrap();
        let second = ingestor().run(dir.path()).unwrap();

        let texts = |o: &IngestOutput| o.corpus.iter().map(|c| c.text.clone()).collect::<Vec<_>>();
        assert_eq!(texts(&first), texts(&second));
        // Sorted path order: a.json before b.json.
        assert_eq!(first.corpus[0].meta.source, "a.json");
    }

    #[test]
    fn test_corrupt_document_does_not_abort_run() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), "a.json", "{ broken");
        write_manifest(dir.path(), "b.json", MANIFEST);

        let output = ingestor().run(dir.path()).unwrap();

        assert_eq!(output.report.documents.len(), 2);
        let broken = &output.report.documents[0];
        assert_eq!(broken.chunks, 0);
        assert_eq!(broken.skips[0].stage, SkipStage::Document);
        assert_eq!(output.corpus.len(), 2);
    }

    #[test]
    fn test_table_chunks_never_split() {
        let mut config = Config::default();
        config.chunking = ChunkingConfig {
            max_size: 20,
            overlap: 5,
        };
        let ingestor = Ingestor::with_ocr(&config, None);

        let long_statement =
            "In 2022, Qatar's Consolidated non-hydrocarbon fiscal revenue was 87.4 billion QAR (Page 6, Table)"
                .to_string();
        let units = vec![
            ContentUnit::new(long_statement.clone(), 6, Modality::Table, "r.json"),
            ContentUnit::new(
                "A narrative sentence. Another narrative sentence follows it here.",
                6,
                Modality::Text,
                "r.json",
            ),
        ];

        let chunks = ingestor.split_units(&units);

        let table_chunks: Vec<_> = chunks
            .iter()
            .filter(|c| c.meta.modality == Modality::Table)
            .collect();
        assert_eq!(table_chunks.len(), 1);
        assert_eq!(table_chunks[0].text, long_statement);

        // Narrative was split and stays within the bound.
        let text_chunks: Vec<_> = chunks
            .iter()
            .filter(|c| c.meta.modality == Modality::Text)
            .collect();
        assert!(text_chunks.len() > 1);
        for c in text_chunks {
            assert!(c.text.chars().count() <= 25);
        }
    }

    #[test]
    fn test_unsupported_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        std::fs::write(dir.path().join(".hidden.json"), MANIFEST).unwrap();

        let output = ingestor().run(dir.path()).unwrap();
        assert!(output.report.documents.is_empty());
    }
}

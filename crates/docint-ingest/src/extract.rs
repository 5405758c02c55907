//! Content extraction: pages to typed content units.

use crate::report::{SkipStage, StepSkip};
use crate::table::TableNormalizer;
use docint_core::{ContentUnit, Modality};
use docint_extract::{OcrEngine, PageSource};
use regex::Regex;
use tracing::debug;

/// Turns a document's pages into content units, tables first.
pub struct ContentExtractor<'a> {
    normalizer: &'a TableNormalizer,
    ocr: Option<&'a dyn OcrEngine>,
    numeric_summary: Regex,
}

impl<'a> ContentExtractor<'a> {
    pub fn new(normalizer: &'a TableNormalizer, ocr: Option<&'a dyn OcrEngine>) -> Self {
        Self {
            normalizer,
            ocr,
            // "<number> <percent|%|billion|currency-code>" sentences duplicate
            // table facts and are suppressed on pages that yielded tables.
            numeric_summary: Regex::new(r"\d+(\.\d+)?\s*(percent|%|billion|qar|usd)\b|\d+(\.\d+)?\s*%")
                .expect("numeric summary pattern"),
        }
    }

    /// Extract all content units from a document.
    ///
    /// Steps are independently fault-tolerant: a failed step is recorded as
    /// a [`StepSkip`] and never aborts the page or the document. Zero units
    /// is a valid result.
    pub fn extract(
        &self,
        source_name: &str,
        source: &dyn PageSource,
    ) -> (Vec<ContentUnit>, Vec<StepSkip>) {
        let mut units = Vec::new();
        let mut skips = Vec::new();

        let pages = match source.pages() {
            Ok(pages) => pages,
            Err(e) => {
                skips.push(StepSkip::new(SkipStage::Document, None, e.to_string()));
                return (units, skips);
            }
        };

        for (idx, page) in pages.iter().enumerate() {
            let page_num = (idx + 1) as u32;

            // Tables first: authoritative for numeric facts.
            let mut page_has_tables = false;
            for table in &page.tables {
                let statements = self.normalizer.normalize(table, page_num);
                if !statements.is_empty() {
                    page_has_tables = true;
                    units.extend(statements.into_iter().map(|s| {
                        ContentUnit::new(s, page_num, Modality::Table, source_name)
                    }));
                }
            }

            // Narrative text, unless it restates the tables numerically.
            if let Some(text) = page.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                if page_has_tables && self.is_numeric_summary(text) {
                    skips.push(StepSkip::new(
                        SkipStage::Text,
                        Some(page_num),
                        "numeric summary suppressed in favor of table facts",
                    ));
                } else {
                    units.push(ContentUnit::new(text, page_num, Modality::Text, source_name));
                }
            }

            // Regions the source could not load never reach OCR; they
            // still belong in the report.
            for reason in &page.skipped_images {
                skips.push(StepSkip::new(SkipStage::Ocr, Some(page_num), reason.clone()));
            }

            // OCR every embedded image region as its own unit.
            for (region_idx, region) in page.images.iter().enumerate() {
                let Some(ocr) = self.ocr else {
                    skips.push(StepSkip::new(
                        SkipStage::Ocr,
                        Some(page_num),
                        "no OCR engine available",
                    ));
                    continue;
                };

                match ocr.recognize(region) {
                    Ok(text) if !text.trim().is_empty() => {
                        units.push(ContentUnit::new(
                            text.trim(),
                            page_num,
                            Modality::Image,
                            source_name,
                        ));
                    }
                    Ok(_) => {
                        debug!(
                            "Empty OCR output for region {} on page {} of {}",
                            region_idx, page_num, source_name
                        );
                    }
                    Err(e) => {
                        skips.push(StepSkip::new(SkipStage::Ocr, Some(page_num), e.to_string()));
                    }
                }
            }
        }

        (units, skips)
    }

    fn is_numeric_summary(&self, text: &str) -> bool {
        self.numeric_summary.is_match(&text.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docint_config::IngestConfig;
    use docint_extract::{ExtractError, ExtractResult, ImageRegion, PageContent};

    struct StubSource {
        pages: Vec<PageContent>,
    }

    impl PageSource for StubSource {
        fn pages(&self) -> ExtractResult<Vec<PageContent>> {
            Ok(self.pages.clone())
        }
    }

    struct FailingSource;

    impl PageSource for FailingSource {
        fn pages(&self) -> ExtractResult<Vec<PageContent>> {
            Err(ExtractError::ParseError {
                path: "bad.pdf".into(),
                message: "corrupt xref".into(),
            })
        }
    }

    struct StubOcr {
        text: &'static str,
        fail: bool,
    }

    impl OcrEngine for StubOcr {
        fn recognize(&self, _region: &ImageRegion) -> ExtractResult<String> {
            if self.fail {
                Err(ExtractError::Ocr("engine crashed".into()))
            } else {
                Ok(self.text.to_string())
            }
        }
    }

    fn region() -> ImageRegion {
        ImageRegion {
            data: vec![0u8; 8],
            format: "png".into(),
        }
    }

    fn table_page() -> PageContent {
        PageContent {
            tables: vec![vec![
                vec!["Year".into(), "GDP growth (%)".into()],
                vec!["2022".into(), "3.5".into()],
            ]],
            ..PageContent::default()
        }
    }

    fn extractor_parts() -> TableNormalizer {
        TableNormalizer::new(&IngestConfig::default())
    }

    #[test]
    fn test_tables_become_table_units() {
        let normalizer = extractor_parts();
        let extractor = ContentExtractor::new(&normalizer, None);
        let source = StubSource {
            pages: vec![table_page()],
        };

        let (units, skips) = extractor.extract("report.pdf", &source);

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].modality, Modality::Table);
        assert_eq!(units[0].page, 1);
        assert_eq!(units[0].content, "In 2022, Qatar's GDP growth was 3.5 % (Page 1, Table)");
        assert!(skips.is_empty());
    }

    #[test]
    fn test_numeric_summary_suppressed_when_tables_present() {
        let normalizer = extractor_parts();
        let extractor = ContentExtractor::new(&normalizer, None);

        let mut page = table_page();
        page.text = Some("GDP grew by 3.5 percent over the year.".into());
        let source = StubSource { pages: vec![page] };

        let (units, skips) = extractor.extract("report.pdf", &source);

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].modality, Modality::Table);
        assert_eq!(skips.len(), 1);
        assert_eq!(skips[0].stage, SkipStage::Text);
    }

    #[test]
    fn test_narrative_kept_without_tables() {
        let normalizer = extractor_parts();
        let extractor = ContentExtractor::new(&normalizer, None);

        let source = StubSource {
            pages: vec![PageContent {
                text: Some("GDP grew by 3.5 percent over the year.".into()),
                ..PageContent::default()
            }],
        };

        let (units, _) = extractor.extract("report.pdf", &source);

        // Numeric prose survives when no table claims the same facts.
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].modality, Modality::Text);
    }

    #[test]
    fn test_non_numeric_text_kept_alongside_tables() {
        let normalizer = extractor_parts();
        let extractor = ContentExtractor::new(&normalizer, None);

        let mut page = table_page();
        page.text = Some("The outlook remains broadly favorable.".into());
        let source = StubSource { pages: vec![page] };

        let (units, skips) = extractor.extract("report.pdf", &source);

        assert_eq!(units.len(), 2);
        assert!(skips.is_empty());
    }

    #[test]
    fn test_ocr_units_and_failures() {
        let normalizer = extractor_parts();
        let ocr = StubOcr {
            text: "Figure 3: debt trajectory",
            fail: false,
        };
        let extractor = ContentExtractor::new(&normalizer, Some(&ocr));

        let source = StubSource {
            pages: vec![PageContent {
                images: vec![region(), region()],
                ..PageContent::default()
            }],
        };

        let (units, skips) = extractor.extract("scan.pdf", &source);
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|u| u.modality == Modality::Image));
        assert!(skips.is_empty());

        let failing = StubOcr {
            text: "",
            fail: true,
        };
        let extractor = ContentExtractor::new(&normalizer, Some(&failing));
        let (units, skips) = extractor.extract("scan.pdf", &source);

        // A failed region is skipped, not fatal.
        assert!(units.is_empty());
        assert_eq!(skips.len(), 2);
        assert!(skips.iter().all(|s| s.stage == SkipStage::Ocr));
    }

    #[test]
    fn test_unloadable_image_region_is_a_skip() {
        let normalizer = extractor_parts();
        let ocr = StubOcr {
            text: "Figure 3: debt trajectory",
            fail: false,
        };
        let extractor = ContentExtractor::new(&normalizer, Some(&ocr));

        let source = StubSource {
            pages: vec![PageContent {
                images: vec![region()],
                skipped_images: vec!["image region p2-chart.png: No such file".into()],
                ..PageContent::default()
            }],
        };

        let (units, skips) = extractor.extract("scan.pdf", &source);

        // The readable region still yields a unit; the lost one is reported.
        assert_eq!(units.len(), 1);
        assert_eq!(skips.len(), 1);
        assert_eq!(skips[0].stage, SkipStage::Ocr);
        assert_eq!(skips[0].page, Some(1));
        assert!(skips[0].reason.contains("p2-chart.png"));
    }

    #[test]
    fn test_document_failure_is_a_skip() {
        let normalizer = extractor_parts();
        let extractor = ContentExtractor::new(&normalizer, None);

        let (units, skips) = extractor.extract("bad.pdf", &FailingSource);

        assert!(units.is_empty());
        assert_eq!(skips.len(), 1);
        assert_eq!(skips[0].stage, SkipStage::Document);
    }
}

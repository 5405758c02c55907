//! Citation formatting.

use crate::types::{ChunkMeta, Modality};
use std::collections::BTreeSet;

/// Label for a single retrieved chunk, e.g. `Page 4 (table)`.
pub fn citation_label(page: u32, modality: Modality) -> String {
    format!("Page {} ({})", page, modality)
}

/// The citation line for a set of retrieved chunks: distinct labels,
/// lexicographically sorted, comma-joined.
pub fn citations_line<'a>(metas: impl IntoIterator<Item = &'a ChunkMeta>) -> String {
    let labels: BTreeSet<String> = metas
        .into_iter()
        .map(|m| citation_label(m.page, m.modality))
        .collect();

    labels.into_iter().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(page: u32, modality: Modality) -> ChunkMeta {
        ChunkMeta {
            page,
            modality,
            source: "doc.pdf".to_string(),
        }
    }

    #[test]
    fn test_citation_label() {
        assert_eq!(citation_label(4, Modality::Table), "Page 4 (table)");
        assert_eq!(citation_label(12, Modality::Image), "Page 12 (image)");
    }

    #[test]
    fn test_citations_deduplicated_and_sorted() {
        let metas = vec![
            meta(3, Modality::Text),
            meta(1, Modality::Table),
            meta(3, Modality::Text),
            meta(2, Modality::Image),
        ];

        let line = citations_line(&metas);
        assert_eq!(line, "Page 1 (table), Page 2 (image), Page 3 (text)");
    }

    #[test]
    fn test_citations_empty() {
        assert_eq!(citations_line(&[]), "");
    }
}

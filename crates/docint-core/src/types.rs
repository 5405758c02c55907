//! Domain types shared across the ingestion and retrieval crates.

use serde::{Deserialize, Serialize};

/// Identifier of a chunk: its position in the corpus ordering.
///
/// The chunk-text store, metadata store, vector index and lexical index all
/// share this ordering. Anything that renumbers one of them breaks citations.
pub type ChunkId = usize;

/// Where a piece of content came from within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// A normalized table statement.
    Table,
    /// Narrative page text.
    Text,
    /// OCR output from an embedded image region.
    Image,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Table => "table",
            Modality::Text => "text",
            Modality::Image => "image",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(Modality::Table),
            "text" => Some(Modality::Text),
            "image" => Some(Modality::Image),
            _ => None,
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw extracted span (table statement, page narrative, OCR text) before
/// splitting. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentUnit {
    pub content: String,
    pub page: u32,
    pub modality: Modality,
    pub source: String,
}

impl ContentUnit {
    pub fn new(
        content: impl Into<String>,
        page: u32,
        modality: Modality,
        source: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            page,
            modality,
            source: source.into(),
        }
    }
}

/// Metadata persisted alongside every chunk, under the same id ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub page: u32,
    pub modality: Modality,
    pub source: String,
}

/// The minimal retrievable, citable unit of text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub meta: ChunkMeta,
}

impl Chunk {
    pub fn new(text: impl Into<String>, page: u32, modality: Modality, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meta: ChunkMeta {
                page,
                modality,
                source: source.into(),
            },
        }
    }

    /// Derive a chunk from a content unit, keeping its metadata.
    pub fn from_unit(unit: &ContentUnit, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meta: ChunkMeta {
                page: unit.page,
                modality: unit.modality,
                source: unit.source.clone(),
            },
        }
    }
}

/// One fused retrieval result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub chunk_id: ChunkId,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modality_roundtrip() {
        for m in [Modality::Table, Modality::Text, Modality::Image] {
            assert_eq!(Modality::from_str(m.as_str()), Some(m));
        }
        assert_eq!(Modality::from_str("TABLE"), Some(Modality::Table));
        assert_eq!(Modality::from_str("video"), None);
    }

    #[test]
    fn test_chunk_from_unit_keeps_metadata() {
        let unit = ContentUnit::new("some narrative", 7, Modality::Text, "report.pdf");
        let chunk = Chunk::from_unit(&unit, "a window of it");

        assert_eq!(chunk.text, "a window of it");
        assert_eq!(chunk.meta.page, 7);
        assert_eq!(chunk.meta.modality, Modality::Text);
        assert_eq!(chunk.meta.source, "report.pdf");
    }
}

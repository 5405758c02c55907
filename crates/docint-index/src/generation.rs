//! A loaded index generation and its search operations.

use crate::bm25::{tokenize, Bm25Index};
use crate::error::{IndexError, IndexResult};
use crate::fusion::reciprocal_rank_fusion;
use crate::store;
use docint_config::RetrievalConfig;
use docint_core::{Chunk, ChunkId, RetrievalHit};
use std::path::Path;
use tracing::info;

/// Build metadata persisted with a generation.
#[derive(Debug, Clone)]
pub struct GenerationInfo {
    pub id: String,
    pub embedding_model: String,
    pub dim: usize,
    pub chunk_count: usize,
    pub created_at: String,
}

/// One complete, internally consistent index generation, loaded into
/// memory. Read-only: queries share it freely with no locking.
#[derive(Debug)]
pub struct IndexGeneration {
    info: GenerationInfo,
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
    bm25: Bm25Index,
}

impl IndexGeneration {
    /// Load the generation stored in `dir`, validating that all artifacts
    /// are present and mutually consistent. Any divergence is fatal.
    pub fn load(dir: &Path) -> IndexResult<Self> {
        let db_path = dir.join(store::GENERATION_DB_FILE);
        if !db_path.exists() {
            return Err(IndexError::NotFound(dir.to_path_buf()));
        }

        let conn = store::open(&db_path)?;
        let info = store::read_info(&conn)?;
        let (chunks, vectors) = store::read_chunks(&conn, info.dim)?;

        if chunks.len() != info.chunk_count {
            return Err(IndexError::Inconsistent(format!(
                "generation declares {} chunks but stores {}",
                info.chunk_count,
                chunks.len()
            )));
        }

        // The lexical statistics are rebuilt from the chunk texts so they
        // can never drift from the stored ordering.
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let bm25 = Bm25Index::fit(&texts);

        info!(
            "Loaded generation {} ({} chunks, dim {})",
            info.id,
            chunks.len(),
            info.dim
        );

        Ok(Self {
            info,
            chunks,
            vectors,
            bm25,
        })
    }

    /// Assemble a generation directly from build artifacts (used by the
    /// builder before persisting, and by tests).
    pub fn from_parts(info: GenerationInfo, chunks: Vec<Chunk>, vectors: Vec<Vec<f32>>) -> Self {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let bm25 = Bm25Index::fit(&texts);
        Self {
            info,
            chunks,
            vectors,
            bm25,
        }
    }

    pub fn info(&self) -> &GenerationInfo {
        &self.info
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Exact nearest-neighbor search by L2 distance.
    ///
    /// Brute-force over all vectors; squared distances preserve the L2
    /// ranking so the square root is skipped. The query must match the
    /// generation's embedding dimension; a mismatch means the caller
    /// embedded with a different model than the one the index was built
    /// with, and ranking against it would be meaningless.
    pub fn vector_search(&self, query: &[f32], k: usize) -> IndexResult<Vec<(ChunkId, f32)>> {
        if query.len() != self.info.dim {
            return Err(IndexError::InvalidInput(format!(
                "query vector has {} dimensions but generation {} stores {} (embedding model {})",
                query.len(),
                self.info.id,
                self.info.dim,
                self.info.embedding_model
            )));
        }

        let mut ranked: Vec<(ChunkId, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, v)| (id, squared_l2(query, v)))
            .collect();

        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        Ok(ranked)
    }

    /// Top-k chunks by BM25 score for a query string.
    pub fn lexical_search(&self, query: &str, k: usize) -> Vec<(ChunkId, f64)> {
        self.bm25.top(&tokenize(query), k)
    }

    /// Hybrid retrieval: dense and lexical candidates fused with RRF.
    pub fn hybrid_search(
        &self,
        query_vector: &[f32],
        query_text: &str,
        config: &RetrievalConfig,
    ) -> IndexResult<Vec<RetrievalHit>> {
        let dense: Vec<ChunkId> = self
            .vector_search(query_vector, config.candidates)?
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        let lexical: Vec<ChunkId> = self
            .lexical_search(query_text, config.candidates)
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        let mut fused = reciprocal_rank_fusion(&[&dense, &lexical], config.rrf_k);
        fused.truncate(config.top_n);
        Ok(fused)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docint_core::Modality;

    fn chunk(text: &str, page: u32, modality: Modality) -> Chunk {
        Chunk::new(text, page, modality, "doc.pdf")
    }

    fn test_generation() -> IndexGeneration {
        let chunks = vec![
            chunk("In 2022, Qatar's GDP growth was 3.5 % (Page 4, Table)", 4, Modality::Table),
            chunk("The outlook for tourism remains strong.", 5, Modality::Text),
            chunk("Inflation moderated through the year.", 6, Modality::Text),
        ];
        let vectors = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        let info = GenerationInfo {
            id: "test".to_string(),
            embedding_model: "test-model".to_string(),
            dim: 3,
            chunk_count: 3,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        IndexGeneration::from_parts(info, chunks, vectors)
    }

    #[test]
    fn test_vector_search_orders_by_distance() {
        let generation = test_generation();
        let hits = generation.vector_search(&[0.9, 0.1, 0.0], 2).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0, 0);
        assert_eq!(hits[1].0, 1);
        assert!(hits[0].1 < hits[1].1);
    }

    #[test]
    fn test_vector_search_rejects_wrong_dimension() {
        let generation = test_generation();

        // A shorter query would otherwise rank chunk 0 first at distance
        // 0.0 by ignoring its third component.
        let err = generation.vector_search(&[1.0, 0.0], 2).unwrap_err();
        assert!(matches!(err, IndexError::InvalidInput(_)));
        assert!(err.to_string().contains("test-model"));
    }

    #[test]
    fn test_hybrid_search_rejects_wrong_dimension() {
        let generation = test_generation();
        let config = RetrievalConfig {
            candidates: 20,
            top_n: 2,
            rrf_k: 60,
            max_context_chars: 0,
        };

        let err = generation
            .hybrid_search(&[1.0, 0.0], "gdp growth", &config)
            .unwrap_err();
        assert!(matches!(err, IndexError::InvalidInput(_)));
    }

    #[test]
    fn test_lexical_search_finds_exact_tokens() {
        let generation = test_generation();
        let hits = generation.lexical_search("3.5 gdp", 3);

        assert_eq!(hits[0].0, 0);
        assert!(hits[0].1 > 0.0);
    }

    #[test]
    fn test_hybrid_search_returns_top_n() {
        let generation = test_generation();
        let config = RetrievalConfig {
            candidates: 20,
            top_n: 2,
            rrf_k: 60,
            max_context_chars: 0,
        };

        let hits = generation
            .hybrid_search(&[1.0, 0.0, 0.0], "gdp growth", &config)
            .unwrap();

        assert_eq!(hits.len(), 2);
        // Chunk 0 leads both lists.
        assert_eq!(hits[0].chunk_id, 0);
        let expected = 1.0 / 60.0 + 1.0 / 60.0;
        assert!((hits[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_hybrid_search_irrelevant_query_still_fills_top_n() {
        let generation = test_generation();
        let config = RetrievalConfig {
            candidates: 20,
            top_n: 2,
            rrf_k: 60,
            max_context_chars: 0,
        };

        let hits = generation
            .hybrid_search(&[0.5, 0.5, 0.5], "zzz unrelated", &config)
            .unwrap();
        assert_eq!(hits.len(), 2);
    }
}

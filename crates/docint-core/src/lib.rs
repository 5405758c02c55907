//! Core domain types for docint.

pub mod citation;
pub mod types;

pub use citation::{citation_label, citations_line};
pub use types::{Chunk, ChunkId, ChunkMeta, ContentUnit, Modality, RetrievalHit};

//! Index generations: building, persistence, and hybrid retrieval.
//!
//! A generation is the versioned bundle of four co-indexed artifacts --
//! chunk texts, chunk metadata, vectors, and lexical statistics -- sharing
//! one integer-id ordering. Builds are all-or-nothing: a new generation is
//! written into a staging directory and swapped in only once complete.

mod bm25;
mod builder;
mod error;
mod fusion;
mod generation;
mod handle;
mod store;

pub use bm25::{tokenize, Bm25Index};
pub use builder::IndexBuilder;
pub use error::{IndexError, IndexResult};
pub use fusion::reciprocal_rank_fusion;
pub use generation::{GenerationInfo, IndexGeneration};
pub use handle::GenerationHandle;
pub use store::GENERATION_DB_FILE;

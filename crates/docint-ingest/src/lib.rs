//! Ingestion pipeline: content extraction, table normalization, chunk
//! splitting, and the per-run report.

mod error;
mod extract;
mod pipeline;
mod report;
mod splitter;
mod table;

pub use error::{IngestError, IngestResult};
pub use extract::ContentExtractor;
pub use pipeline::{IngestOutput, Ingestor};
pub use report::{DocumentReport, IngestReport, SkipStage, StepSkip};
pub use splitter::Splitter;
pub use table::TableNormalizer;

//! Ollama integration: embedding generation and grounded answering over
//! retrieved document chunks.

mod client;
mod error;
pub mod rag;
mod types;

pub use client::OllamaClient;
pub use error::{OllamaError, OllamaResult};
pub use rag::{RagAnswer, RagEngine, RagResponse};
pub use types::*;

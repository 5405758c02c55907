//! Configuration for docint.

mod config;
mod error;
mod paths;

pub use config::{
    ChunkingConfig, Config, IngestConfig, OllamaConfig, RetrievalConfig, ServerConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use paths::AppPaths;

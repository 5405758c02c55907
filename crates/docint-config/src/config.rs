//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path. A missing file yields the
    /// defaults.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::default_config_string())?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.chunking.max_size == 0 {
            return Err(ConfigError::Invalid(
                "chunking.max_size must be greater than zero".to_string(),
            ));
        }
        if self.chunking.overlap >= self.chunking.max_size {
            return Err(ConfigError::Invalid(format!(
                "chunking.overlap ({}) must be smaller than chunking.max_size ({})",
                self.chunking.overlap, self.chunking.max_size
            )));
        }
        if self.retrieval.top_n == 0 || self.retrieval.candidates == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.top_n and retrieval.candidates must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# docint configuration
# Multi-modal document intelligence: ingestion, hybrid retrieval, Q&A.

[server]
host = "127.0.0.1"
port = 8000

[ollama]
# Ollama server address
host = "http://localhost:11434"

# Model used to answer questions
model = "llama3"

# Model used for embeddings
embedding_model = "nomic-embed-text"

# Request timeout in seconds (applies to answer generation)
timeout_seconds = 120

[ingest]
# Entity name used in normalized table statements
entity = "Qatar"

# Unit attached to currency-denominated table columns
currency_unit = "billion QAR"

[chunking]
# Maximum window size in characters for narrative/OCR content
max_size = 500

# Overlap between consecutive windows
overlap = 100

[retrieval]
# Candidates pulled from each ranked list before fusion
candidates = 20

# Fused results returned per query
top_n = 6

# Reciprocal rank fusion smoothing constant
rrf_k = 60

# Context budget for answer generation, in characters (0 = unbounded)
max_context_chars = 12000
"#
        .to_string()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Ollama settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub model: String,
    pub embedding_model: String,
    pub timeout_seconds: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            timeout_seconds: 120,
        }
    }
}

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Entity name used when composing table statements.
    pub entity: String,
    /// Unit attached to currency-denominated columns.
    pub currency_unit: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            entity: "Qatar".to_string(),
            currency_unit: "billion QAR".to_string(),
        }
    }
}

/// Chunk splitting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_size: 500,
            overlap: 100,
        }
    }
}

/// Hybrid retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Candidates pulled from each of the dense and lexical lists.
    pub candidates: usize,
    /// Fused results returned per query.
    pub top_n: usize,
    /// RRF smoothing constant.
    pub rrf_k: u32,
    /// Context budget in characters for answer generation (0 = unbounded).
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            candidates: 20,
            top_n: 6,
            rrf_k: 60,
            max_context_chars: 12000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chunking.max_size, 500);
        assert_eq!(config.chunking.overlap, 100);
        assert_eq!(config.retrieval.candidates, 20);
        assert_eq!(config.retrieval.top_n, 6);
        assert_eq!(config.retrieval.rrf_k, 60);
        assert_eq!(config.ollama.timeout_seconds, 120);
        assert_eq!(config.ingest.entity, "Qatar");
    }

    #[test]
    fn test_default_file_parses() {
        let config: Config = toml::from_str(&Config::default_config_string()).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.ingest.currency_unit, "billion QAR");
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[ollama]\nmodel = \"mistral\"\n").unwrap();
        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.ollama.embedding_model, "nomic-embed-text");
        assert_eq!(config.retrieval.top_n, 6);
    }

    #[test]
    fn test_validate_rejects_bad_chunking() {
        let mut config = Config::default();
        config.chunking.overlap = config.chunking.max_size;

        let err = config.validate().unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("overlap")),
            other => panic!("unexpected error: {}", other),
        }
    }
}

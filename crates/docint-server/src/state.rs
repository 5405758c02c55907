//! Shared application state.

use docint_config::Config;
use docint_index::GenerationHandle;
use docint_ollama::{OllamaClient, OllamaResult, RagEngine};
use std::sync::Arc;

/// State handed to every request handler. Cloning is cheap; the loaded
/// generation sits behind its own handle.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    client: OllamaClient,
    engine: RagEngine,
    generation: GenerationHandle,
}

impl AppState {
    pub fn new(config: Config, generation: GenerationHandle) -> OllamaResult<Self> {
        let client = OllamaClient::from_config(&config.ollama)?;
        let engine = RagEngine::new(
            client.clone(),
            &config.ollama.model,
            config.retrieval.max_context_chars,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                engine,
                generation,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn client(&self) -> &OllamaClient {
        &self.inner.client
    }

    pub fn engine(&self) -> &RagEngine {
        &self.inner.engine
    }

    pub fn generation(&self) -> &GenerationHandle {
        &self.inner.generation
    }
}

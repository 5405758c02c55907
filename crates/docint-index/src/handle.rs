//! Shared handle to the live generation.

use crate::generation::IndexGeneration;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cheaply cloneable handle that always points at a complete generation.
///
/// Readers grab an `Arc` to the current generation and query it without
/// holding any lock; a swap only replaces the pointer, so in-flight queries
/// finish against the generation they started with.
#[derive(Clone)]
pub struct GenerationHandle {
    inner: Arc<RwLock<Arc<IndexGeneration>>>,
}

impl GenerationHandle {
    pub fn new(generation: IndexGeneration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(generation))),
        }
    }

    /// Snapshot of the current generation.
    pub fn current(&self) -> Arc<IndexGeneration> {
        self.inner.read().clone()
    }

    /// Atomically replace the live generation.
    pub fn swap(&self, generation: IndexGeneration) {
        *self.inner.write() = Arc::new(generation);
    }
}

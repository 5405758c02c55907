//! Building a new generation and swapping it live.

use crate::error::{IndexError, IndexResult};
use crate::generation::{GenerationInfo, IndexGeneration};
use crate::store;
use chrono::Utc;
use docint_core::Chunk;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Writes generations into a staging directory and rotates them into place.
///
/// The live generation directory is never mutated: a build goes to staging
/// in full, is re-validated, and only then replaces the previous directory.
pub struct IndexBuilder {
    staging_dir: PathBuf,
    index_dir: PathBuf,
}

impl IndexBuilder {
    pub fn new(staging_dir: impl Into<PathBuf>, index_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            index_dir: index_dir.into(),
        }
    }

    /// Write a complete generation into the staging directory.
    ///
    /// All-or-nothing: leftover staging state from an aborted build is
    /// discarded first, and the staged artifacts are loaded back and
    /// validated before this returns.
    pub fn build(
        &self,
        corpus: &[Chunk],
        vectors: &[Vec<f32>],
        embedding_model: &str,
    ) -> IndexResult<GenerationInfo> {
        if corpus.is_empty() {
            return Err(IndexError::InvalidInput(
                "cannot build a generation from an empty corpus".to_string(),
            ));
        }
        if corpus.len() != vectors.len() {
            return Err(IndexError::InvalidInput(format!(
                "{} chunks but {} vectors",
                corpus.len(),
                vectors.len()
            )));
        }

        let dim = vectors[0].len();
        if dim == 0 || vectors.iter().any(|v| v.len() != dim) {
            return Err(IndexError::InvalidInput(
                "embedding vectors have inconsistent dimensions".to_string(),
            ));
        }

        if self.staging_dir.exists() {
            std::fs::remove_dir_all(&self.staging_dir)?;
        }
        std::fs::create_dir_all(&self.staging_dir)?;

        let generation_info = GenerationInfo {
            id: Uuid::new_v4().to_string(),
            embedding_model: embedding_model.to_string(),
            dim,
            chunk_count: corpus.len(),
            created_at: Utc::now().to_rfc3339(),
        };

        let db_path = self.staging_dir.join(store::GENERATION_DB_FILE);
        store::write_generation(&db_path, &generation_info, corpus, vectors)?;

        // Read the staged artifacts back; a generation that cannot load
        // must never be swapped in.
        IndexGeneration::load(&self.staging_dir)?;

        Ok(generation_info)
    }

    /// Replace the live generation with the staged one.
    ///
    /// The previous generation is moved aside before the staged directory
    /// takes its path, so a reader either sees the old directory or the new
    /// one, never a half-written mix.
    pub fn commit(&self) -> IndexResult<()> {
        if !self.staging_dir.exists() {
            return Err(IndexError::NotFound(self.staging_dir.clone()));
        }

        let retired = retired_path(&self.index_dir);
        if retired.exists() {
            std::fs::remove_dir_all(&retired)?;
        }

        let had_previous = self.index_dir.exists();
        if had_previous {
            std::fs::rename(&self.index_dir, &retired)?;
        }

        std::fs::rename(&self.staging_dir, &self.index_dir)?;

        if had_previous {
            std::fs::remove_dir_all(&retired)?;
        }

        info!("Generation swapped into {:?}", self.index_dir);
        Ok(())
    }

    /// Build and swap in one step, returning the loaded new generation.
    pub fn build_and_commit(
        &self,
        corpus: &[Chunk],
        vectors: &[Vec<f32>],
        embedding_model: &str,
    ) -> IndexResult<IndexGeneration> {
        self.build(corpus, vectors, embedding_model)?;
        self.commit()?;
        IndexGeneration::load(&self.index_dir)
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }
}

fn retired_path(index_dir: &Path) -> PathBuf {
    let mut name = index_dir.file_name().unwrap_or_default().to_os_string();
    name.push(".old");
    index_dir.with_file_name(name)
}

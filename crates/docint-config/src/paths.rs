//! Application paths management.

use directories::ProjectDirs;
use std::path::PathBuf;

/// Manages all application paths following platform conventions.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub config_file: PathBuf,
    /// The live index generation.
    pub index_dir: PathBuf,
    /// Where a new generation is built before the swap.
    pub staging_dir: PathBuf,
    /// Documents waiting to be ingested.
    pub uploads_dir: PathBuf,
}

impl AppPaths {
    /// Create paths using platform-specific directories.
    pub fn new() -> Option<Self> {
        let proj_dirs = ProjectDirs::from("com", "docint", "docint")?;

        let config_dir = proj_dirs.config_dir().to_path_buf();
        let data_dir = proj_dirs.data_dir().to_path_buf();

        Some(Self::from_dirs(config_dir, data_dir))
    }

    /// Create paths rooted at explicit directories (used by tests and the
    /// `--data-dir` override).
    pub fn from_dirs(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_file: config_dir.join("config.toml"),
            index_dir: data_dir.join("index"),
            staging_dir: data_dir.join("index.staging"),
            uploads_dir: data_dir.join("uploads"),
            config_dir,
            data_dir,
        }
    }

    /// Create all necessary directories.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.uploads_dir)?;
        Ok(())
    }

    /// Check if docint has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }

    /// Whether a built index generation exists.
    pub fn has_index(&self) -> bool {
        self.index_dir.exists()
    }
}

//! CLI command implementations.

pub mod ask;
pub mod ingest;
pub mod init;
pub mod search;
pub mod serve;
pub mod status;

use anyhow::{Context, Result};
use docint_config::{AppPaths, Config};
use docint_index::IndexGeneration;

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Load paths and config, requiring a prior `docint init`.
pub fn get_config() -> Result<(AppPaths, Config)> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("docint is not initialized. Run 'docint init' first.");
    }

    let config = Config::load_from(&paths.config_file).context("Failed to load configuration")?;
    Ok((paths, config))
}

/// Load the live index generation, requiring a prior `docint ingest`.
pub fn get_generation(paths: &AppPaths) -> Result<IndexGeneration> {
    if !paths.has_index() {
        anyhow::bail!("No index found. Run 'docint ingest' first.");
    }

    IndexGeneration::load(&paths.index_dir).context("Failed to load index generation")
}

/// One-line preview of a chunk for terminal output.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

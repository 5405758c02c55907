//! JSON page-manifest source.
//!
//! The external table/text/image extraction service emits one manifest per
//! document: a page list with 2-D table grids, narrative text, and image
//! file references. This is the interchange format that lets tables and
//! scanned regions flow into the pipeline.
//!
//! ```json
//! {
//!   "pages": [
//!     {
//!       "tables": [[["Year", "GDP growth (%)"], ["2022", "3.5"]]],
//!       "text": "The economy expanded steadily.",
//!       "images": ["scans/p4-chart.png"]
//!     }
//!   ]
//! }
//! ```

use crate::error::{ExtractError, ExtractResult};
use crate::page::{ImageRegion, PageContent, PageSource, Table};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize)]
struct ManifestFile {
    pages: Vec<ManifestPage>,
}

#[derive(Debug, Deserialize)]
struct ManifestPage {
    #[serde(default)]
    tables: Vec<Table>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

/// Page source backed by an extraction-service manifest.
#[derive(Debug)]
pub struct ManifestSource {
    manifest: ManifestFile,
    /// Image references are resolved relative to the manifest location.
    base_dir: PathBuf,
}

impl ManifestSource {
    pub fn open(path: &Path) -> ExtractResult<Self> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let manifest: ManifestFile = serde_json::from_str(&contents)?;
        let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        Ok(Self { manifest, base_dir })
    }
}

impl PageSource for ManifestSource {
    fn pages(&self) -> ExtractResult<Vec<PageContent>> {
        let pages = self
            .manifest
            .pages
            .iter()
            .map(|page| {
                let mut images = Vec::new();
                let mut skipped_images = Vec::new();
                for image_ref in &page.images {
                    match load_image(&self.base_dir, image_ref) {
                        Ok(region) => images.push(region),
                        Err(e) => {
                            // An unreadable region must not take the page down.
                            warn!("Skipping image region {}: {}", image_ref, e);
                            skipped_images.push(format!("image region {}: {}", image_ref, e));
                        }
                    }
                }

                PageContent {
                    tables: page.tables.clone(),
                    text: page.text.clone(),
                    images,
                    skipped_images,
                }
            })
            .collect();

        Ok(pages)
    }
}

fn load_image(base_dir: &Path, image_ref: &str) -> ExtractResult<ImageRegion> {
    let path = base_dir.join(image_ref);
    let data = std::fs::read(&path)?;
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    Ok(ImageRegion { data, format })
}

//! OCR engine backed by the Tesseract CLI.

use crate::error::{ExtractError, ExtractResult};
use crate::page::{ImageRegion, OcrEngine};
use std::process::Command;
use tracing::debug;

/// Runs `tesseract` over image regions.
pub struct TesseractOcr;

impl TesseractOcr {
    /// Create the engine, verifying the tool is installed.
    pub fn new() -> ExtractResult<Self> {
        if which::which("tesseract").is_err() {
            return Err(ExtractError::ToolNotFound {
                tool: "tesseract".to_string(),
            });
        }
        Ok(Self)
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, region: &ImageRegion) -> ExtractResult<String> {
        // Tesseract reads from a file, so the region bytes go through a
        // temp file with the right extension.
        let file = tempfile::Builder::new()
            .prefix("docint-ocr-")
            .suffix(&format!(".{}", region.format))
            .tempfile()?;
        std::fs::write(file.path(), &region.data)?;

        debug!("Running OCR on {} byte region", region.data.len());

        let output = Command::new("tesseract")
            .arg(file.path())
            .arg("stdout")
            .args(["--oem", "3"])
            .args(["--psm", "1"])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Tesseract sometimes emits warnings to stderr but still works.
            if output.stdout.is_empty() {
                return Err(ExtractError::Ocr(stderr.to_string()));
            }
            debug!("Tesseract warning: {}", stderr);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

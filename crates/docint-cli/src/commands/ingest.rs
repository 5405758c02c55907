//! Ingest command - extract, chunk, embed, and swap in a new index
//! generation.

use super::get_config;
use anyhow::{Context, Result};
use colored::Colorize;
use docint_ingest::{IngestReport, Ingestor, SkipStage};
use docint_index::IndexBuilder;
use docint_ollama::OllamaClient;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// Chunks are embedded in batches so a long run shows steady progress and
/// dimension drift is caught per batch.
const EMBED_BATCH_SIZE: usize = 10;

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let (paths, config) = get_config()?;
    let uploads_dir = path.unwrap_or_else(|| paths.uploads_dir.clone());

    println!(
        "{} {}",
        "Ingesting from:".cyan().bold(),
        uploads_dir.display()
    );

    let ingestor = Ingestor::new(&config);
    let output = ingestor
        .run(&uploads_dir)
        .context("Ingestion run failed")?;

    print_report(&output.report);

    if output.corpus.is_empty() {
        println!(
            "{} Nothing to index. Drop documents into {} and run again.",
            "Note:".yellow(),
            uploads_dir.display()
        );
        return Ok(());
    }

    // Embed the corpus
    let client =
        OllamaClient::from_config(&config.ollama).context("Failed to create Ollama client")?;
    let rt = Runtime::new().context("Failed to create async runtime")?;

    if !rt.block_on(client.is_available()) {
        anyhow::bail!(
            "Ollama is not running at {}. Start it with 'ollama serve'.",
            config.ollama.host
        );
    }

    let embedding_model = &config.ollama.embedding_model;
    let has_model = rt.block_on(client.has_model(embedding_model)).unwrap_or(false);
    if !has_model {
        anyhow::bail!(
            "Model '{}' is not available. Run 'ollama pull {}' first.",
            embedding_model,
            embedding_model
        );
    }

    println!(
        "{} Embedding {} chunks with '{}'",
        "→".cyan(),
        output.corpus.len().to_string().yellow(),
        embedding_model.cyan()
    );

    let pb = ProgressBar::new(output.corpus.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let texts: Vec<String> = output.corpus.iter().map(|c| c.text.clone()).collect();
    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
    for batch in texts.chunks(EMBED_BATCH_SIZE) {
        let batch_vectors = rt
            .block_on(client.embed_batch(embedding_model, batch))
            .context("Failed to embed chunk batch")?;
        vectors.extend(batch_vectors);
        pb.inc(batch.len() as u64);
    }
    pb.finish_and_clear();

    // Build into staging and swap
    let builder = IndexBuilder::new(&paths.staging_dir, &paths.index_dir);
    let generation = builder
        .build_and_commit(&output.corpus, &vectors, embedding_model)
        .context("Failed to build index generation")?;

    println!();
    println!(
        "{} Generation {} is live ({} chunks, dim {})",
        "✓".green(),
        &generation.info().id[..8],
        generation.len(),
        generation.info().dim
    );

    Ok(())
}

fn print_report(report: &IngestReport) {
    println!("{}", "─".repeat(60));
    for doc in &report.documents {
        println!(
            "  {} {} ({} units, {} chunks)",
            "•".dimmed(),
            doc.source,
            doc.units,
            doc.chunks
        );

        for skip in &doc.skips {
            let stage = match skip.stage {
                SkipStage::Document => "document",
                SkipStage::Text => "text",
                SkipStage::Ocr => "ocr",
            };
            let page = skip
                .page
                .map(|p| format!(" p{}", p))
                .unwrap_or_default();
            println!(
                "    {} [{}{}] {}",
                "skip".yellow(),
                stage,
                page,
                skip.reason.dimmed()
            );
        }
    }
    println!("{}", "─".repeat(60));
    println!(
        "  {} documents, {} units, {} chunks, {} skipped steps",
        report.documents.len(),
        report.total_units(),
        report.total_chunks,
        report.total_skips()
    );
    println!();
}

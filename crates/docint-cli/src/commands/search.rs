//! Search command - show fused retrieval results without generation.

use super::{get_config, get_generation, preview};
use anyhow::{Context, Result};
use colored::Colorize;
use docint_core::citation_label;
use docint_ollama::OllamaClient;
use tokio::runtime::Runtime;

pub fn run(query: &str, limit: usize) -> Result<()> {
    let (paths, config) = get_config()?;
    let generation = get_generation(&paths)?;

    let client =
        OllamaClient::from_config(&config.ollama).context("Failed to create Ollama client")?;
    let rt = Runtime::new().context("Failed to create async runtime")?;

    let query_vector = rt
        .block_on(client.embed(&config.ollama.embedding_model, query))
        .context("Failed to embed query")?;

    let mut retrieval = config.retrieval.clone();
    retrieval.top_n = limit;

    let hits = generation
        .hybrid_search(&query_vector, query, &retrieval)
        .context("Retrieval failed")?;

    println!("{} {}", "Query:".cyan().bold(), query);
    println!("{}", "─".repeat(70));

    if hits.is_empty() {
        println!("{} The index is empty.", "Note:".yellow());
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        let Some(chunk) = generation.chunk(hit.chunk_id) else {
            continue;
        };
        println!(
            "  {}. {} {} {}",
            i + 1,
            citation_label(chunk.meta.page, chunk.meta.modality).white().bold(),
            format!("[{}]", chunk.meta.source).dimmed(),
            format!("rrf={:.4}", hit.score).dimmed()
        );
        println!("     {}", preview(&chunk.text, 120));
    }

    Ok(())
}

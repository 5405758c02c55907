//! Ask command - one-shot question answering from the terminal.

use super::{get_config, get_generation};
use anyhow::{Context, Result};
use colored::Colorize;
use docint_core::Chunk;
use docint_ollama::{OllamaClient, RagEngine};
use tokio::runtime::Runtime;

pub fn run(question: &str, model: Option<String>) -> Result<()> {
    let (paths, config) = get_config()?;
    let generation = get_generation(&paths)?;

    let client =
        OllamaClient::from_config(&config.ollama).context("Failed to create Ollama client")?;
    let rt = Runtime::new().context("Failed to create async runtime")?;

    if !rt.block_on(client.is_available()) {
        anyhow::bail!(
            "Ollama is not running at {}. Start it with 'ollama serve'.",
            config.ollama.host
        );
    }

    println!("{} {}", "Question:".cyan().bold(), question);
    println!("{}", "─".repeat(70));
    println!();

    let query_vector = rt
        .block_on(client.embed(&config.ollama.embedding_model, question))
        .context("Failed to embed question")?;

    let hits = generation
        .hybrid_search(&query_vector, question, &config.retrieval)
        .context("Retrieval failed")?;
    let chunks: Vec<&Chunk> = hits
        .iter()
        .filter_map(|hit| generation.chunk(hit.chunk_id))
        .collect();

    let model_name = model.as_deref().unwrap_or(&config.ollama.model);
    let engine = RagEngine::new(
        client.clone(),
        model_name,
        config.retrieval.max_context_chars,
    );

    let response = rt
        .block_on(engine.answer(question, &chunks))
        .context("Failed to generate answer")?;

    let failed = response.answer.is_failed();
    let answer_text = response.answer.into_answer_text();

    if failed {
        println!("{}", answer_text.red());
    } else {
        println!("{}", "Answer:".green().bold());
        println!();
        println!("{}", answer_text);
    }

    if !response.citations.is_empty() {
        println!();
        println!("{}", "─".repeat(70));
        println!("{} {}", "Citations:".cyan().bold(), response.citations);
    }

    Ok(())
}

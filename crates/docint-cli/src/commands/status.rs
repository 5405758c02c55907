//! Status command - configuration, index, and Ollama health.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use docint_config::Config;
use docint_index::IndexGeneration;
use docint_ollama::OllamaClient;
use tokio::runtime::Runtime;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    println!("{}", "docint Status".cyan().bold());
    println!("{}", "─".repeat(50));

    if !paths.is_initialized() {
        println!(
            "{} Not initialized. Run {} first.",
            "✗".red(),
            "docint init".cyan()
        );
        return Ok(());
    }

    println!("  {} Config: {}", "✓".green(), paths.config_file.display());
    println!("  {} Uploads: {}", "•".dimmed(), paths.uploads_dir.display());

    let config = Config::load_from(&paths.config_file).context("Failed to load configuration")?;

    // Index generation
    println!();
    println!("{}", "Index".white().bold());
    if paths.has_index() {
        match IndexGeneration::load(&paths.index_dir) {
            Ok(generation) => {
                let info = generation.info();
                println!("  {} Generation: {}", "✓".green(), &info.id[..8]);
                println!("    Chunks: {}", info.chunk_count);
                println!("    Embedding model: {}", info.embedding_model);
                println!("    Dimensions: {}", info.dim);
                println!("    Built: {}", info.created_at);
            }
            Err(e) => {
                println!("  {} Index exists but failed to load: {}", "✗".red(), e);
                println!("    Run {} to rebuild it.", "docint ingest".cyan());
            }
        }
    } else {
        println!(
            "  {} No index. Run {} to build one.",
            "○".yellow(),
            "docint ingest".cyan()
        );
    }

    // Ollama
    println!();
    println!("{}", "Ollama".white().bold());
    let client =
        OllamaClient::from_config(&config.ollama).context("Failed to create Ollama client")?;
    let rt = Runtime::new().context("Failed to create async runtime")?;

    if rt.block_on(client.is_available()) {
        println!("  {} Running at {}", "✓".green(), config.ollama.host);
        for model in [&config.ollama.model, &config.ollama.embedding_model] {
            let present = rt.block_on(client.has_model(model)).unwrap_or(false);
            if present {
                println!("  {} Model '{}' available", "✓".green(), model);
            } else {
                println!(
                    "  {} Model '{}' missing (run {})",
                    "✗".red(),
                    model,
                    format!("ollama pull {}", model).cyan()
                );
            }
        }
    } else {
        println!(
            "  {} Not running at {}. Start it with {}.",
            "✗".red(),
            config.ollama.host,
            "ollama serve".cyan()
        );
    }

    Ok(())
}

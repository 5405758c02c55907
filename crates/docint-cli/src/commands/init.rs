//! Initialize docint.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use docint_config::Config;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    if paths.is_initialized() {
        println!("{} docint is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Uploads: {}", paths.uploads_dir.display());
        return Ok(());
    }

    println!("{}", "Initializing docint...".cyan().bold());

    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
    println!(
        "  {} Created config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    println!();
    println!("{}", "docint initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Drop documents into: {}",
        paths.uploads_dir.display().to_string().cyan()
    );
    println!("  2. Build the index: {}", "docint ingest".cyan());
    println!("  3. Ask a question: {}", "docint ask \"...\"".cyan());

    Ok(())
}

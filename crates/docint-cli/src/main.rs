//! docint CLI - multi-modal document intelligence over local models.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// docint - ingest financial documents, index them, ask questions.
#[derive(Parser)]
#[command(name = "docint")]
#[command(version)]
#[command(about = "Multi-modal document Q&A over local models", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize docint (create config and data directories)
    Init,

    /// Ingest documents from the uploads directory and rebuild the index
    Ingest {
        /// Directory to ingest instead of the default uploads directory
        #[arg(short, long)]
        path: Option<std::path::PathBuf>,
    },

    /// Run a hybrid retrieval query and show the ranked chunks
    Search {
        /// Search query
        query: String,

        /// Maximum results
        #[arg(short, long, default_value = "6")]
        limit: usize,
    },

    /// Ask a question over the indexed documents
    Ask {
        /// Your question
        question: String,

        /// Model to use for generation (default: from config)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start the HTTP API server
    Serve {
        /// Port to listen on (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration, index, and Ollama status
    Status,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docint=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docint=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Ingest { path } => commands::ingest::run(path),
        Commands::Search { query, limit } => commands::search::run(&query, limit),
        Commands::Ask { question, model } => commands::ask::run(&question, model),
        Commands::Serve { port } => commands::serve::run(port),
        Commands::Status => commands::status::run(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

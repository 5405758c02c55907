//! Serve command - run the HTTP API.

use super::{get_config, get_generation};
use anyhow::{Context, Result};
use colored::Colorize;
use docint_index::GenerationHandle;
use tokio::runtime::Runtime;

pub fn run(port: Option<u16>) -> Result<()> {
    let (paths, mut config) = get_config()?;
    if let Some(port) = port {
        config.server.port = port;
    }

    // A broken or missing index must stop the server before it binds.
    let generation = get_generation(&paths)?;
    let handle = GenerationHandle::new(generation);

    println!(
        "{} http://{}:{}",
        "Serving on".cyan().bold(),
        config.server.host,
        config.server.port
    );

    let rt = Runtime::new().context("Failed to create async runtime")?;
    rt.block_on(docint_server::serve(config, handle))
        .context("Server exited with an error")?;

    Ok(())
}

//! HTTP API for question answering over the indexed corpus.
//!
//! Startup is strict: the server refuses to come up without a loadable,
//! internally consistent index generation. Once up, queries run against an
//! immutable in-memory generation snapshot.

mod error;
mod routes;
mod state;

pub use error::ServerError;
pub use routes::{AskRequest, AskResponse};
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use docint_config::Config;
use docint_index::{GenerationHandle, IndexGeneration, IndexResult};
use std::net::SocketAddr;
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Load the generation from `index_dir` and produce the shared handle.
/// Any inconsistency in the stored artifacts is fatal here, before the
/// listener binds.
pub fn load_generation(index_dir: &Path) -> IndexResult<GenerationHandle> {
    let generation = IndexGeneration::load(index_dir)?;
    Ok(GenerationHandle::new(generation))
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::health))
        .route("/health", get(routes::health))
        .route("/ask", post(routes::ask))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: Config, generation: GenerationHandle) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState::new(config, generation)?;
    let router = build_router(state);

    info!("Serving on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

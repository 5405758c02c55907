//! Request handlers.

use crate::error::ServerError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use docint_core::Chunk;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    pub citations: String,
}

/// GET / - liveness check. Static payload, does not touch the index.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "AI backend running" }))
}

/// POST /ask - answer a question from the indexed documents.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ServerError> {
    info!("Question: \"{}\"", request.question);

    let generation = state.generation().current();

    let query_vector = state
        .client()
        .embed(&state.config().ollama.embedding_model, &request.question)
        .await?;

    let hits = generation.hybrid_search(
        &query_vector,
        &request.question,
        &state.config().retrieval,
    )?;

    let chunks: Vec<&Chunk> = hits
        .iter()
        .filter_map(|hit| generation.chunk(hit.chunk_id))
        .collect();

    let response = state.engine().answer(&request.question, &chunks).await?;

    if response.answer.is_failed() {
        info!("Answer generation failed, returning error text in body");
    }

    Ok(Json(AskResponse {
        question: request.question,
        answer: response.answer.into_answer_text(),
        citations: response.citations,
    }))
}

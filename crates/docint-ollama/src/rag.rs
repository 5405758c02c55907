//! Grounded answer generation over retrieved chunks.
//!
//! Takes the fused retrieval results, assembles a context block in fused
//! order, and asks the chat model to answer strictly from that context.

use crate::client::OllamaClient;
use crate::error::OllamaResult;
use crate::types::{ChatMessage, ChatRequest};
use docint_core::{citations_line, Chunk};
use tracing::warn;

const SYSTEM_PROMPT: &str =
    "You are a financial document assistant. Answer ONLY using the provided context.";

/// Outcome of one answer attempt. Generation failures are part of the
/// normal response flow, not transport errors: the caller still gets
/// citations for the retrieved context.
#[derive(Debug, Clone)]
pub enum RagAnswer {
    Answered(String),
    Failed { message: String },
}

impl RagAnswer {
    /// Render for the response body. Failures keep the historical
    /// `LLM error: ...` wording clients already match on.
    pub fn into_answer_text(self) -> String {
        match self {
            RagAnswer::Answered(text) => text,
            RagAnswer::Failed { message } => format!("LLM error: {}", message),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RagAnswer::Failed { .. })
    }
}

/// Answer plus the citation line for the chunks that backed it.
#[derive(Debug, Clone)]
pub struct RagResponse {
    pub answer: RagAnswer,
    pub citations: String,
}

/// Drives retrieval-grounded question answering through an Ollama chat
/// model.
pub struct RagEngine {
    client: OllamaClient,
    model: String,
    max_context_chars: usize,
}

impl RagEngine {
    /// `max_context_chars` caps the assembled context block; 0 disables
    /// the cap.
    pub fn new(client: OllamaClient, model: impl Into<String>, max_context_chars: usize) -> Self {
        Self {
            client,
            model: model.into(),
            max_context_chars,
        }
    }

    /// Answer a question from the given chunks (fused retrieval order).
    ///
    /// Chat failures are folded into `RagAnswer::Failed`; the citations
    /// always reflect the context that was sent.
    pub async fn answer(&self, question: &str, chunks: &[&Chunk]) -> OllamaResult<RagResponse> {
        let included = assemble_context(chunks, self.max_context_chars);
        let context = context_block(&included);
        let citations = citations_line(included.iter().map(|c| &c.meta));

        let prompt = build_prompt(question, &context);
        let request = ChatRequest::new(
            &self.model,
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ],
        );

        let answer = match self.client.chat(request).await {
            Ok(response) => RagAnswer::Answered(response.message.content.trim().to_string()),
            Err(e) => {
                warn!("Chat generation failed: {}", e);
                RagAnswer::Failed {
                    message: e.to_string(),
                }
            }
        };

        Ok(RagResponse { answer, citations })
    }
}

/// Select the prefix of `chunks` whose texts fit within `max_chars`.
///
/// Chunks are included whole or not at all. The first chunk is always
/// included so the model never sees an empty context, and 0 means no cap.
pub fn assemble_context<'a>(chunks: &[&'a Chunk], max_chars: usize) -> Vec<&'a Chunk> {
    if max_chars == 0 {
        return chunks.to_vec();
    }

    let mut included = Vec::new();
    let mut used = 0usize;

    for (i, chunk) in chunks.iter().enumerate() {
        // Counted in characters, matching the splitter's window sizes.
        let cost = chunk.text.chars().count() + 2;
        if i > 0 && used + cost > max_chars {
            break;
        }
        used += cost;
        included.push(*chunk);
    }

    included
}

fn context_block(chunks: &[&Chunk]) -> String {
    let mut block = String::new();
    for chunk in chunks {
        block.push_str(&chunk.text);
        block.push_str("\n\n");
    }
    block
}

/// The user-message template the chat model answers against.
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "\nAnswer ONLY from this context.\nIf the answer is not in context, say you don't know.\n\nContext:\n{}\n\nQuestion: {}\n\nGive numbers exactly and do not guess.\n",
        context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use docint_core::Modality;

    fn chunk(text: &str, page: u32, modality: Modality) -> Chunk {
        Chunk::new(text, page, modality, "report.pdf")
    }

    #[test]
    fn test_build_prompt_contains_question_and_context() {
        let prompt = build_prompt("What was GDP growth?", "In 2022, Qatar's GDP growth was 3.5 %\n\n");

        assert!(prompt.contains("Answer ONLY from this context."));
        assert!(prompt.contains("Question: What was GDP growth?"));
        assert!(prompt.contains("GDP growth was 3.5 %"));
        assert!(prompt.contains("Give numbers exactly and do not guess."));
    }

    #[test]
    fn test_assemble_context_unbounded() {
        let a = chunk("alpha", 1, Modality::Text);
        let b = chunk("beta", 2, Modality::Text);
        let included = assemble_context(&[&a, &b], 0);
        assert_eq!(included.len(), 2);
    }

    #[test]
    fn test_assemble_context_drops_whole_chunks() {
        let a = chunk("aaaaaaaaaa", 1, Modality::Text);
        let b = chunk("bbbbbbbbbb", 2, Modality::Text);
        let c = chunk("cc", 3, Modality::Text);

        // Room for the first two (10 + 2 each) but not the third.
        let included = assemble_context(&[&a, &b, &c], 25);

        assert_eq!(included.len(), 2);
        assert_eq!(included[0].text, "aaaaaaaaaa");
        assert_eq!(included[1].text, "bbbbbbbbbb");
    }

    #[test]
    fn test_assemble_context_budget_counts_chars_not_bytes() {
        // Ten characters each, twenty bytes each in UTF-8.
        let a = chunk("éééééééééé", 1, Modality::Text);
        let b = chunk("êêêêêêêêêê", 2, Modality::Text);

        let included = assemble_context(&[&a, &b], 25);
        assert_eq!(included.len(), 2);
    }

    #[test]
    fn test_assemble_context_always_keeps_first_chunk() {
        let a = chunk("a chunk longer than the cap", 1, Modality::Text);
        let included = assemble_context(&[&a], 5);
        assert_eq!(included.len(), 1);
    }

    #[test]
    fn test_failed_answer_renders_legacy_error_string() {
        let answer = RagAnswer::Failed {
            message: "Request timed out after 120 seconds".to_string(),
        };
        assert_eq!(
            answer.into_answer_text(),
            "LLM error: Request timed out after 120 seconds"
        );
    }

    #[test]
    fn test_citation_order_is_lexicographic() {
        let chunks = vec![
            chunk("b", 12, Modality::Text),
            chunk("a", 4, Modality::Table),
            chunk("c", 4, Modality::Table),
        ];
        let refs: Vec<&Chunk> = chunks.iter().collect();
        let included = assemble_context(&refs, 0);
        let line = citations_line(included.iter().map(|c| &c.meta));
        assert_eq!(line, "Page 12 (text), Page 4 (table)");
    }
}

//! BM25 lexical scoring over the chunk corpus.
//!
//! Rebuilt from the chunk texts at generation load time; only the texts are
//! persisted.

use docint_core::ChunkId;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Saturation parameter.
const K1: f64 = 1.5;
/// Length-normalization parameter.
const B: f64 = 0.75;

/// Lowercase word-boundary tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let word = WORD.get_or_init(|| Regex::new(r"\w+").expect("word pattern"));

    word.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Okapi BM25 term statistics for a fixed corpus ordering.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    /// Per-document term frequencies, corpus order.
    term_freqs: Vec<HashMap<String, u32>>,
    /// Document frequency per term.
    doc_freqs: HashMap<String, u32>,
    doc_lens: Vec<usize>,
    avg_doc_len: f64,
}

impl Bm25Index {
    /// Fit statistics over the tokenized corpus, in corpus order.
    pub fn fit(texts: &[String]) -> Self {
        let mut term_freqs = Vec::with_capacity(texts.len());
        let mut doc_freqs: HashMap<String, u32> = HashMap::new();
        let mut doc_lens = Vec::with_capacity(texts.len());

        for text in texts {
            let tokens = tokenize(text);
            doc_lens.push(tokens.len());

            let mut freqs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *freqs.entry(token).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            term_freqs.push(freqs);
        }

        let avg_doc_len = if doc_lens.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f64 / doc_lens.len() as f64
        };

        Self {
            term_freqs,
            doc_freqs,
            doc_lens,
            avg_doc_len,
        }
    }

    pub fn len(&self) -> usize {
        self.term_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_freqs.is_empty()
    }

    /// BM25 score of every document for a tokenized query, corpus order.
    pub fn scores(&self, query: &[String]) -> Vec<f64> {
        let n = self.len() as f64;
        let mut scores = vec![0.0; self.len()];

        for term in query {
            let Some(&df) = self.doc_freqs.get(term) else {
                continue;
            };
            // Always-positive idf variant; replaces the epsilon floor some
            // implementations apply to the classic formula.
            let idf = (1.0 + (n - df as f64 + 0.5) / (df as f64 + 0.5)).ln();

            for (doc_id, freqs) in self.term_freqs.iter().enumerate() {
                let Some(&tf) = freqs.get(term) else {
                    continue;
                };
                let tf = tf as f64;
                let len_norm = 1.0 - B + B * self.doc_lens[doc_id] as f64 / self.avg_doc_len;
                scores[doc_id] += idf * (tf * (K1 + 1.0)) / (tf + K1 * len_norm);
            }
        }

        scores
    }

    /// Top-k documents by score, descending.
    ///
    /// No relevance floor: zero-score documents fill the list when fewer
    /// than k documents match, exactly like an argsort over all scores.
    pub fn top(&self, query: &[String], k: usize) -> Vec<(ChunkId, f64)> {
        let scores = self.scores(query);
        let mut ranked: Vec<(ChunkId, f64)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        ranked
    }
}

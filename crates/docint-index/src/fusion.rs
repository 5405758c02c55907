//! Reciprocal rank fusion.

use docint_core::{ChunkId, RetrievalHit};
use std::collections::HashMap;

/// Fuse ranked id lists: each chunk scores `sum over lists of 1/(k + rank)`
/// with zero-based ranks; a chunk present in one list scores from that list
/// alone.
///
/// Ties keep first-seen order: ids are discovered by walking the lists in
/// the order given, and the final sort is stable on that discovery order.
pub fn reciprocal_rank_fusion(lists: &[&[ChunkId]], k: u32) -> Vec<RetrievalHit> {
    let mut scores: HashMap<ChunkId, f64> = HashMap::new();
    let mut discovery: Vec<ChunkId> = Vec::new();

    for list in lists {
        for (rank, &chunk_id) in list.iter().enumerate() {
            let entry = scores.entry(chunk_id).or_insert_with(|| {
                discovery.push(chunk_id);
                0.0
            });
            *entry += 1.0 / (k as f64 + rank as f64);
        }
    }

    let mut fused: Vec<RetrievalHit> = discovery
        .into_iter()
        .map(|chunk_id| RetrievalHit {
            chunk_id,
            score: scores[&chunk_id],
        })
        .collect();

    fused.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_sums_across_lists() {
        let dense = [10, 20, 30];
        let lexical = [20, 40];

        let fused = reciprocal_rank_fusion(&[&dense, &lexical], 60);

        let score_of = |id: ChunkId| fused.iter().find(|h| h.chunk_id == id).unwrap().score;

        // Present in both lists: dense rank 1, lexical rank 0.
        let expected = 1.0 / 61.0 + 1.0 / 60.0;
        assert!((score_of(20) - expected).abs() < 1e-12);

        // Present in one list only.
        assert!((score_of(10) - 1.0 / 60.0).abs() < 1e-12);
        assert!((score_of(30) - 1.0 / 62.0).abs() < 1e-12);
        assert!((score_of(40) - 1.0 / 61.0).abs() < 1e-12);
    }

    #[test]
    fn test_double_membership_beats_single() {
        let dense = [1, 2, 3];
        let lexical = [3, 4, 5];

        let fused = reciprocal_rank_fusion(&[&dense, &lexical], 60);

        // 3 appears in both lists and outranks every single-list chunk.
        assert_eq!(fused[0].chunk_id, 3);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        // 1 and 2 both score exactly 1/60: rank 0 in one list each.
        let dense = [1];
        let lexical = [2];

        let fused = reciprocal_rank_fusion(&[&dense, &lexical], 60);

        assert_eq!(fused[0].chunk_id, 1);
        assert_eq!(fused[1].chunk_id, 2);
        assert_eq!(fused[0].score, fused[1].score);
    }

    #[test]
    fn test_empty_lists() {
        assert!(reciprocal_rank_fusion(&[&[], &[]], 60).is_empty());
    }
}

//! Top-k neighbor selection.

use crate::similarity::SimilarityScore;

/// Keep the `k` most similar users.
///
/// Sorted by correlation descending; equal correlations are ordered by
/// ascending user id so repeated queries give the same neighborhood. With
/// fewer than `k` scores every score is returned.
pub fn select_top_k(mut scores: Vec<SimilarityScore>, k: usize) -> Vec<SimilarityScore> {
    scores.sort_by(|a, b| {
        b.correlation
            .total_cmp(&a.correlation)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    scores.truncate(k);
    scores
}

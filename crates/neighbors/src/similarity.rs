//! Pearson similarity between the active user and everyone else.
//!
//! ## Algorithm
//! 1. Take the active user's column of the item-user table
//! 2. For every other user, keep the items both of them rated
//! 3. Fewer than [`MIN_CO_RATED`] such items, or constant ratings on either
//!    side over those items: the user is skipped
//! 4. Otherwise compute the Pearson correlation over those items
//!
//! Two modes share this contract and differ only in which means are
//! subtracted: the means of the co-rated ratings (raw) or each user's mean
//! over their whole rating history (mean-centered).

use crate::table::{ItemUserTable, UNRATED};
use data_loader::{RatingValue, UserId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// Users sharing fewer co-rated items with the active user get no score.
pub const MIN_CO_RATED: usize = 4;

/// How correlations and predictions are computed.
///
/// Chosen once per recommender and used for both similarity and prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityMode {
    /// Means over the co-rated items; plain weighted-average prediction
    #[default]
    RawPearson,
    /// Means over each user's full history; mean-offset prediction
    MeanCentered,
}

impl fmt::Display for SimilarityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityMode::RawPearson => write!(f, "raw-pearson"),
            SimilarityMode::MeanCentered => write!(f, "mean-centered"),
        }
    }
}

/// A defined correlation between the active user and another user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub user_id: UserId,
    /// Always within [-1, 1]
    pub correlation: f64,
}

/// Scores every user in a table against the active user
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityEngine {
    mode: SimilarityMode,
}

impl SimilarityEngine {
    pub fn new(mode: SimilarityMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> SimilarityMode {
        self.mode
    }

    /// Scores for every other user with a defined correlation.
    ///
    /// Users are scored in parallel; the result is in ascending user id
    /// order. Undefined correlations are dropped.
    #[instrument(skip(self, table), fields(mode = %self.mode))]
    pub fn score_all(&self, table: &ItemUserTable, active_id: UserId) -> Vec<SimilarityScore> {
        let Some(active) = table.column(active_id) else {
            return Vec::new();
        };
        let active_mean = table.user_mean(active_id);

        let scores: Vec<SimilarityScore> = table
            .users()
            .par_iter()
            .filter(|&&user_id| user_id != active_id)
            .filter_map(|&user_id| {
                self.correlation_with(table, active, active_mean, user_id)
                    .map(|correlation| SimilarityScore {
                        user_id,
                        correlation,
                    })
            })
            .collect();

        debug!(
            "Scored {} users, {} skipped for insufficient overlap or zero variance",
            scores.len(),
            table.n_users().saturating_sub(1 + scores.len())
        );
        scores
    }

    /// Correlation between two users of the table, `None` when undefined
    pub fn correlation(
        &self,
        table: &ItemUserTable,
        active_id: UserId,
        other_id: UserId,
    ) -> Option<f64> {
        let active = table.column(active_id)?;
        self.correlation_with(table, active, table.user_mean(active_id), other_id)
    }

    fn correlation_with(
        &self,
        table: &ItemUserTable,
        active: &[RatingValue],
        active_mean: Option<f64>,
        other_id: UserId,
    ) -> Option<f64> {
        let other = table.column(other_id)?;
        let co_rated: Vec<(f64, f64)> = active
            .iter()
            .zip(other)
            .filter(|&(&a, &b)| a != UNRATED && b != UNRATED)
            .map(|(&a, &b)| (a as f64, b as f64))
            .collect();

        if co_rated.len() < MIN_CO_RATED {
            return None;
        }
        // Constant ratings over the co-rated items carry no signal in either mode
        if !has_spread(co_rated.iter().map(|p| p.0)) || !has_spread(co_rated.iter().map(|p| p.1)) {
            return None;
        }

        let means = match self.mode {
            SimilarityMode::RawPearson => None,
            SimilarityMode::MeanCentered => Some((active_mean?, table.user_mean(other_id)?)),
        };
        pearson(&co_rated, means)
    }
}

fn has_spread(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.any(|v| v != first),
        None => false,
    }
}

/// Pearson correlation of paired samples.
///
/// With `means` set, those are subtracted instead of the sample means.
/// Returns `None` for empty input or when either side has zero variance.
pub fn pearson(pairs: &[(f64, f64)], means: Option<(f64, f64)>) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }

    let (mean_a, mean_b) = means.unwrap_or_else(|| {
        let n = pairs.len() as f64;
        let (sum_a, sum_b) = pairs
            .iter()
            .fold((0.0, 0.0), |(sa, sb), &(a, b)| (sa + a, sb + b));
        (sum_a / n, sum_b / n)
    });

    let (mut covariance, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for &(a, b) in pairs {
        let da = a - mean_a;
        let db = b - mean_b;
        covariance += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }

    Some((covariance / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::RatingEntry;

    const ACTIVE: UserId = 99;

    fn table(entries: &[(UserId, u32, u8)]) -> ItemUserTable {
        let entries: Vec<RatingEntry> = entries
            .iter()
            .map(|&(u, i, r)| RatingEntry::new(u, i, r))
            .collect();
        ItemUserTable::from_entries(&entries).unwrap()
    }

    #[test]
    fn test_pearson_basic() {
        let perfect = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
        assert!((pearson(&perfect, None).unwrap() - 1.0).abs() < 1e-12);

        let inverse = [(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)];
        assert!((pearson(&inverse, None).unwrap() + 1.0).abs() < 1e-12);

        assert_eq!(pearson(&[], None), None);
        assert_eq!(pearson(&[(1.0, 3.0), (2.0, 3.0)], None), None);
    }

    #[test]
    fn test_identical_ratings_correlate_perfectly() {
        let t = table(&[
            (1, 1, 5), (1, 2, 3), (1, 3, 4), (1, 4, 1),
            (ACTIVE, 1, 5), (ACTIVE, 2, 3), (ACTIVE, 3, 4), (ACTIVE, 4, 1),
        ]);
        for mode in [SimilarityMode::RawPearson, SimilarityMode::MeanCentered] {
            let corr = SimilarityEngine::new(mode).correlation(&t, ACTIVE, 1).unwrap();
            assert!((corr - 1.0).abs() < 1e-9, "{mode}: {corr}");
        }
    }

    #[test]
    fn test_three_co_rated_items_are_not_enough() {
        let t = table(&[
            (1, 1, 5), (1, 2, 3), (1, 3, 4), (1, 9, 2),
            (ACTIVE, 1, 5), (ACTIVE, 2, 3), (ACTIVE, 3, 4), (ACTIVE, 8, 2),
        ]);
        let engine = SimilarityEngine::default();
        assert_eq!(engine.correlation(&t, ACTIVE, 1), None);
        assert!(engine.score_all(&t, ACTIVE).is_empty());
    }

    #[test]
    fn test_four_co_rated_items_are_enough() {
        let t = table(&[
            (1, 1, 5), (1, 2, 3), (1, 3, 4), (1, 4, 1),
            (ACTIVE, 1, 4), (ACTIVE, 2, 2), (ACTIVE, 3, 5), (ACTIVE, 4, 1),
        ]);
        let scores = SimilarityEngine::default().score_all(&t, ACTIVE);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].user_id, 1);
    }

    #[test]
    fn test_zero_variance_is_undefined() {
        let t = table(&[
            (1, 1, 3), (1, 2, 3), (1, 3, 3), (1, 4, 3),
            (ACTIVE, 1, 4), (ACTIVE, 2, 2), (ACTIVE, 3, 5), (ACTIVE, 4, 1),
        ]);
        for mode in [SimilarityMode::RawPearson, SimilarityMode::MeanCentered] {
            assert_eq!(SimilarityEngine::new(mode).correlation(&t, ACTIVE, 1), None);
        }
    }

    #[test]
    fn test_constant_co_rated_ratings_with_varied_history() {
        // User 1's full-history mean (3.4) differs from their co-rated ratings
        let t = table(&[
            (1, 1, 3), (1, 2, 3), (1, 3, 3), (1, 4, 3), (1, 6, 5),
            (2, 1, 4), (2, 2, 4), (2, 3, 4), (2, 4, 4), (2, 7, 1),
            (ACTIVE, 1, 5), (ACTIVE, 2, 3), (ACTIVE, 3, 4), (ACTIVE, 4, 2),
        ]);
        for mode in [SimilarityMode::RawPearson, SimilarityMode::MeanCentered] {
            let engine = SimilarityEngine::new(mode);
            assert_eq!(engine.correlation(&t, ACTIVE, 1), None, "{mode}");
            assert!(engine.score_all(&t, ACTIVE).is_empty(), "{mode}");
        }
    }

    #[test]
    fn test_constant_active_ratings_are_undefined() {
        let t = table(&[
            (1, 1, 5), (1, 2, 3), (1, 3, 4), (1, 4, 2),
            (ACTIVE, 1, 4), (ACTIVE, 2, 4), (ACTIVE, 3, 4), (ACTIVE, 4, 4), (ACTIVE, 5, 1),
        ]);
        let engine = SimilarityEngine::new(SimilarityMode::MeanCentered);
        assert_eq!(engine.correlation(&t, ACTIVE, 1), None);
    }

    #[test]
    fn test_mean_centered_uses_full_history() {
        // User 1 agrees with the active user on the shape of items 1-4 but
        // also rated item 5 low, pulling their full-history mean down.
        let t = table(&[
            (1, 1, 5), (1, 2, 3), (1, 3, 4), (1, 4, 2), (1, 5, 1),
            (ACTIVE, 1, 5), (ACTIVE, 2, 3), (ACTIVE, 3, 4), (ACTIVE, 4, 2),
        ]);
        let raw = SimilarityEngine::new(SimilarityMode::RawPearson)
            .correlation(&t, ACTIVE, 1)
            .unwrap();
        let centered = SimilarityEngine::new(SimilarityMode::MeanCentered)
            .correlation(&t, ACTIVE, 1)
            .unwrap();

        assert!((raw - 1.0).abs() < 1e-9);
        assert!(centered < raw);
        assert!(centered > 0.0);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let t = table(&[
            (1, 1, 1), (1, 2, 5), (1, 3, 2), (1, 4, 4), (1, 5, 3),
            (2, 1, 5), (2, 2, 1), (2, 3, 4), (2, 4, 2), (2, 5, 3),
            (3, 1, 2), (3, 2, 2), (3, 3, 5), (3, 4, 5), (3, 5, 1),
            (ACTIVE, 1, 2), (ACTIVE, 2, 4), (ACTIVE, 3, 1), (ACTIVE, 4, 5), (ACTIVE, 5, 3),
        ]);
        for mode in [SimilarityMode::RawPearson, SimilarityMode::MeanCentered] {
            let scores = SimilarityEngine::new(mode).score_all(&t, ACTIVE);
            assert_eq!(scores.len(), 3);
            for score in scores {
                assert!((-1.0..=1.0).contains(&score.correlation));
                assert_ne!(score.user_id, ACTIVE);
            }
        }
    }

    #[test]
    fn test_unknown_active_user() {
        let t = table(&[(1, 1, 5)]);
        assert!(SimilarityEngine::default().score_all(&t, ACTIVE).is_empty());
    }
}

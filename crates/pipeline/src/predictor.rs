//! Rating prediction from a neighborhood.
//!
//! For every item some neighbor rated and the active user did not, the
//! neighbors' ratings are combined with their correlations as weights.
//! The formula follows the neighborhood's similarity mode:
//! - raw Pearson: `Σ w·r / Σ|w|`
//! - mean-centered: `active_mean + Σ w·(r - mean) / Σ|w|`

use data_loader::ItemId;
use neighbors::{ActiveUserRatings, ItemUserTable, Neighborhood, SimilarityMode, SimilarityScore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Expected rating of the active user for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictedRating {
    pub item_id: ItemId,
    pub expected_rating: f64,
}

impl PredictedRating {
    pub fn new(item_id: ItemId, expected_rating: f64) -> Self {
        Self {
            item_id,
            expected_rating,
        }
    }
}

/// Computes predictions for candidate items in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingPredictor {
    mode: SimilarityMode,
}

impl RatingPredictor {
    pub fn new(mode: SimilarityMode) -> Self {
        Self { mode }
    }

    /// A predictor paired with the mode the neighborhood was built with
    pub fn for_neighborhood(neighborhood: &Neighborhood) -> Self {
        Self::new(neighborhood.mode())
    }

    /// Predict every item rated by a neighbor and unrated by the active user.
    ///
    /// Items whose weight denominator is zero are left out. The result is in
    /// ascending item id order.
    #[instrument(skip_all, fields(active_user = active.user_id(), neighbors = neighborhood.len()))]
    pub fn predict(
        &self,
        neighborhood: &Neighborhood,
        active: &ActiveUserRatings,
    ) -> Vec<PredictedRating> {
        let table = neighborhood.table();
        let rated = active.rated_items();

        let candidates: Vec<ItemId> = neighborhood
            .members()
            .iter()
            .flat_map(|neighbor| table.rated_items(neighbor.user_id))
            .filter(|item_id| !rated.contains(item_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let active_mean = active.mean();
        let predictions: Vec<PredictedRating> = candidates
            .par_iter()
            .filter_map(|&item_id| {
                self.predict_item(table, neighborhood.members(), active_mean, item_id)
            })
            .collect();

        debug!(
            "Predicted {} of {} candidate items",
            predictions.len(),
            candidates.len()
        );
        predictions
    }

    /// Prediction for one item, `None` when no neighbor carries weight for it
    pub fn predict_item(
        &self,
        table: &ItemUserTable,
        neighbors: &[SimilarityScore],
        active_mean: f64,
        item_id: ItemId,
    ) -> Option<PredictedRating> {
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for neighbor in neighbors {
            let Some(rating) = table.rating(item_id, neighbor.user_id) else {
                continue;
            };
            let contribution = match self.mode {
                SimilarityMode::RawPearson => rating as f64,
                SimilarityMode::MeanCentered => rating as f64 - table.user_mean(neighbor.user_id)?,
            };
            numerator += neighbor.correlation * contribution;
            denominator += neighbor.correlation.abs();
        }

        if denominator == 0.0 {
            return None;
        }

        let expected_rating = match self.mode {
            SimilarityMode::RawPearson => numerator / denominator,
            SimilarityMode::MeanCentered => active_mean + numerator / denominator,
        };
        Some(PredictedRating::new(item_id, expected_rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{RatingEntry, RatingPopulation, UserId};
    use neighbors::build_neighborhood;

    const ACTIVE: UserId = 99;

    /// Users 1 and 2 agree with the active user on items 1-4 and rate
    /// items 5-7 differently. User 3 never overlaps enough to be a neighbor.
    fn population() -> RatingPopulation {
        let mut population = RatingPopulation::new();
        let rows: [(UserId, &[(ItemId, u8)]); 3] = [
            (1, &[(1, 5), (2, 3), (3, 4), (4, 1), (5, 5), (6, 2)]),
            (2, &[(1, 4), (2, 2), (3, 5), (4, 1), (5, 3)]),
            (3, &[(1, 5), (7, 5)]),
        ];
        for (user_id, ratings) in rows {
            for &(item_id, rating) in ratings {
                population.insert_rating(RatingEntry::new(user_id, item_id, rating));
            }
        }
        population
    }

    fn active() -> ActiveUserRatings {
        ActiveUserRatings::new(ACTIVE, [(1, 5), (2, 3), (3, 4), (4, 1)]).unwrap()
    }

    #[test]
    fn test_predicts_only_unrated_neighbor_items() {
        let active = active();
        let neighborhood =
            build_neighborhood(&population(), &active, 5, SimilarityMode::RawPearson).unwrap();
        assert_eq!(neighborhood.len(), 2);

        let predictions = RatingPredictor::for_neighborhood(&neighborhood).predict(&neighborhood, &active);
        let ids: Vec<ItemId> = predictions.iter().map(|p| p.item_id).collect();

        // Item 7 is only rated by user 3, who is not a neighbor
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn test_plain_weighted_average() {
        let active = active();
        let neighborhood =
            build_neighborhood(&population(), &active, 5, SimilarityMode::RawPearson).unwrap();
        let w1 = neighborhood.weight(1).unwrap();
        let w2 = neighborhood.weight(2).unwrap();

        let predictions = RatingPredictor::new(SimilarityMode::RawPearson).predict(&neighborhood, &active);

        let item5 = predictions.iter().find(|p| p.item_id == 5).unwrap();
        let expected = (w1 * 5.0 + w2 * 3.0) / (w1.abs() + w2.abs());
        assert!((item5.expected_rating - expected).abs() < 1e-9);

        // Only user 1 rated item 6
        let item6 = predictions.iter().find(|p| p.item_id == 6).unwrap();
        assert!((item6.expected_rating - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_centered_weighted_average() {
        let active = active();
        let neighborhood =
            build_neighborhood(&population(), &active, 5, SimilarityMode::MeanCentered).unwrap();
        let table = neighborhood.table();
        let w1 = neighborhood.weight(1).unwrap();

        let predictions = RatingPredictor::for_neighborhood(&neighborhood).predict(&neighborhood, &active);

        let item6 = predictions.iter().find(|p| p.item_id == 6).unwrap();
        let mean1 = table.user_mean(1).unwrap();
        let expected = active.mean() + w1 * (2.0 - mean1) / w1.abs();
        assert!((item6.expected_rating - expected).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_is_undefined() {
        let entries = [
            RatingEntry::new(1, 1, 4),
            RatingEntry::new(ACTIVE, 2, 3),
        ];
        let table = ItemUserTable::from_entries(&entries).unwrap();
        let neighbors = [SimilarityScore {
            user_id: 1,
            correlation: 0.0,
        }];

        let predictor = RatingPredictor::new(SimilarityMode::RawPearson);
        assert_eq!(predictor.predict_item(&table, &neighbors, 3.0, 1), None);
        // Nobody in the neighborhood rated item 2 besides the active user
        assert_eq!(predictor.predict_item(&table, &neighbors, 3.0, 2), None);
    }

    #[test]
    fn test_negative_weights_use_absolute_denominator() {
        let entries = [
            RatingEntry::new(1, 1, 4),
            RatingEntry::new(2, 1, 2),
        ];
        let table = ItemUserTable::from_entries(&entries).unwrap();
        let neighbors = [
            SimilarityScore { user_id: 1, correlation: 0.5 },
            SimilarityScore { user_id: 2, correlation: -0.5 },
        ];

        let prediction = RatingPredictor::new(SimilarityMode::RawPearson)
            .predict_item(&table, &neighbors, 3.0, 1)
            .unwrap();
        assert!((prediction.expected_rating - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_neighborhood_predicts_nothing() {
        let active = ActiveUserRatings::new(ACTIVE, [(1, 5)]).unwrap();
        let neighborhood =
            build_neighborhood(&population(), &active, 5, SimilarityMode::RawPearson).unwrap();
        assert!(neighborhood.is_empty());
        assert!(RatingPredictor::for_neighborhood(&neighborhood)
            .predict(&neighborhood, &active)
            .is_empty());
    }
}

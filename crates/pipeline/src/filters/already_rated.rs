//! Filter to remove items the active user has already rated.
//!
//! The predictor never produces these, but the filter keeps the guarantee
//! for predictions that come from anywhere else.

use crate::predictor::PredictedRating;
use crate::traits::Filter;
use anyhow::Result;
use neighbors::ActiveUserRatings;

/// Removes predictions for items the active user rated.
///
/// ## Algorithm
/// Builds a HashSet of rated item ids once for O(1) lookups.
pub struct AlreadyRatedFilter;

impl Filter for AlreadyRatedFilter {
    fn name(&self) -> &str {
        "AlreadyRatedFilter"
    }

    fn apply(
        &self,
        predictions: Vec<PredictedRating>,
        active: &ActiveUserRatings,
    ) -> Result<Vec<PredictedRating>> {
        let rated = active.rated_items();
        let filtered: Vec<PredictedRating> = predictions
            .into_iter()
            .filter(|prediction| !rated.contains(&prediction.item_id))
            .collect();
        Ok(filtered)
    }
}

//! Filter to enforce the minimum predicted rating.

use crate::predictor::PredictedRating;
use crate::traits::Filter;
use anyhow::Result;
use neighbors::ActiveUserRatings;

/// Keeps predictions with `expected_rating >= min_rating`.
pub struct MinimumRatingFilter {
    min_rating: f64,
}

impl MinimumRatingFilter {
    /// Create a new MinimumRatingFilter.
    ///
    /// # Arguments
    /// * `min_rating` - Lowest expected rating worth recommending (inclusive)
    pub fn new(min_rating: f64) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(
        &self,
        predictions: Vec<PredictedRating>,
        _active: &ActiveUserRatings,
    ) -> Result<Vec<PredictedRating>> {
        let filtered: Vec<PredictedRating> = predictions
            .into_iter()
            .filter(|prediction| prediction.expected_rating >= self.min_rating)
            .collect();

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_rating_filter() {
        let active = ActiveUserRatings::new(944, [(1, 3)]).unwrap();
        let predictions = vec![
            PredictedRating::new(2, 4.5),
            PredictedRating::new(3, 3.5),
            PredictedRating::new(4, 3.49),
            PredictedRating::new(5, -0.2),
        ];

        let filtered = MinimumRatingFilter::new(3.5)
            .apply(predictions, &active)
            .unwrap();

        let ids: Vec<u32> = filtered.iter().map(|p| p.item_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}

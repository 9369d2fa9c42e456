//! Ranking and truncation, the last step of the pipeline.

use crate::predictor::PredictedRating;
use crate::traits::Filter;
use anyhow::Result;
use neighbors::ActiveUserRatings;

/// Sorts by expected rating (highest first) and keeps at most `max_items`.
///
/// Equal ratings are ordered by ascending item id. `None` keeps everything.
pub struct TopNFilter {
    max_items: Option<usize>,
}

impl TopNFilter {
    pub fn new(max_items: Option<usize>) -> Self {
        Self { max_items }
    }
}

impl Filter for TopNFilter {
    fn name(&self) -> &str {
        "TopNFilter"
    }

    fn apply(
        &self,
        mut predictions: Vec<PredictedRating>,
        _active: &ActiveUserRatings,
    ) -> Result<Vec<PredictedRating>> {
        predictions.sort_by(|a, b| {
            b.expected_rating
                .total_cmp(&a.expected_rating)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        if let Some(max_items) = self.max_items {
            predictions.truncate(max_items);
        }
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions() -> Vec<PredictedRating> {
        vec![
            PredictedRating::new(9, 3.0),
            PredictedRating::new(4, 4.5),
            PredictedRating::new(2, 3.0),
            PredictedRating::new(7, 5.0),
        ]
    }

    #[test]
    fn test_sorted_and_truncated() {
        let active = ActiveUserRatings::new(944, [(1, 3)]).unwrap();
        let ranked = TopNFilter::new(Some(3)).apply(predictions(), &active).unwrap();

        let ids: Vec<u32> = ranked.iter().map(|p| p.item_id).collect();
        assert_eq!(ids, vec![7, 4, 2]);
    }

    #[test]
    fn test_unbounded_and_zero() {
        let active = ActiveUserRatings::new(944, [(1, 3)]).unwrap();

        let ranked = TopNFilter::new(None).apply(predictions(), &active).unwrap();
        assert_eq!(ranked.len(), 4);
        assert!(ranked.windows(2).all(|w| w[0].expected_rating >= w[1].expected_rating));

        let ranked = TopNFilter::new(Some(0)).apply(predictions(), &active).unwrap();
        assert!(ranked.is_empty());
    }
}

//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::filters::{AlreadyRatedFilter, MinimumRatingFilter, TopNFilter};
use crate::predictor::PredictedRating;
use crate::traits::Filter;
use anyhow::Result;
use neighbors::ActiveUserRatings;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyRatedFilter)
///     .add_filter(MinimumRatingFilter::new(3.5))
///     .add_filter(TopNFilter::new(Some(20)));
///
/// let recommendations = pipeline.apply(predictions, &active)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The standard recommendation filter: drop already-rated items, apply
    /// the threshold, then rank and truncate.
    pub fn recommendation(min_rating: f64, max_items: Option<usize>) -> Self {
        Self::new()
            .add_filter(AlreadyRatedFilter)
            .add_filter(MinimumRatingFilter::new(min_rating))
            .add_filter(TopNFilter::new(max_items))
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Apply all filters in sequence to the predictions.
    pub fn apply(
        &self,
        predictions: Vec<PredictedRating>,
        active: &ActiveUserRatings,
    ) -> Result<Vec<PredictedRating>> {
        let mut current = predictions;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, active)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active() -> ActiveUserRatings {
        ActiveUserRatings::new(944, [(1, 5), (2, 3)]).unwrap()
    }

    fn predictions() -> Vec<PredictedRating> {
        vec![
            PredictedRating::new(1, 4.9),
            PredictedRating::new(3, 2.5),
            PredictedRating::new(4, 4.1),
            PredictedRating::new(5, 3.7),
            PredictedRating::new(6, 4.1),
        ]
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let filtered = pipeline.apply(predictions(), &active()).unwrap();
        assert_eq!(filtered, predictions());
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new().add_filter(AlreadyRatedFilter);
        let filtered = pipeline.apply(predictions(), &active()).unwrap();

        assert_eq!(filtered.len(), 4);
        assert!(filtered.iter().all(|p| p.item_id != 1));
    }

    #[test]
    fn test_recommendation_pipeline() {
        let pipeline = FilterPipeline::recommendation(3.5, Some(2));
        let filtered = pipeline.apply(predictions(), &active()).unwrap();

        assert_eq!(
            filtered,
            vec![PredictedRating::new(4, 4.1), PredictedRating::new(6, 4.1)]
        );
    }

    #[test]
    fn test_recommendation_pipeline_unbounded() {
        let pipeline = FilterPipeline::recommendation(3.5, None);
        let filtered = pipeline.apply(predictions(), &active()).unwrap();

        let ids: Vec<u32> = filtered.iter().map(|p| p.item_id).collect();
        assert_eq!(ids, vec![4, 6, 5]);
    }
}

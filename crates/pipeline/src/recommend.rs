//! Predictions → recommendation list.

use crate::filter_pipeline::FilterPipeline;
use crate::predictor::{PredictedRating, RatingPredictor};
use anyhow::Result;
use neighbors::{ActiveUserRatings, Neighborhood, RecommendError};
use tracing::instrument;

/// Predicted ratings, highest first.
pub type RecommendationList = Vec<PredictedRating>;

/// Recommend items for the active user from a built neighborhood.
///
/// Predicts every eligible item with the neighborhood's mode, keeps those
/// with `expected_rating >= min_rating`, sorts them highest first and returns
/// at most `max_items` (all of them when `None`). An empty neighborhood gives
/// an empty list.
///
/// `active` must be the ratings the neighborhood was built from. Fails with
/// [`RecommendError::InvalidInput`] for another user's ratings or for a
/// changed set of ratings under the same id.
#[instrument(skip(neighborhood, active), fields(active_user = active.user_id()))]
pub fn recommend(
    neighborhood: &Neighborhood,
    active: &ActiveUserRatings,
    min_rating: f64,
    max_items: Option<usize>,
) -> Result<RecommendationList> {
    if neighborhood.active_user_id() != active.user_id() {
        return Err(RecommendError::invalid_input(format!(
            "neighborhood was built for user {} but ratings belong to user {}",
            neighborhood.active_user_id(),
            active.user_id()
        ))
        .into());
    }
    if !neighborhood.was_built_from(active) {
        return Err(RecommendError::invalid_input(format!(
            "ratings of user {} differ from those the neighborhood was built from",
            active.user_id()
        ))
        .into());
    }

    let predictions = RatingPredictor::for_neighborhood(neighborhood).predict(neighborhood, active);
    FilterPipeline::recommendation(min_rating, max_items).apply(predictions, active)
}

//! Core traits for the recommendation filter pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to predicted ratings.

use crate::predictor::PredictedRating;
use anyhow::Result;
use neighbors::ActiveUserRatings;

/// Core trait for filtering predictions.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across concurrent queries
/// - Filters take ownership of the Vec and return the filtered Vec
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of predictions.
    ///
    /// # Arguments
    /// * `predictions` - The predictions to filter (takes ownership)
    /// * `active` - The active user's ratings
    fn apply(
        &self,
        predictions: Vec<PredictedRating>,
        active: &ActiveUserRatings,
    ) -> Result<Vec<PredictedRating>>;
}

//! Rating prediction and recommendation filtering.
//!
//! This crate provides:
//! - RatingPredictor for weighted neighbor-rating predictions
//! - Filter trait and implementations for prediction filtering
//! - FilterPipeline for composing filters
//! - `recommend`, the full neighborhood → recommendation list step
//!
//! ## Architecture
//! The pipeline processes a neighborhood in stages:
//! 1. RatingPredictor predicts every item a neighbor rated and the active user did not
//! 2. Filters drop already-rated items and predictions under the threshold
//! 3. The last filter ranks what is left and truncates it
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::recommend;
//!
//! let neighborhood = neighbors::build_neighborhood(&population, &active, 10, mode)?;
//! let recommendations = recommend(&neighborhood, &active, 3.5, Some(20))?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod predictor;
pub mod recommend;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use predictor::{PredictedRating, RatingPredictor};
pub use recommend::{RecommendationList, recommend};
pub use traits::Filter;

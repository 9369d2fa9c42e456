//! Filter implementations for the recommendation pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_rated;
pub mod minimum_rating;
pub mod top_n;

// Re-export for convenience
pub use already_rated::AlreadyRatedFilter;
pub use minimum_rating::MinimumRatingFilter;
pub use top_n::TopNFilter;

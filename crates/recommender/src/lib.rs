//! Recommender crate: the service layer of the collaborative filter.
//!
//! Wraps the core (`neighbors` + `pipeline`) behind a configured
//! `Recommender`, and defines how the active user's ratings are acquired.

pub mod acquisition;
pub mod config;
pub mod orchestrator;

pub use acquisition::{RatingSupplier, collect_active_ratings};
pub use config::RecommenderConfig;
pub use orchestrator::{Recommendation, Recommender};

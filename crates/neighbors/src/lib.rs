//! # Neighbors Crate
//!
//! The neighborhood half of the collaborative filter: given the rating
//! population and the active user's ratings, find the users whose taste is
//! closest to the active user's.
//!
//! ## Components
//!
//! - **active**: `ActiveUserRatings`, the validated per-query input
//! - **table**: `ItemUserTable`, the dense item × user matrix with sentinel 0
//! - **similarity**: Pearson correlation over co-rated items (raw or mean-centered)
//! - **selector**: top-k selection with a fixed tie-break
//! - **neighborhood**: `build_neighborhood`, tying the above together
//!
//! ## Example Usage
//!
//! ```ignore
//! use neighbors::{build_neighborhood, ActiveUserRatings, SimilarityMode};
//!
//! let active = ActiveUserRatings::new(944, [(1, 5), (50, 4), (181, 5), (258, 2)])?;
//! let neighborhood = build_neighborhood(&population, &active, 10, SimilarityMode::RawPearson)?;
//!
//! for neighbor in neighborhood.members() {
//!     println!("user {} correlation {:.3}", neighbor.user_id, neighbor.correlation);
//! }
//! ```
//!
//! Per-user correlations are computed in parallel with Rayon; the population
//! is only read.

pub mod active;
pub mod error;
pub mod neighborhood;
pub mod selector;
pub mod similarity;
pub mod table;

// Re-export commonly used types
pub use active::ActiveUserRatings;
pub use error::{RecommendError, Result};
pub use neighborhood::{Neighborhood, build_neighborhood};
pub use selector::select_top_k;
pub use similarity::{MIN_CO_RATED, SimilarityEngine, SimilarityMode, SimilarityScore, pearson};
pub use table::{ItemUserTable, UNRATED};

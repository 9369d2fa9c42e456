//! # Data Loader Crate
//!
//! This crate is the Rating Store: it loads MovieLens 100k style rating data
//! and item metadata and keeps them in memory for the rest of the workspace.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RatingEntry, RatingPopulation, Item, ItemCatalog)
//! - **parser**: Parse u.data / u.item into Rust structs
//! - **index**: Load and validate a whole data directory
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_dir(Path::new("data/ml-100k"))?;
//! let ratings = dataset.population.user_ratings(1);
//! println!("User 1 rated {} items", ratings.len());
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::Dataset;
pub use types::{
    Genre, Item, ItemCatalog, ItemId, MAX_RATING, MIN_RATING, RatingEntry, RatingPopulation,
    RatingValue, UserId,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_creation() {
        let population = RatingPopulation::new();
        assert_eq!(population.counts(), (0, 0, 0));
        assert!(population.is_empty());
    }

    #[test]
    fn test_insert_rating() {
        let mut population = RatingPopulation::new();
        population.insert_rating(RatingEntry::new(1, 1193, 5));
        population.insert_rating(RatingEntry::new(1, 661, 3));
        population.insert_rating(RatingEntry::new(2, 1193, 4));

        assert_eq!(population.len(), 3);
        assert_eq!(population.user_ratings(1).len(), 2);
        assert!(population.contains_user(2));
        assert!(!population.contains_user(3));
        assert_eq!(population.user_ids(), vec![1, 2]);
        assert_eq!(population.counts(), (2, 2, 3));
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let population = RatingPopulation::from_entries([
            RatingEntry::new(3, 1, 2),
            RatingEntry::new(1, 2, 4),
            RatingEntry::new(2, 3, 5),
        ]);
        let users: Vec<UserId> = population.iter().map(|e| e.user_id).collect();
        assert_eq!(users, vec![3, 1, 2]);
    }

    #[test]
    fn test_user_mean() {
        let population = RatingPopulation::from_entries([
            RatingEntry::new(1, 1, 5),
            RatingEntry::new(1, 2, 2),
        ]);
        assert_eq!(population.user_mean(1), Some(3.5));
        assert_eq!(population.user_mean(2), None);
    }

    #[test]
    fn test_rating_range() {
        assert!(RatingEntry::new(1, 1, MIN_RATING).has_valid_rating());
        assert!(RatingEntry::new(1, 1, MAX_RATING).has_valid_rating());
        assert!(!RatingEntry::new(1, 1, 0).has_valid_rating());
        assert!(!RatingEntry::new(1, 1, 6).has_valid_rating());
    }

    #[test]
    fn test_empty_queries() {
        let population = RatingPopulation::new();
        let catalog = ItemCatalog::new();

        assert!(population.user_ratings(999).is_empty());
        assert!(catalog.get_item(999).is_none());
        assert!(catalog.item_ids().is_empty());
    }
}

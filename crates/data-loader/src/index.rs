//! Dataset loading and validation.
//!
//! Builds the rating population and the item catalog from a MovieLens
//! 100k directory:
//! - Parse both files in parallel with Rayon
//! - Populate the per-user rating index
//! - Validate ratings and catalog references

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info};

/// Everything loaded from a data directory.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub population: RatingPopulation,
    pub catalog: ItemCatalog,
}

impl Dataset {
    /// Load u.data and u.item from a directory
    ///
    /// Steps:
    /// 1. Check both files exist
    /// 2. Parse them in parallel
    /// 3. Build the population and catalog
    /// 4. Validate data integrity
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading rating data from {:?}", data_dir);

        let ratings_path = data_dir.join("u.data");
        let items_path = data_dir.join("u.item");
        for path in [&ratings_path, &items_path] {
            if !path.exists() {
                return Err(DataLoadError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
        }

        // Rayon's `join` runs both closures in parallel
        let (ratings, items) = rayon::join(
            || parser::parse_ratings(&ratings_path),
            || parser::parse_items(&items_path),
        );
        let ratings = ratings?;
        let items = items?;

        debug!("Parsed {} ratings and {} items", ratings.len(), items.len());

        let mut catalog = ItemCatalog::new();
        for item in items {
            catalog.insert_item(item);
        }

        let dataset = Self {
            population: RatingPopulation::from_entries(ratings),
            catalog,
        };
        dataset.validate()?;

        let (users, rated_items, ratings) = dataset.population.counts();
        info!(
            "Loaded {} users, {} rated items ({} in catalog), {} ratings",
            users,
            rated_items,
            dataset.catalog.len(),
            ratings
        );
        Ok(dataset)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - There is at least one rating
    /// - Ratings are in the valid range (1 - 5)
    /// - Every rated item exists in the catalog
    pub fn validate(&self) -> Result<()> {
        if self.population.is_empty() {
            return Err(DataLoadError::ValidationError(
                "rating population is empty".to_string(),
            ));
        }
        for entry in self.population.iter() {
            if !entry.has_valid_rating() {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: entry.rating.to_string(),
                });
            }
            if !self.catalog.contains_item(entry.item_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Item".to_string(),
                    id: entry.item_id,
                });
            }
        }
        Ok(())
    }
}

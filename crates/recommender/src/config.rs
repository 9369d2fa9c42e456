//! Recommender configuration.
//!
//! Defaults describe an interactive session: a neighborhood of 10 users,
//! active user id 944 (one past the MovieLens 100k population) and 20 items
//! to rate. Any field missing from a JSON file falls back to its default.

use anyhow::{Context, Result, ensure};
use data_loader::UserId;
use neighbors::SimilarityMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// k, the number of neighbors kept
    pub neighborhood_size: usize,
    /// Similarity and prediction formulas
    pub mode: SimilarityMode,
    /// Lowest expected rating that is recommended
    pub min_rating: f64,
    /// Longest recommendation list, `None` for unbounded
    pub max_items: Option<usize>,
    /// Id reserved for the active user; must not exist in the population
    pub active_user_id: UserId,
    /// How many items the active user is asked to rate
    pub ratings_to_collect: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            neighborhood_size: 10,
            mode: SimilarityMode::RawPearson,
            min_rating: 1.0,
            max_items: Some(20),
            active_user_id: 944,
            ratings_to_collect: 20,
        }
    }
}

impl RecommenderConfig {
    /// Read a JSON config file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.min_rating.is_finite(), "min_rating must be a finite number");
        ensure!(
            self.ratings_to_collect > 0,
            "ratings_to_collect must be at least 1"
        );
        Ok(())
    }

    pub fn with_neighborhood_size(mut self, k: usize) -> Self {
        self.neighborhood_size = k;
        self
    }

    pub fn with_mode(mut self, mode: SimilarityMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_active_user_id(mut self, user_id: UserId) -> Self {
        self.active_user_id = user_id;
        self
    }

    pub fn with_ratings_to_collect(mut self, count: usize) -> Self {
        self.ratings_to_collect = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecommenderConfig::default();
        assert_eq!(config.neighborhood_size, 10);
        assert_eq!(config.mode, SimilarityMode::RawPearson);
        assert_eq!(config.active_user_id, 944);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RecommenderConfig::default()
            .with_neighborhood_size(3)
            .with_mode(SimilarityMode::MeanCentered)
            .with_max_items(None)
            .with_min_rating(3.5);

        assert_eq!(config.neighborhood_size, 3);
        assert_eq!(config.mode, SimilarityMode::MeanCentered);
        assert_eq!(config.max_items, None);
        assert_eq!(config.min_rating, 3.5);
    }

    #[test]
    fn test_partial_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "mode": "mean-centered", "neighborhood_size": 25 }"#).unwrap();

        let config = RecommenderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.mode, SimilarityMode::MeanCentered);
        assert_eq!(config.neighborhood_size, 25);
        assert_eq!(config.max_items, Some(20));
    }

    #[test]
    fn test_invalid_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "ratings_to_collect": 0 }"#).unwrap();
        assert!(RecommenderConfig::from_json_file(&path).is_err());

        std::fs::write(&path, "not json").unwrap();
        assert!(RecommenderConfig::from_json_file(&path).is_err());
        assert!(RecommenderConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}

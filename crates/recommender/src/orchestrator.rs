//! # Recommendation Orchestrator
//!
//! Coordinates one recommendation query end to end:
//! 1. Build the item-user table and the neighborhood
//! 2. Predict ratings for items the neighbors rated
//! 3. Filter, rank and truncate the predictions
//!
//! Independent queries can run concurrently on tokio's blocking pool. They
//! share the population through an `Arc` and never write to it.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument};

use data_loader::{RatingPopulation, UserId};
use neighbors::{ActiveUserRatings, Neighborhood, SimilarityMode, SimilarityScore};
use pipeline::{PredictedRating, RecommendationList};

use crate::config::RecommenderConfig;

/// Result of a full query
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub active_user_id: UserId,
    pub mode: SimilarityMode,
    pub neighbors: Vec<SimilarityScore>,
    pub items: Vec<PredictedRating>,
    pub elapsed_ms: f64,
}

/// Collaborative filter over a fixed rating population
#[derive(Debug, Clone)]
pub struct Recommender {
    population: Arc<RatingPopulation>,
    config: RecommenderConfig,
}

impl Recommender {
    pub fn new(population: Arc<RatingPopulation>, config: RecommenderConfig) -> Self {
        Self { population, config }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn population(&self) -> &RatingPopulation {
        &self.population
    }

    /// The `k` users most similar to the active user, with the configured mode
    pub fn build_neighborhood(&self, active: &ActiveUserRatings, k: usize) -> Result<Neighborhood> {
        neighbors::build_neighborhood(&self.population, active, k, self.config.mode)
            .context("Failed to build neighborhood")
    }

    /// Recommendation list for a neighborhood built by this recommender
    pub fn recommend(
        &self,
        neighborhood: &Neighborhood,
        active: &ActiveUserRatings,
        min_rating: f64,
        max_items: Option<usize>,
    ) -> Result<RecommendationList> {
        pipeline::recommend(neighborhood, active, min_rating, max_items)
            .context("Failed to compute recommendations")
    }

    /// Run a whole query with the configured k, threshold and maximum
    #[instrument(skip(self, active), fields(active_user = active.user_id(), mode = %self.config.mode))]
    pub fn recommend_for(&self, active: &ActiveUserRatings) -> Result<Recommendation> {
        let start_time = Instant::now();

        let neighborhood = self.build_neighborhood(active, self.config.neighborhood_size)?;
        info!(
            "Built neighborhood of {} users (k = {})",
            neighborhood.len(),
            self.config.neighborhood_size
        );

        let items = self.recommend(
            &neighborhood,
            active,
            self.config.min_rating,
            self.config.max_items,
        )?;

        let elapsed = start_time.elapsed();
        info!(
            "Recommended {} items for user {} in {:.2?}",
            items.len(),
            active.user_id(),
            elapsed
        );

        Ok(Recommendation {
            active_user_id: active.user_id(),
            mode: neighborhood.mode(),
            neighbors: neighborhood.members().to_vec(),
            items,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        })
    }

    /// Run independent queries concurrently; results keep the input order
    pub async fn recommend_batch(
        &self,
        actives: Vec<ActiveUserRatings>,
    ) -> Result<Vec<Recommendation>> {
        let handles: Vec<_> = actives
            .into_iter()
            .map(|active| {
                let recommender = self.clone();
                tokio::task::spawn_blocking(move || recommender.recommend_for(&active))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.context("Recommendation task panicked")??);
        }
        Ok(results)
    }
}

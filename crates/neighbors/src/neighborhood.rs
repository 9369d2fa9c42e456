//! Neighborhood building: table → similarities → top-k.

use crate::active::ActiveUserRatings;
use crate::error::Result;
use crate::selector::select_top_k;
use crate::similarity::{SimilarityEngine, SimilarityMode, SimilarityScore};
use crate::table::ItemUserTable;
use data_loader::{RatingPopulation, UserId};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// The k users most similar to the active user, most similar first.
///
/// Carries the query's item-user table so predictions can read neighbor
/// ratings without rebuilding it. Nothing here outlives the query.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    active_user_id: UserId,
    mode: SimilarityMode,
    members: Vec<SimilarityScore>,
    table: Arc<ItemUserTable>,
}

impl Neighborhood {
    pub fn active_user_id(&self) -> UserId {
        self.active_user_id
    }

    /// Mode the correlations were computed with
    pub fn mode(&self) -> SimilarityMode {
        self.mode
    }

    /// Neighbors sorted by correlation descending
    pub fn members(&self) -> &[SimilarityScore] {
        &self.members
    }

    pub fn table(&self) -> &ItemUserTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn user_ids(&self) -> Vec<UserId> {
        self.members.iter().map(|m| m.user_id).collect()
    }

    /// Whether `active` holds exactly the ratings this neighborhood was built from
    pub fn was_built_from(&self, active: &ActiveUserRatings) -> bool {
        active.user_id() == self.active_user_id
            && self.table.rated_items(self.active_user_id).count() == active.len()
            && active.entries().iter().all(|entry| {
                self.table.rating(entry.item_id, entry.user_id) == Some(entry.rating)
            })
    }

    /// Correlation of a neighbor, `None` if the user is not in the neighborhood
    pub fn weight(&self, user_id: UserId) -> Option<f64> {
        self.members
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.correlation)
    }
}

/// Find the `k` users most similar to the active user.
///
/// Fails only on malformed input. Users with too little overlap are skipped,
/// so the neighborhood may hold fewer than `k` users, or none.
#[instrument(skip(population, active), fields(active_user = active.user_id()))]
pub fn build_neighborhood(
    population: &RatingPopulation,
    active: &ActiveUserRatings,
    k: usize,
    mode: SimilarityMode,
) -> Result<Neighborhood> {
    let table = ItemUserTable::build(population, active)?;
    let scores = SimilarityEngine::new(mode).score_all(&table, active.user_id());
    let members = select_top_k(scores, k);

    if members.is_empty() {
        warn!(
            "No user shares enough co-rated items with active user {}",
            active.user_id()
        );
    } else {
        debug!("Selected {} neighbors", members.len());
    }

    Ok(Neighborhood {
        active_user_id: active.user_id(),
        mode,
        members,
        table: Arc::new(table),
    })
}

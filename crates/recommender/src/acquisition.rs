//! Getting ratings from the active user.
//!
//! The recommender only needs "ratings for these items". Where they come
//! from (a prompt, a random generator, a fixed list) is up to the
//! [`RatingSupplier`] implementation, including any retry-until-valid loop.

use anyhow::{Context, Result, bail};
use data_loader::{ItemId, RatingValue, UserId};
use neighbors::ActiveUserRatings;
use std::collections::{HashMap, HashSet};

/// Anything that can rate a list of items on behalf of the active user.
pub trait RatingSupplier {
    /// Ratings for some or all of `item_ids`
    fn supply(&mut self, item_ids: &[ItemId]) -> Result<Vec<(ItemId, RatingValue)>>;
}

/// Fixed ratings; items without an entry are left unrated
impl RatingSupplier for HashMap<ItemId, RatingValue> {
    fn supply(&mut self, item_ids: &[ItemId]) -> Result<Vec<(ItemId, RatingValue)>> {
        Ok(item_ids
            .iter()
            .filter_map(|id| self.get(id).map(|&rating| (*id, rating)))
            .collect())
    }
}

/// Ask `supplier` to rate `item_ids` and validate the answer as the
/// active user's ratings.
pub fn collect_active_ratings(
    supplier: &mut impl RatingSupplier,
    item_ids: &[ItemId],
    user_id: UserId,
) -> Result<ActiveUserRatings> {
    let ratings = supplier
        .supply(item_ids)
        .context("Failed to collect active user ratings")?;

    let requested: HashSet<ItemId> = item_ids.iter().copied().collect();
    if let Some((item_id, _)) = ratings.iter().find(|(id, _)| !requested.contains(id)) {
        bail!("Supplier rated item {} which was not requested", item_id);
    }

    Ok(ActiveUserRatings::new(user_id, ratings)?)
}

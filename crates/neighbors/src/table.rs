//! Dense item × user rating matrix.
//!
//! Rows are items and columns are users, both in ascending id order. Cells
//! hold the rating or [`UNRATED`]. Storage is column-major so one user's
//! ratings form a contiguous slice, which is what similarity scoring walks;
//! a row is a strided view across all users.

use crate::active::ActiveUserRatings;
use crate::error::{RecommendError, Result};
use data_loader::{ItemId, RatingEntry, RatingPopulation, RatingValue, UserId};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// Cell value for "no rating recorded". Real ratings start at 1.
pub const UNRATED: RatingValue = 0;

#[derive(Debug, Clone)]
pub struct ItemUserTable {
    items: Vec<ItemId>,
    users: Vec<UserId>,
    item_index: HashMap<ItemId, usize>,
    user_index: HashMap<UserId, usize>,
    /// Column of user at position `u` is `cells[u * items.len()..(u + 1) * items.len()]`
    cells: Vec<RatingValue>,
    /// Mean of each column's rated cells, by user position
    means: Vec<Option<f64>>,
}

impl ItemUserTable {
    /// Combine the population and the active user's ratings into one table.
    ///
    /// The population itself is left untouched.
    #[instrument(skip_all, fields(active_user = active.user_id()))]
    pub fn build(population: &RatingPopulation, active: &ActiveUserRatings) -> Result<Self> {
        if population.contains_user(active.user_id()) {
            return Err(RecommendError::invalid_input(format!(
                "active user id {} already exists in the rating population",
                active.user_id()
            )));
        }

        let table = Self::from_entries(population.iter().chain(active.entries()))?;
        debug!(
            "Built {} x {} item-user table",
            table.n_items(),
            table.n_users()
        );
        Ok(table)
    }

    /// Build a table from arbitrary entries.
    ///
    /// Fails if a rating is outside 1-5 or a (user, item) pair appears twice.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a RatingEntry>) -> Result<Self> {
        let entries: Vec<&RatingEntry> = entries.into_iter().collect();

        let items: Vec<ItemId> = entries
            .iter()
            .map(|e| e.item_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let users: Vec<UserId> = entries
            .iter()
            .map(|e| e.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let item_index: HashMap<ItemId, usize> =
            items.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();
        let user_index: HashMap<UserId, usize> =
            users.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();

        let n_items = items.len();
        let mut cells = vec![UNRATED; n_items * users.len()];
        for entry in entries {
            if !entry.has_valid_rating() {
                return Err(RecommendError::invalid_input(format!(
                    "rating {} by user {} for item {} is outside 1-5",
                    entry.rating, entry.user_id, entry.item_id
                )));
            }
            let cell = &mut cells[user_index[&entry.user_id] * n_items + item_index[&entry.item_id]];
            if *cell != UNRATED {
                return Err(RecommendError::invalid_input(format!(
                    "user {} rated item {} more than once",
                    entry.user_id, entry.item_id
                )));
            }
            *cell = entry.rating;
        }

        let means = cells.chunks(n_items.max(1)).map(column_mean).collect();

        Ok(Self {
            items,
            users,
            item_index,
            user_index,
            cells,
            means,
        })
    }

    /// Row keys, ascending
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// Column keys, ascending
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.user_index.contains_key(&user_id)
    }

    pub fn contains_item(&self, item_id: ItemId) -> bool {
        self.item_index.contains_key(&item_id)
    }

    /// Cell value, [`UNRATED`] when the pair or either id is unknown
    pub fn get(&self, item_id: ItemId, user_id: UserId) -> RatingValue {
        self.rating(item_id, user_id).unwrap_or(UNRATED)
    }

    /// The user's rating for the item, if any
    pub fn rating(&self, item_id: ItemId, user_id: UserId) -> Option<RatingValue> {
        let item = *self.item_index.get(&item_id)?;
        let column = self.column(user_id)?;
        Some(column[item]).filter(|&r| r != UNRATED)
    }

    /// All cells of one user, aligned with [`items`](Self::items)
    pub fn column(&self, user_id: UserId) -> Option<&[RatingValue]> {
        let user = *self.user_index.get(&user_id)?;
        let n_items = self.items.len();
        Some(&self.cells[user * n_items..(user + 1) * n_items])
    }

    /// All cells of one item as (user, cell) pairs, aligned with [`users`](Self::users)
    pub fn row(&self, item_id: ItemId) -> Option<impl Iterator<Item = (UserId, RatingValue)> + '_> {
        let item = *self.item_index.get(&item_id)?;
        let cells = self.cells[item..].iter().step_by(self.items.len()).copied();
        Some(self.users.iter().copied().zip(cells))
    }

    /// Items the user rated, ascending
    pub fn rated_items(&self, user_id: UserId) -> impl Iterator<Item = ItemId> + '_ {
        self.column(user_id)
            .unwrap_or(&[])
            .iter()
            .zip(&self.items)
            .filter(|(cell, _)| **cell != UNRATED)
            .map(|(_, &item_id)| item_id)
    }

    /// Mean over everything the user rated, `None` for unknown users
    pub fn user_mean(&self, user_id: UserId) -> Option<f64> {
        let user = *self.user_index.get(&user_id)?;
        self.means[user]
    }
}

fn column_mean(column: &[RatingValue]) -> Option<f64> {
    let (total, count) = column
        .iter()
        .filter(|&&r| r != UNRATED)
        .fold((0u32, 0u32), |(total, count), &r| (total + r as u32, count + 1));
    (count > 0).then(|| total as f64 / count as f64)
}

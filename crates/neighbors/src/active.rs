//! The active user's ratings for one query.

use crate::error::{RecommendError, Result};
use data_loader::{ItemId, RatingEntry, RatingValue, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ratings of the user we are recommending for.
///
/// Invariants checked on construction: at least one rating, every entry
/// carries the same user id, every rating is on the 1-5 scale and no item is
/// rated twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveUserRatings {
    user_id: UserId,
    entries: Vec<RatingEntry>,
}

impl ActiveUserRatings {
    /// Build from (item, rating) pairs for a reserved user id
    pub fn new(
        user_id: UserId,
        ratings: impl IntoIterator<Item = (ItemId, RatingValue)>,
    ) -> Result<Self> {
        let entries = ratings
            .into_iter()
            .map(|(item_id, rating)| RatingEntry::new(user_id, item_id, rating))
            .collect();
        Self::from_entries(entries)
    }

    /// Build from full entries; the first entry decides the user id
    pub fn from_entries(entries: Vec<RatingEntry>) -> Result<Self> {
        let user_id = entries
            .first()
            .map(|e| e.user_id)
            .ok_or_else(|| RecommendError::invalid_input("active user ratings are empty"))?;

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.user_id != user_id {
                return Err(RecommendError::invalid_input(format!(
                    "active user ratings mix user ids {} and {}",
                    user_id, entry.user_id
                )));
            }
            if !entry.has_valid_rating() {
                return Err(RecommendError::invalid_input(format!(
                    "rating {} for item {} is outside 1-5",
                    entry.rating, entry.item_id
                )));
            }
            if !seen.insert(entry.item_id) {
                return Err(RecommendError::invalid_input(format!(
                    "item {} is rated more than once by the active user",
                    entry.item_id
                )));
            }
        }

        Ok(Self { user_id, entries })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false once constructed; kept for the usual collection API
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rated_items(&self) -> HashSet<ItemId> {
        self.entries.iter().map(|e| e.item_id).collect()
    }

    pub fn has_rated(&self, item_id: ItemId) -> bool {
        self.entries.iter().any(|e| e.item_id == item_id)
    }

    /// Mean of the active user's ratings
    pub fn mean(&self) -> f64 {
        let total: u32 = self.entries.iter().map(|e| e.rating as u32).sum();
        total as f64 / self.entries.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_active_ratings() {
        let active = ActiveUserRatings::new(944, [(1, 5), (2, 3), (3, 4)]).unwrap();
        assert_eq!(active.user_id(), 944);
        assert_eq!(active.len(), 3);
        assert!(active.has_rated(2));
        assert!(!active.has_rated(9));
        assert_eq!(active.mean(), 4.0);
    }

    #[test]
    fn test_empty_is_invalid() {
        let err = ActiveUserRatings::from_entries(Vec::new()).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidInput { .. }));
    }

    #[test]
    fn test_out_of_range_is_invalid() {
        assert!(ActiveUserRatings::new(944, [(1, 0)]).is_err());
        assert!(ActiveUserRatings::new(944, [(1, 6)]).is_err());
    }

    #[test]
    fn test_mixed_user_ids_are_invalid() {
        let err = ActiveUserRatings::from_entries(vec![
            RatingEntry::new(944, 1, 5),
            RatingEntry::new(945, 2, 5),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("mix user ids"));
    }

    #[test]
    fn test_duplicate_item_is_invalid() {
        assert!(ActiveUserRatings::new(944, [(1, 5), (1, 4)]).is_err());
    }
}

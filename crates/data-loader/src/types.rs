//! Core domain types for rating data.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, ItemId)
//! - Small `Copy` structs for immutable records
//! - Enums for fixed sets of values
//! - HashMap indices that hand out borrowed slices

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with item IDs

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a rated item
pub type ItemId = u32;

/// A rating on the 1-5 scale
pub type RatingValue = u8;

/// Lowest rating a user can give
pub const MIN_RATING: RatingValue = 1;

/// Highest rating a user can give
pub const MAX_RATING: RatingValue = 5;

// =============================================================================
// Rating Type
// =============================================================================

/// A single (user, item, rating) triple.
///
/// Immutable once recorded: all fields are `Copy` and the struct is passed
/// around by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatingEntry {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: RatingValue,
}

impl RatingEntry {
    pub fn new(user_id: UserId, item_id: ItemId, rating: RatingValue) -> Self {
        Self {
            user_id,
            item_id,
            rating,
        }
    }

    /// Whether the rating lies on the 1-5 scale
    pub fn has_valid_rating(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}

// =============================================================================
// Item-related Types
// =============================================================================

/// An item from the catalog (a movie, for MovieLens data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Year extracted from the title (e.g., "Toy Story (1995)") or release date
    pub year: Option<u16>,
    pub genres: Vec<Genre>,
}

/// Genres from the MovieLens 100k catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Unknown,
    Action,
    Adventure,
    Animation,
    Children,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    FilmNoir,
    Horror,
    Musical,
    Mystery,
    Romance,
    SciFi,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// Genres in the order of the flag columns of `u.item`
    pub const ALL: [Genre; 19] = [
        Genre::Unknown,
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Children,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::FilmNoir,
        Genre::Horror,
        Genre::Musical,
        Genre::Mystery,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];
}

// =============================================================================
// RatingPopulation - The Rating Store
// =============================================================================

/// Every rating known for the existing users.
///
/// The population is loaded once per session and then only read. Queries
/// never append to it: the active user's ratings go into a per-query table.
///
/// Rust concepts demonstrated:
/// - `Vec<T>` keeps the original insertion order
/// - A HashMap index gives O(1) access to one user's ratings
/// - Borrowing: lookups return `&[T]` slices instead of copies
#[derive(Debug, Clone, Default)]
pub struct RatingPopulation {
    /// All ratings in insertion order
    pub(crate) entries: Vec<RatingEntry>,
    /// All ratings made by each user
    pub(crate) user_ratings: HashMap<UserId, Vec<RatingEntry>>,
}

impl RatingPopulation {
    /// Creates a new, empty population
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a population from entries, preserving their order
    pub fn from_entries(entries: impl IntoIterator<Item = RatingEntry>) -> Self {
        let mut population = Self::new();
        for entry in entries {
            population.insert_rating(entry);
        }
        population
    }

    /// Insert a rating and update the per-user index
    pub fn insert_rating(&mut self, entry: RatingEntry) {
        self.entries.push(entry);
        self.user_ratings
            .entry(entry.user_id)
            .or_default()
            .push(entry);
    }

    /// All ratings in insertion order
    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &RatingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any rating was recorded for this user
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.user_ratings.contains_key(&user_id)
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if the user has no ratings
    pub fn user_ratings(&self, user_id: UserId) -> &[RatingEntry] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every user id, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_ratings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Mean of a user's ratings, `None` for unknown users
    pub fn user_mean(&self, user_id: UserId) -> Option<f64> {
        let ratings = self.user_ratings(user_id);
        if ratings.is_empty() {
            return None;
        }
        let total: u32 = ratings.iter().map(|r| r.rating as u32).sum();
        Some(total as f64 / ratings.len() as f64)
    }

    /// Counts of (users, distinct items, ratings) for debugging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        let items: BTreeSet<ItemId> = self.entries.iter().map(|e| e.item_id).collect();
        (self.user_ratings.len(), items.len(), self.entries.len())
    }
}

// =============================================================================
// ItemCatalog - metadata lookup for display
// =============================================================================

/// Item metadata keyed by id.
///
/// Only the display side reads this; the recommendation core works on ids.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    pub(crate) items: HashMap<ItemId, Item>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_item(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn contains_item(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Every item id, ascending
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.items.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

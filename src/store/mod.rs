//! In-memory review store
//!
//! Holds the canonical, insertion-ordered sequence of reviews and the fixed
//! set of locations reviews may be filed under. The sequence sits behind a
//! single reader/writer lock: snapshots take the read side, appends the write
//! side, so a reader never observes a half-applied append.

mod seed;

use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::model::Review;

pub struct ReviewStore {
    reviews: RwLock<Vec<Review>>,
    /// Derived once from the seed data and never mutated afterwards
    valid_locations: HashSet<String>,
}

impl ReviewStore {
    /// Build the store from the initial data set.
    ///
    /// The valid-location set is the distinct locations of `initial`.
    pub fn seed(initial: Vec<Review>) -> Self {
        let valid_locations = initial.iter().map(|r| r.location.clone()).collect();
        Self {
            reviews: RwLock::new(initial),
            valid_locations,
        }
    }

    /// Snapshot of every review in insertion order
    pub async fn all(&self) -> Vec<Review> {
        self.reviews.read().await.clone()
    }

    /// Append a review to the end of the sequence.
    ///
    /// Callers validate the location beforehand; id uniqueness comes from the
    /// id generator and is not re-checked here.
    pub async fn append(&self, review: Review) {
        self.reviews.write().await.push(review);
    }

    pub fn is_valid_location(&self, location: &str) -> bool {
        self.valid_locations.contains(location)
    }

    pub async fn count(&self) -> usize {
        self.reviews.read().await.len()
    }

    pub fn location_count(&self) -> usize {
        self.valid_locations.len()
    }
}

//! Review domain types

mod review;
mod timestamp;

pub use review::{new_review_id, Review, ScoredReview};
pub use timestamp::Timestamp;

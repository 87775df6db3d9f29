//! Review read and write paths
//!
//! Reads score a snapshot, rank it by compound sentiment and filter it.
//! Writes validate a submission against the store's locations and append it.

use crate::error::RequestError;
use crate::handler::params::{ReviewForm, ReviewQuery};
use crate::model::{Review, ScoredReview};
use crate::sentiment::SentimentScorer;
use crate::store::ReviewStore;

/// Score, rank and filter the current reviews.
///
/// The result is ordered by descending compound score; equal scores keep
/// their insertion order. The store itself is left untouched.
pub async fn list_reviews(
    store: &ReviewStore,
    scorer: &dyn SentimentScorer,
    query: &ReviewQuery,
) -> Vec<ScoredReview> {
    let mut scored: Vec<ScoredReview> = store
        .all()
        .await
        .into_iter()
        .map(|review| {
            let sentiment = scorer.score(&review.body);
            ScoredReview { review, sentiment }
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.sentiment.compound.total_cmp(&a.sentiment.compound));
    scored.retain(|s| query.matches(&s.review));
    scored
}

/// Validate a submission and append the new review.
///
/// Location is checked before the body so the first failing check decides
/// the error. Nothing is appended unless every check passes.
pub async fn create_review(store: &ReviewStore, form: ReviewForm) -> Result<Review, RequestError> {
    let location = form.location.ok_or(RequestError::MissingLocation)?;
    if !store.is_valid_location(&location) {
        return Err(RequestError::InvalidLocation);
    }
    let body = form.body.ok_or(RequestError::MissingReviewBody)?;

    let review = Review::submit(location, body);
    store.append(review.clone()).await;
    Ok(review)
}

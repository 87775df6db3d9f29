// Review record types
// Canonical stored reviews and their per-request scored copies

use serde::Serialize;
use uuid::Uuid;

use super::Timestamp;
use crate::sentiment::Sentiment;

/// A stored review. Immutable once appended to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: String,
    pub timestamp: Timestamp,
    pub body: String,
    pub location: String,
}

impl Review {
    /// Create a review submitted now, with a freshly minted id
    pub fn submit(location: String, body: String) -> Self {
        Self {
            id: new_review_id(),
            timestamp: Timestamp::now(),
            body,
            location,
        }
    }
}

/// Mint a new opaque review identifier (UUID v4)
pub fn new_review_id() -> String {
    Uuid::new_v4().to_string()
}

/// Transient copy of a review with its sentiment attached.
///
/// Built per read request and never written back to the store.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredReview {
    #[serde(flatten)]
    pub review: Review,
    pub sentiment: Sentiment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_mints_unique_ids() {
        let a = Review::submit("Seattle".to_string(), "ok".to_string());
        let b = Review::submit("Seattle".to_string(), "ok".to_string());
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_review_json_has_no_sentiment() {
        let review = Review {
            id: "r-1".to_string(),
            timestamp: Timestamp::parse_canonical("2024-01-01 10:00:00").unwrap(),
            body: "Great stay".to_string(),
            location: "Seattle".to_string(),
        };
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "r-1",
                "timestamp": "2024-01-01 10:00:00",
                "body": "Great stay",
                "location": "Seattle"
            })
        );
    }

    #[test]
    fn test_scored_review_flattens_fields() {
        let scored = ScoredReview {
            review: Review {
                id: "r-2".to_string(),
                timestamp: Timestamp::parse_canonical("2024-02-01 08:15:00").unwrap(),
                body: "Awful".to_string(),
                location: "Denver".to_string(),
            },
            sentiment: Sentiment {
                negative: 1.0,
                neutral: 0.0,
                positive: 0.0,
                compound: -0.5,
            },
        };
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["id"], "r-2");
        assert_eq!(json["location"], "Denver");
        assert_eq!(json["sentiment"]["compound"], -0.5);
        assert_eq!(json["sentiment"]["negative"], 1.0);
    }
}

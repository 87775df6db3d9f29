//! Request parameter extraction
//!
//! Query strings and form bodies are `application/x-www-form-urlencoded`.
//! Every parameter is parsed once into an explicit optional field; when a key
//! repeats, its first occurrence wins.

use url::form_urlencoded;

use crate::error::RequestError;
use crate::model::{Review, Timestamp};

type Pairs = Vec<(String, String)>;

fn decode(input: &[u8]) -> Pairs {
    form_urlencoded::parse(input).into_owned().collect()
}

/// First value for `key`, including empty ones
fn first<'a>(pairs: &'a Pairs, key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// First non-empty value for `key`; blank values count as absent
fn first_non_empty<'a>(pairs: &'a Pairs, key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.as_str())
}

/// Filters for the review listing
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    /// Exact location match
    pub location: Option<String>,
    /// Inclusive lower bound on the review timestamp
    pub start_date: Option<Timestamp>,
    /// Inclusive upper bound on the review timestamp
    pub end_date: Option<Timestamp>,
}

impl ReviewQuery {
    /// Parse `location`, `start_date` and `end_date` from a raw query string.
    ///
    /// Unknown keys are ignored. A date that cannot be parsed is rejected.
    pub fn parse(query: Option<&str>) -> Result<Self, RequestError> {
        let pairs = decode(query.unwrap_or_default().as_bytes());

        Ok(Self {
            location: first_non_empty(&pairs, "location").map(ToString::to_string),
            start_date: parse_bound(&pairs, "start_date")?,
            end_date: parse_bound(&pairs, "end_date")?,
        })
    }

    /// Whether `review` passes every filter: location, then start, then end
    pub fn matches(&self, review: &Review) -> bool {
        self.location
            .as_deref()
            .is_none_or(|location| review.location == location)
            && self.start_date.is_none_or(|start| review.timestamp >= start)
            && self.end_date.is_none_or(|end| review.timestamp <= end)
    }
}

fn parse_bound(pairs: &Pairs, param: &'static str) -> Result<Option<Timestamp>, RequestError> {
    first_non_empty(pairs, param)
        .map(|value| {
            Timestamp::parse_bound(value).ok_or_else(|| RequestError::InvalidDate {
                param,
                value: value.to_string(),
            })
        })
        .transpose()
}

/// Fields of a review submission form. Presence is all that is recorded;
/// an empty value is still present.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub location: Option<String>,
    pub body: Option<String>,
}

impl ReviewForm {
    pub fn parse(body: &[u8]) -> Self {
        let pairs = decode(body);
        Self {
            location: first(&pairs, "Location").map(ToString::to_string),
            body: first(&pairs, "ReviewBody").map(ToString::to_string),
        }
    }
}

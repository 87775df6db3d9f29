//! Error types
//!
//! `SeedError` is fatal and only raised while loading the initial data set.
//! `RequestError` is the client error taxonomy; its `Display` text is the
//! exact plain-text body sent back with a 400.

use hyper::StatusCode;
use thiserror::Error;

/// Failure to load the initial review data set
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("failed to open seed file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed data: {0}")]
    Csv(#[from] csv::Error),

    #[error("record {record}: invalid Timestamp '{value}', expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp { record: u64, value: String },
}

/// Client error raised while validating a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Missing Location")]
    MissingLocation,

    #[error("Invalid Location")]
    InvalidLocation,

    #[error("Missing Review Body")]
    MissingReviewBody,

    #[error("Invalid {param}: '{value}'")]
    InvalidDate { param: &'static str, value: String },

    #[error("Failed to read request body")]
    UnreadableBody,
}

impl RequestError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingLocation
            | Self::InvalidLocation
            | Self::MissingReviewBody
            | Self::InvalidDate { .. }
            | Self::UnreadableBody => StatusCode::BAD_REQUEST,
        }
    }
}

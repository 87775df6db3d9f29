//! Request handler module
//!
//! Routing dispatch, parameter parsing and the review read/write paths.

pub mod params;
pub mod reviews;
pub mod router;

// Re-export main entry point
pub use router::handle_request;

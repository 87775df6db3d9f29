// Seed data loading
// Reads the initial review data set from CSV at startup

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::ReviewStore;
use crate::error::SeedError;
use crate::model::{new_review_id, Review, Timestamp};

/// One row of the seed file. Columns beyond these are ignored.
#[derive(Debug, Deserialize)]
struct SeedRecord {
    #[serde(rename = "ReviewId", default)]
    id: Option<String>,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "ReviewBody")]
    body: String,
}

impl ReviewStore {
    /// Load and seed the store from a CSV file on disk
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SeedError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    /// Seed the store from CSV data with a header row.
    ///
    /// `Location`, `ReviewBody` and `Timestamp` columns are required; an
    /// optional `ReviewId` column supplies ids, otherwise fresh ones are minted.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, SeedError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut reviews = Vec::new();
        for (index, row) in csv_reader.deserialize::<SeedRecord>().enumerate() {
            let row = row?;
            let timestamp = Timestamp::parse_canonical(&row.timestamp).map_err(|_| {
                SeedError::InvalidTimestamp {
                    record: index as u64 + 1,
                    value: row.timestamp.clone(),
                }
            })?;

            reviews.push(Review {
                id: row.id.filter(|id| !id.trim().is_empty()).unwrap_or_else(new_review_id),
                timestamp,
                body: row.body,
                location: row.location,
            });
        }

        Ok(Self::seed(reviews))
    }
}

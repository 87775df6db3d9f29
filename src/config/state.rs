// Application state module
// Shared, process-lifetime state handed to every request

use super::types::Config;
use crate::sentiment::SentimentScorer;
use crate::store::ReviewStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: ReviewStore,
    pub scorer: Box<dyn SentimentScorer>,
}

impl AppState {
    pub fn new(config: Config, store: ReviewStore, scorer: Box<dyn SentimentScorer>) -> Self {
        Self {
            config,
            store,
            scorer,
        }
    }
}

//! Sentiment scoring
//!
//! Review ranking consumes a [`SentimentScorer`]. The production scorer is
//! VADER, a lexicon and rule based model tuned for short social text.

use serde::Serialize;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Polarity scores for a piece of text.
///
/// `negative`, `neutral` and `positive` are proportions in `[0, 1]`;
/// `compound` is the normalized aggregate in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Sentiment {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

/// Capability to score free text. Scoring never fails.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> Sentiment;
}

/// VADER-backed scorer
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> Sentiment {
        // Nothing to score in blank text
        if text.trim().is_empty() {
            return Sentiment::default();
        }

        let scores = self.analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);

        Sentiment {
            negative: get("neg"),
            neutral: get("neu"),
            positive: get("pos"),
            compound: get("compound"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let s = VaderScorer::new().score("Great stay");
        assert!(s.compound > 0.0, "compound: {}", s.compound);
        assert!(s.positive > 0.0);
    }

    #[test]
    fn test_negative_text() {
        let s = VaderScorer::new().score("The room was dirty and the staff were terrible.");
        assert!(s.compound < 0.0, "compound: {}", s.compound);
        assert!(s.negative > 0.0);
    }

    #[test]
    fn test_scores_are_bounded() {
        let scorer = VaderScorer::new();
        for text in [
            "",
            "ok",
            "AMAZING!!! Best hotel ever, loved every minute :)",
            "horrible horrible horrible, never again",
        ] {
            let s = scorer.score(text);
            assert!((-1.0..=1.0).contains(&s.compound), "{text}: {s:?}");
            for part in [s.negative, s.neutral, s.positive] {
                assert!((0.0..=1.0).contains(&part), "{text}: {s:?}");
            }
        }
    }

    #[test]
    fn test_ranking_prefers_positive() {
        let scorer = VaderScorer::new();
        let good = scorer.score("Wonderful, friendly and clean");
        let bad = scorer.score("Awful, rude and dirty");
        assert!(good.compound > bad.compound);
    }
}

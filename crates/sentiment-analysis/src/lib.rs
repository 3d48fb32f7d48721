//! Keyword sentiment over recent headlines with age decay.

use analysis_core::{ConfigurationError, Headline};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_HEADLINE_LIMIT: usize = 5;

/// Matched as lower-case substrings of the title
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "upgraded", "buy", "growth", "beats", "profit", "bull", "surge", "soar", "strong", "record",
    "partnership", "chance", "outperform", "jump",
];

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "risk", "sell", "loss", "misses", "bear", "warn", "drop", "fall", "plunge", "downgrade",
    "weak", "problem", "lawsuit",
];

/// Decay weight for a headline of the given age in hours.
///
/// 1.0 under 24h, 0.5 under 72h, 0.2 beyond. Negative ages (clock skew) count as fresh.
pub fn decay_weight(age_hours: f64) -> f64 {
    if age_hours < 24.0 {
        1.0
    } else if age_hours < 72.0 {
        0.5
    } else {
        0.2
    }
}

/// Signed sentiment total for a batch of headlines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub total: f64,
    pub analyzed: usize,
    pub positive_hits: usize,
    pub negative_hits: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordMatch {
    Positive,
    Negative,
    Both,
    None,
}

pub struct SentimentAnalysisEngine {
    positive_words: Vec<&'static str>,
    negative_words: Vec<&'static str>,
    headline_limit: usize,
}

impl Default for SentimentAnalysisEngine {
    fn default() -> Self {
        Self {
            positive_words: POSITIVE_KEYWORDS.to_vec(),
            negative_words: NEGATIVE_KEYWORDS.to_vec(),
            headline_limit: DEFAULT_HEADLINE_LIMIT,
        }
    }
}

impl SentimentAnalysisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that reads up to `headline_limit` of the most recent headlines
    pub fn with_headline_limit(headline_limit: usize) -> Result<Self, ConfigurationError> {
        if headline_limit == 0 {
            return Err(ConfigurationError::InvalidHeadlineLimit);
        }
        Ok(Self {
            headline_limit,
            ..Self::default()
        })
    }

    pub fn headline_limit(&self) -> usize {
        self.headline_limit
    }

    /// Each keyword set counts at most once per title; both sets may match.
    pub fn classify(&self, title: &str) -> KeywordMatch {
        let lower = title.to_lowercase();
        let positive = self.positive_words.iter().any(|w| lower.contains(w));
        let negative = self.negative_words.iter().any(|w| lower.contains(w));
        match (positive, negative) {
            (true, true) => KeywordMatch::Both,
            (true, false) => KeywordMatch::Positive,
            (false, true) => KeywordMatch::Negative,
            (false, false) => KeywordMatch::None,
        }
    }

    fn age_hours(headline: &Headline, now: DateTime<Utc>) -> f64 {
        match headline.published_at {
            Some(published) => (now - published).num_seconds() as f64 / 3600.0,
            None => 0.0,
        }
    }

    /// Score the first `headline_limit` headlines (most recent first) against `now`.
    pub fn score(
        &self,
        headlines: &[Headline],
        positive_weight: u32,
        negative_weight: u32,
        now: DateTime<Utc>,
    ) -> SentimentScore {
        let mut result = SentimentScore::default();

        for headline in headlines.iter().take(self.headline_limit) {
            let decay = decay_weight(Self::age_hours(headline, now));
            let matched = self.classify(&headline.title);

            if matches!(matched, KeywordMatch::Positive | KeywordMatch::Both) {
                result.total += positive_weight as f64 * decay;
                result.positive_hits += 1;
            }
            if matches!(matched, KeywordMatch::Negative | KeywordMatch::Both) {
                result.total -= negative_weight as f64 * decay;
                result.negative_hits += 1;
            }

            debug!(title = %headline.title, ?matched, decay, "headline scored");
            result.analyzed += 1;
        }

        result
    }
}

//! Side-by-side scoring of two instruments under the same weights.

use analysis_core::{ConfigurationError, VerdictResult, WeightConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{InstrumentSnapshot, VerdictEngine};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub metric: String,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerComparison {
    pub left_symbol: String,
    pub right_symbol: String,
    pub left: VerdictResult,
    pub right: VerdictResult,
    /// Left score minus right score
    pub score_delta: i32,
    pub metrics: Vec<MetricRow>,
}

impl PeerComparison {
    /// Symbol with the higher score, `None` on a tie
    pub fn leader(&self) -> Option<&str> {
        match self.score_delta {
            d if d > 0 => Some(self.left_symbol.as_str()),
            d if d < 0 => Some(self.right_symbol.as_str()),
            _ => None,
        }
    }
}

fn metric_rows(left: &VerdictResult, right: &VerdictResult) -> Vec<MetricRow> {
    let row = |metric: &str, pick: fn(&VerdictResult) -> Option<f64>| MetricRow {
        metric: metric.to_string(),
        left: pick(left),
        right: pick(right),
    };
    vec![
        row("Forward P/E", |r| r.intermediates.forward_pe),
        row("Operating margin", |r| r.intermediates.operating_margin),
        row("RSI", |r| r.intermediates.rsi),
        row("Score", |r| Some(r.score as f64)),
    ]
}

pub fn compare_instruments(
    engine: &VerdictEngine,
    left: &InstrumentSnapshot,
    right: &InstrumentSnapshot,
    weights: &WeightConfig,
    now: DateTime<Utc>,
) -> Result<PeerComparison, ConfigurationError> {
    let score = |snap: &InstrumentSnapshot| {
        engine.score_instrument_at(&snap.prices, &snap.fundamentals, &snap.headlines, weights, now)
    };
    let left_result = score(left)?;
    let right_result = score(right)?;

    let score_delta = left_result.score as i32 - right_result.score as i32;
    tracing::info!(
        "Compared {} ({}) with {} ({})",
        left.symbol,
        left_result.score,
        right.symbol,
        right_result.score
    );

    Ok(PeerComparison {
        left_symbol: left.symbol.clone(),
        right_symbol: right.symbol.clone(),
        metrics: metric_rows(&left_result, &right_result),
        left: left_result,
        right: right_result,
        score_delta,
    })
}

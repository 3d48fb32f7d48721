use super::VerdictEngine;
use analysis_core::{
    ConfigurationError, FundamentalSnapshot, Headline, PriceBar, Verdict, WeightConfig,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Instruments with this many bars or fewer are skipped outright
pub const MIN_SCAN_BARS: usize = 50;
pub const DEFAULT_MIN_SCORE: u8 = 90;

/// Everything needed to score one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    pub symbol: String,
    pub prices: Vec<PriceBar>,
    #[serde(default)]
    pub fundamentals: FundamentalSnapshot,
    #[serde(default)]
    pub headlines: Vec<Headline>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniverseCategory {
    TechAi,
    Space,
    Crypto,
    Defense,
    Other,
}

impl UniverseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            UniverseCategory::TechAi => "Tech/AI",
            UniverseCategory::Space => "Space",
            UniverseCategory::Crypto => "Crypto",
            UniverseCategory::Defense => "Defense",
            UniverseCategory::Other => "Other",
        }
    }

    pub fn symbols(&self) -> &'static [&'static str] {
        match self {
            UniverseCategory::TechAi => &[
                "NVDA", "MSFT", "AAPL", "GOOGL", "AMD", "TSM", "AVGO", "META", "PLTR", "SMCI",
                "ARM", "ORCL", "ADBE", "CRM", "AMZN", "NFLX",
            ],
            UniverseCategory::Space => &["RKLB", "SPCE", "ASTS", "LUNR", "SIDU", "VSAT", "GSAT"],
            UniverseCategory::Crypto => &[
                "MARA", "RIOT", "CLSK", "MSTR", "COIN", "CORZ", "IREN", "HUT", "WULF", "BITF",
                "HIVE",
            ],
            UniverseCategory::Defense => &[
                "LMT", "RTX", "NOC", "GD", "LHX", "AVAV", "KTOS", "RHM.DE", "HENS.DE", "BA",
                "AIR.PA",
            ],
            UniverseCategory::Other => &[],
        }
    }

    /// Category a symbol belongs to, `Other` when it is in no named universe
    pub fn of(symbol: &str) -> Self {
        [
            UniverseCategory::TechAi,
            UniverseCategory::Space,
            UniverseCategory::Crypto,
            UniverseCategory::Defense,
        ]
        .into_iter()
        .find(|c| c.symbols().iter().any(|s| s.eq_ignore_ascii_case(symbol)))
        .unwrap_or(UniverseCategory::Other)
    }

    /// Every symbol of the named universes
    pub fn all_symbols() -> Vec<String> {
        [
            UniverseCategory::TechAi,
            UniverseCategory::Space,
            UniverseCategory::Crypto,
            UniverseCategory::Defense,
        ]
        .iter()
        .flat_map(|c| c.symbols().iter().map(|s| s.to_string()))
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanHit {
    pub symbol: String,
    pub category: UniverseCategory,
    pub score: u8,
    pub verdict: Verdict,
    pub last_close: Option<f64>,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub hits: Vec<ScanHit>,
    pub total_scanned: usize,
    pub skipped: usize,
    pub min_score: u8,
    pub timestamp: DateTime<Utc>,
}

pub struct MarketScanner<'a> {
    engine: &'a VerdictEngine,
    min_score: u8,
}

impl<'a> MarketScanner<'a> {
    pub fn new(engine: &'a VerdictEngine) -> Self {
        Self {
            engine,
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn scan(
        &self,
        snapshots: &[InstrumentSnapshot],
        weights: &WeightConfig,
    ) -> Result<ScanReport, ConfigurationError> {
        self.scan_at(snapshots, weights, Utc::now())
    }

    /// Score every snapshot in parallel and keep those at or above `min_score`,
    /// best first.
    pub fn scan_at(
        &self,
        snapshots: &[InstrumentSnapshot],
        weights: &WeightConfig,
        now: DateTime<Utc>,
    ) -> Result<ScanReport, ConfigurationError> {
        weights.validate()?;

        tracing::info!("Starting market scan of {} instruments", snapshots.len());

        let scored: Vec<Option<ScanHit>> = snapshots
            .par_iter()
            .map(|snap| {
                if snap.prices.len() <= MIN_SCAN_BARS {
                    tracing::debug!(
                        symbol = %snap.symbol,
                        bars = snap.prices.len(),
                        "skipping short history"
                    );
                    return Ok(None);
                }
                let result = self.engine.score_instrument_at(
                    &snap.prices,
                    &snap.fundamentals,
                    &snap.headlines,
                    weights,
                    now,
                )?;
                Ok(Some(ScanHit {
                    symbol: snap.symbol.clone(),
                    category: UniverseCategory::of(&snap.symbol),
                    score: result.score,
                    verdict: result.verdict,
                    last_close: result.intermediates.last_close,
                    reasons: result.reasons,
                }))
            })
            .collect::<Result<_, ConfigurationError>>()?;

        let skipped = scored.iter().filter(|hit| hit.is_none()).count();
        let mut hits: Vec<ScanHit> = scored
            .into_iter()
            .flatten()
            .filter(|hit| !matches!(hit.verdict, Verdict::Neutral) && hit.score >= self.min_score)
            .collect();

        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.symbol.cmp(&b.symbol)));

        tracing::info!(
            "Scan complete: {}/{} instruments at or above {}",
            hits.len(),
            snapshots.len(),
            self.min_score
        );

        Ok(ScanReport {
            hits,
            total_scanned: snapshots.len(),
            skipped,
            min_score: self.min_score,
            timestamp: now,
        })
    }
}

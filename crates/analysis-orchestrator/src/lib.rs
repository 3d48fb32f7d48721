//! Verdict engine: combines technical, fundamental and sentiment checks into
//! one bounded score and a verdict band.

use analysis_core::{
    ConfigurationError, Factor, FactorOutcome, FactorSignal, FundamentalSnapshot, Headline,
    Intermediates, PriceBar, Verdict, VerdictResult, WeightConfig,
};
use chrono::{DateTime, Utc};
use fundamental_analysis::{FundamentalAnalysisEngine, FundamentalAssessment, Valuation};
use sentiment_analysis::{SentimentAnalysisEngine, SentimentScore, DEFAULT_HEADLINE_LIMIT};
use serde::{Deserialize, Serialize};
use technical_analysis::{RsiZone, TechnicalAnalysisEngine, TechnicalReadings, TrendState};

pub mod compare;
pub mod radar;
pub mod screener;

pub use compare::{compare_instruments, MetricRow, PeerComparison};
pub use radar::build_radar;
pub use screener::{InstrumentSnapshot, MarketScanner, ScanHit, ScanReport, UniverseCategory};

/// Starting point of every score
pub const NEUTRAL_SCORE: f64 = 50.0;
pub const DEFAULT_MIN_HISTORY: usize = 200;
pub const INSUFFICIENT_HISTORY_REASON: &str = "insufficient history";

/// Tunable engine constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    /// Most recent headlines fed to the sentiment scorer
    pub headline_limit: usize,
    /// Bars required before anything is computed
    pub min_history: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            headline_limit: DEFAULT_HEADLINE_LIMIT,
            min_history: DEFAULT_MIN_HISTORY,
        }
    }
}

/// Running score plus the outcomes that produced it
struct ScoreCard {
    score: f64,
    factors: Vec<FactorOutcome>,
}

impl ScoreCard {
    fn new() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            factors: Vec::with_capacity(11),
        }
    }

    fn apply(&mut self, factor: Factor, signal: FactorSignal, weight: u32, detail: String) {
        let points = signal.points(weight) as f64;
        self.push(factor, signal, points, detail);
    }

    fn push(&mut self, factor: Factor, signal: FactorSignal, points: f64, detail: String) {
        self.score += points;
        let reason = format!("{}: {} {}", factor.label(), detail, points_tag(points));
        tracing::debug!(factor = factor.label(), ?signal, points, "factor evaluated");
        self.factors.push(FactorOutcome {
            factor,
            signal,
            points,
            reason,
        });
    }
}

fn points_tag(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("[{:+}]", points as i64)
    } else {
        format!("[{:+.1}]", points)
    }
}

/// Clamp to [0, 100] and drop the fraction
fn clamp_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).trunc() as u8
}

pub struct VerdictEngine {
    technical: TechnicalAnalysisEngine,
    fundamental: FundamentalAnalysisEngine,
    sentiment: SentimentAnalysisEngine,
    options: EngineOptions,
}

impl Default for VerdictEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl VerdictEngine {
    pub fn new() -> Self {
        Self {
            technical: TechnicalAnalysisEngine::new(),
            fundamental: FundamentalAnalysisEngine::new(),
            sentiment: SentimentAnalysisEngine::new(),
            options: EngineOptions::default(),
        }
    }

    pub fn with_options(options: EngineOptions) -> Result<Self, ConfigurationError> {
        Ok(Self {
            technical: TechnicalAnalysisEngine::new(),
            fundamental: FundamentalAnalysisEngine::new(),
            sentiment: SentimentAnalysisEngine::with_headline_limit(options.headline_limit)?,
            options,
        })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Score against the current wall clock
    pub fn score_instrument(
        &self,
        prices: &[PriceBar],
        fundamentals: &FundamentalSnapshot,
        headlines: &[Headline],
        weights: &WeightConfig,
    ) -> Result<VerdictResult, ConfigurationError> {
        self.score_instrument_at(prices, fundamentals, headlines, weights, Utc::now())
    }

    /// Score with headline ages measured from `now`
    pub fn score_instrument_at(
        &self,
        prices: &[PriceBar],
        fundamentals: &FundamentalSnapshot,
        headlines: &[Headline],
        weights: &WeightConfig,
        now: DateTime<Utc>,
    ) -> Result<VerdictResult, ConfigurationError> {
        if let Err(e) = weights.validate() {
            tracing::warn!("Rejected weight configuration: {}", e);
            return Err(e);
        }

        let readings = if prices.len() >= self.options.min_history {
            self.technical.readings(prices)
        } else {
            None
        };
        let readings = match readings {
            Some(r) => r,
            None => {
                tracing::info!(
                    bars = prices.len(),
                    required = self.options.min_history,
                    "Not enough history, returning neutral verdict"
                );
                return Ok(insufficient_history(prices));
            }
        };

        let assessment = self
            .fundamental
            .assess(fundamentals, readings.last_close, readings.period_return);
        let sentiment = self.sentiment.score(
            headlines,
            weights.news_positive,
            weights.news_negative,
            now,
        );

        let mut card = ScoreCard::new();
        score_technicals(&mut card, &readings, weights);
        score_fundamentals(&mut card, &assessment, fundamentals, weights);
        score_volume(&mut card, &readings, weights);
        score_sentiment(&mut card, &sentiment);
        score_momentum(&mut card, &readings, &assessment, fundamentals, weights);

        let raw_score = card.score;
        let score = clamp_score(raw_score);
        let verdict = Verdict::from_score(score);

        tracing::info!(
            score,
            raw_score,
            verdict = verdict.label(),
            "Scored instrument"
        );

        let intermediates = Intermediates {
            last_close: Some(readings.last_close),
            sma_50: readings.sma_50,
            sma_200: readings.sma_200,
            rsi: Some(readings.rsi),
            atr: readings.atr,
            volatility_ratio: Some(readings.volatility_ratio),
            macd: readings.macd,
            macd_signal: readings.macd_signal,
            volume_ratio: readings.volume_ratio,
            one_year_return: assessment.one_year_return,
            operating_margin: fundamentals.operating_margin,
            forward_pe: fundamentals.forward_pe,
            price_to_sales: fundamentals.price_to_sales,
            peg_ratio: fundamentals.peg_ratio,
            sector: fundamentals.sector.clone(),
            analyst_target: fundamentals.target_mean_price,
            analyst_upside_pct: assessment.analyst_upside_pct,
            sentiment_score: Some(sentiment.total),
            headlines_analyzed: sentiment.analyzed,
            raw_score,
        };

        let radar = build_radar(&readings, &assessment);
        let reasons = card.factors.iter().map(|f| f.reason.clone()).collect();

        Ok(VerdictResult {
            score,
            verdict,
            reasons,
            factors: card.factors,
            intermediates,
            radar: Some(radar),
        })
    }
}

/// Score with default engine options
pub fn score_instrument(
    prices: &[PriceBar],
    fundamentals: &FundamentalSnapshot,
    headlines: &[Headline],
    weights: &WeightConfig,
) -> Result<VerdictResult, ConfigurationError> {
    VerdictEngine::new().score_instrument(prices, fundamentals, headlines, weights)
}

fn insufficient_history(prices: &[PriceBar]) -> VerdictResult {
    let intermediates = Intermediates {
        last_close: prices.last().map(|b| b.close),
        raw_score: NEUTRAL_SCORE,
        ..Default::default()
    };
    VerdictResult {
        score: NEUTRAL_SCORE as u8,
        verdict: Verdict::Neutral,
        reasons: vec![INSUFFICIENT_HISTORY_REASON.to_string()],
        factors: vec![FactorOutcome {
            factor: Factor::History,
            signal: FactorSignal::Neutral,
            points: 0.0,
            reason: INSUFFICIENT_HISTORY_REASON.to_string(),
        }],
        intermediates,
        radar: None,
    }
}

fn score_technicals(card: &mut ScoreCard, r: &TechnicalReadings, weights: &WeightConfig) {
    let trend_detail = match r.trend() {
        TrendState::Bullish => "bullish, above SMA 50/200".to_string(),
        TrendState::Bearish => "bearish, below SMA 200".to_string(),
        TrendState::Consolidating => "neutral/consolidating".to_string(),
        TrendState::Incomplete => "incomplete data".to_string(),
    };
    card.apply(Factor::Trend, r.trend_signal(), weights.trend, trend_detail);

    let rsi_detail = match r.rsi_zone() {
        RsiZone::Overheated => format!("overheated ({:.1})", r.rsi),
        RsiZone::Oversold => format!("oversold ({:.1})", r.rsi),
        RsiZone::Neutral => format!("neutral ({:.1})", r.rsi),
    };
    card.apply(Factor::Rsi, r.rsi_signal(), weights.rsi, rsi_detail);

    let volatility_signal = r.volatility_signal();
    let volatility_detail = if volatility_signal == FactorSignal::Negative {
        format!("high ({:.1}% of price)", r.volatility_ratio)
    } else {
        format!("normal ({:.1}% of price)", r.volatility_ratio)
    };
    card.apply(Factor::Volatility, volatility_signal, weights.volatility, volatility_detail);
}

fn score_fundamentals(
    card: &mut ScoreCard,
    a: &FundamentalAssessment,
    snapshot: &FundamentalSnapshot,
    weights: &WeightConfig,
) {
    let margin_detail = match snapshot.operating_margin {
        Some(m) if a.margin.is_positive() => format!("strong operating margin ({:.1}%)", m * 100.0),
        Some(m) => format!("operating margin {:.1}%, below 15%", m * 100.0),
        None => "no data".to_string(),
    };
    card.apply(Factor::Margin, a.margin, weights.margin, margin_detail);

    let cash_detail = if a.balance_sheet.is_positive() {
        "more cash than debt".to_string()
    } else if snapshot.total_cash.is_none() && snapshot.total_debt.is_none() {
        "no data".to_string()
    } else {
        "debt exceeds cash".to_string()
    };
    card.apply(Factor::Cash, a.balance_sheet, weights.cash, cash_detail);

    let value_detail = match a.valuation {
        Valuation::AttractivePe(pe) => format!("forward P/E {:.1} under 18", pe),
        Valuation::AttractiveSales(ps) => format!("price/sales {:.2} under 3 (no usable P/E)", ps),
        Valuation::Expensive => "not attractive".to_string(),
        Valuation::NoData => "no data".to_string(),
    };
    card.apply(Factor::Value, a.valuation.signal(), weights.value, value_detail);
}

fn score_volume(card: &mut ScoreCard, r: &TechnicalReadings, weights: &WeightConfig) {
    let signal = r.volume_signal();
    let detail = match r.volume_ratio {
        Some(ratio) if signal.is_positive() => format!("spike ({:.2}x average)", ratio),
        Some(ratio) => format!("normal ({:.2}x average)", ratio),
        None => "no data".to_string(),
    };
    card.apply(Factor::Volume, signal, weights.volume, detail);
}

fn score_sentiment(card: &mut ScoreCard, s: &SentimentScore) {
    let signal = if s.total > 0.0 {
        FactorSignal::Positive
    } else if s.total < 0.0 {
        FactorSignal::Negative
    } else {
        FactorSignal::Neutral
    };
    let detail = format!(
        "{} headlines, {} positive, {} negative",
        s.analyzed, s.positive_hits, s.negative_hits
    );
    card.push(Factor::News, signal, s.total, detail);
}

fn score_momentum(
    card: &mut ScoreCard,
    r: &TechnicalReadings,
    a: &FundamentalAssessment,
    snapshot: &FundamentalSnapshot,
    weights: &WeightConfig,
) {
    let sector_detail = match a.one_year_return {
        Some(ret) if a.relative_strength.is_positive() => {
            format!("leader, {:+.1}% over the period", ret * 100.0)
        }
        Some(ret) => format!("{:+.1}% over the period", ret * 100.0),
        None => "no data".to_string(),
    };
    card.apply(Factor::Sector, a.relative_strength, weights.sector, sector_detail);

    let macd_signal = r.macd_signal_state();
    let macd_detail = if macd_signal.is_positive() {
        "bullish crossover".to_string()
    } else {
        "no bullish crossover".to_string()
    };
    card.apply(Factor::Macd, macd_signal, weights.macd, macd_detail);

    let peg_detail = match snapshot.peg_ratio {
        Some(peg) if a.peg.is_positive() => format!("{:.2} in growth-value range", peg),
        Some(peg) => format!("{:.2} outside 0.5-1.5", peg),
        None => "no data".to_string(),
    };
    card.apply(Factor::Peg, a.peg, weights.peg, peg_detail);
}

#[cfg(test)]
pub(crate) mod test_support {
    use analysis_core::{FundamentalSnapshot, PriceBar};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// 251 bars rising from 88 to 110 with a small zig-zag: bullish trend,
    /// neutral RSI, low volatility, flat volume, +25% over the period.
    pub fn bullish_series() -> Vec<PriceBar> {
        series_from(|i| 88.0 + 22.0 * i as f64 / 250.0 - if i % 2 == 1 { 0.6 } else { 0.0 }, 251)
    }

    /// Steady decline from 150 to 90
    pub fn bearish_series() -> Vec<PriceBar> {
        series_from(|i| 150.0 - 60.0 * i as f64 / 250.0, 251)
    }

    pub fn series_from(close: impl Fn(usize) -> f64, len: usize) -> Vec<PriceBar> {
        let start = now() - Duration::days(len as i64);
        (0..len)
            .map(|i| {
                let c = close(i);
                PriceBar {
                    timestamp: start + Duration::days(i as i64),
                    open: c,
                    high: c + 1.0,
                    low: c - 1.0,
                    close: c,
                    volume: 1_000_000.0,
                }
            })
            .collect()
    }

    pub fn strong_fundamentals() -> FundamentalSnapshot {
        FundamentalSnapshot {
            operating_margin: Some(0.20),
            total_cash: Some(500.0),
            total_debt: Some(100.0),
            forward_pe: Some(15.0),
            peg_ratio: Some(0.8),
            ..Default::default()
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trading period of OHLCV data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Point-in-time company fundamentals.
///
/// Every field is optional: an absent value means "no data" and disables only
/// the checks that need it. It is never read as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundamentalSnapshot {
    /// Operating margin as a ratio (0.20 = 20%)
    pub operating_margin: Option<f64>,
    pub total_cash: Option<f64>,
    pub total_debt: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    /// Price/sales, trailing twelve months
    pub price_to_sales: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub target_mean_price: Option<f64>,
    pub sector: Option<String>,
    /// Dividend per share per year
    pub dividend_rate: Option<f64>,
    pub dividend_yield: Option<f64>,
}

/// News headline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub title: String,
    /// `None` when the source did not report a publish time; scored as brand new.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Headline {
    pub fn new(title: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            published_at: Some(published_at),
        }
    }

    pub fn undated(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            published_at: None,
        }
    }
}

/// Tri-state outcome of a single factor check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorSignal {
    Positive,
    Negative,
    Neutral,
}

impl FactorSignal {
    pub fn is_positive(&self) -> bool {
        matches!(self, FactorSignal::Positive)
    }

    /// Signed contribution for a factor with the given weight
    pub fn points(&self, weight: u32) -> i64 {
        match self {
            FactorSignal::Positive => i64::from(weight),
            FactorSignal::Negative => -i64::from(weight),
            FactorSignal::Neutral => 0,
        }
    }
}

/// Scoring factors in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    History,
    Trend,
    Rsi,
    Volatility,
    Margin,
    Cash,
    Value,
    Volume,
    News,
    Sector,
    Macd,
    Peg,
}

impl Factor {
    pub fn label(&self) -> &'static str {
        match self {
            Factor::History => "History",
            Factor::Trend => "Trend",
            Factor::Rsi => "RSI",
            Factor::Volatility => "Volatility",
            Factor::Margin => "Margin",
            Factor::Cash => "Balance sheet",
            Factor::Value => "Valuation",
            Factor::Volume => "Volume",
            Factor::News => "News",
            Factor::Sector => "Relative strength",
            Factor::Macd => "MACD",
            Factor::Peg => "PEG",
        }
    }
}

/// Discrete verdict band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Star,
    StrongBuy,
    Buy,
    Hold,
    Sell,
    /// Only produced when the price history is too short to analyse
    Neutral,
}

impl Verdict {
    /// Map a clamped score to its band. Lower bounds are inclusive, first match wins.
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 95 => Verdict::Star,
            s if s >= 80 => Verdict::StrongBuy,
            s if s >= 60 => Verdict::Buy,
            s if s >= 35 => Verdict::Hold,
            _ => Verdict::Sell,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Star => "Star",
            Verdict::StrongBuy => "Strong Buy",
            Verdict::Buy => "Buy",
            Verdict::Hold => "Hold",
            Verdict::Sell => "Sell",
            Verdict::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One evaluated scoring step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorOutcome {
    pub factor: Factor,
    pub signal: FactorSignal,
    /// Signed points applied to the running score
    pub points: f64,
    pub reason: String,
}

/// Values computed along the way, for display only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Intermediates {
    pub last_close: Option<f64>,
    pub sma_50: Option<f64>,
    /// Trend-reversal level
    pub sma_200: Option<f64>,
    pub rsi: Option<f64>,
    pub atr: Option<f64>,
    /// ATR as a percentage of the last close
    pub volatility_ratio: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    /// Last volume divided by the 20-bar mean
    pub volume_ratio: Option<f64>,
    pub one_year_return: Option<f64>,
    pub operating_margin: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub sector: Option<String>,
    pub analyst_target: Option<f64>,
    pub analyst_upside_pct: Option<f64>,
    pub sentiment_score: Option<f64>,
    pub headlines_analyzed: usize,
    /// Score before clamping and truncation
    pub raw_score: f64,
}

/// Per-factor display scores in [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarProfile {
    pub trend: f64,
    pub rsi: f64,
    pub stability: f64,
    pub margin: f64,
    pub balance: f64,
    pub value: f64,
    pub growth: f64,
    pub momentum: f64,
    pub relative_strength: f64,
    pub macd: f64,
}

impl RadarProfile {
    /// Axis labels paired with their values, in display order
    pub fn axes(&self) -> [(&'static str, f64); 10] {
        [
            ("Trend", self.trend),
            ("RSI", self.rsi),
            ("Stability", self.stability),
            ("Margin", self.margin),
            ("Balance", self.balance),
            ("Value", self.value),
            ("Growth", self.growth),
            ("Momentum", self.momentum),
            ("Rel. Strength", self.relative_strength),
            ("MACD", self.macd),
        ]
    }
}

/// Output of a scoring call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictResult {
    /// Clamped to [0, 100]
    pub score: u8,
    pub verdict: Verdict,
    /// Human-readable reasons in evaluation order
    pub reasons: Vec<String>,
    pub factors: Vec<FactorOutcome>,
    pub intermediates: Intermediates,
    pub radar: Option<RadarProfile>,
}

impl VerdictResult {
    pub fn verdict_label(&self) -> &'static str {
        self.verdict.label()
    }

    /// True for the short-history sentinel result
    pub fn is_insufficient_data(&self) -> bool {
        self.verdict == Verdict::Neutral
    }
}

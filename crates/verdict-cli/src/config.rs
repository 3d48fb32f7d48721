use analysis_core::WeightConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Per-factor overrides applied on top of the base weights
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightOverrides {
    pub trend: Option<u32>,
    pub rsi: Option<u32>,
    pub volatility: Option<u32>,
    pub margin: Option<u32>,
    pub cash: Option<u32>,
    pub value: Option<u32>,
    pub volume: Option<u32>,
    pub news_positive: Option<u32>,
    pub sector: Option<u32>,
    pub macd: Option<u32>,
    pub peg: Option<u32>,
    pub news_negative: Option<u32>,
}

impl WeightOverrides {
    pub fn apply(&self, base: WeightConfig) -> WeightConfig {
        WeightConfig {
            trend: self.trend.unwrap_or(base.trend),
            rsi: self.rsi.unwrap_or(base.rsi),
            volatility: self.volatility.unwrap_or(base.volatility),
            margin: self.margin.unwrap_or(base.margin),
            cash: self.cash.unwrap_or(base.cash),
            value: self.value.unwrap_or(base.value),
            volume: self.volume.unwrap_or(base.volume),
            news_positive: self.news_positive.unwrap_or(base.news_positive),
            sector: self.sector.unwrap_or(base.sector),
            macd: self.macd.unwrap_or(base.macd),
            peg: self.peg.unwrap_or(base.peg),
            news_negative: self.news_negative.unwrap_or(base.news_negative),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory holding one `<SYMBOL>.json` snapshot per instrument
    pub data_dir: String,
    /// Optional JSON weight file; missing fields keep their defaults
    pub weights_file: Option<String>,
    pub overrides: WeightOverrides,
    pub headline_limit: usize,
    pub scan_min_score: u8,
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn parse_optional<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let overrides = WeightOverrides {
            trend: parse_optional(&lookup, "WEIGHT_TREND")?,
            rsi: parse_optional(&lookup, "WEIGHT_RSI")?,
            volatility: parse_optional(&lookup, "WEIGHT_VOLATILITY")?,
            margin: parse_optional(&lookup, "WEIGHT_MARGIN")?,
            cash: parse_optional(&lookup, "WEIGHT_CASH")?,
            value: parse_optional(&lookup, "WEIGHT_VALUE")?,
            volume: parse_optional(&lookup, "WEIGHT_VOLUME")?,
            news_positive: parse_optional(&lookup, "WEIGHT_NEWS_POSITIVE")?,
            sector: parse_optional(&lookup, "WEIGHT_SECTOR")?,
            macd: parse_optional(&lookup, "WEIGHT_MACD")?,
            peg: parse_optional(&lookup, "WEIGHT_PEG")?,
            news_negative: parse_optional(&lookup, "WEIGHT_NEWS_NEGATIVE")?,
        };

        Ok(Self {
            data_dir: lookup("DATA_DIR").unwrap_or_else(|| "data".to_string()),
            weights_file: lookup("WEIGHTS_FILE").filter(|s| !s.trim().is_empty()),
            overrides,
            headline_limit: parse_var(&lookup, "HEADLINE_LIMIT", 5)?,
            scan_min_score: parse_var(&lookup, "SCAN_MIN_SCORE", 90)?,
        })
    }

    /// Weight file (or defaults) with the environment overrides on top.
    /// Budget validation is left to the engine.
    pub async fn load_weights(&self) -> Result<WeightConfig> {
        let base = match &self.weights_file {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read weights file {}", path))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse weights file {}", path))?
            }
            None => WeightConfig::default(),
        };
        Ok(self.overrides.apply(base))
    }
}

use analysis_core::{FactorSignal, PriceBar};
use serde::{Deserialize, Serialize};

use crate::indicators::*;

pub const SMA_SHORT: usize = 50;
pub const SMA_LONG: usize = 200;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const VOLUME_LOOKBACK: usize = 20;

pub const RSI_OVERHEATED: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
/// Volatility ratio (ATR % of price) above which the penalty applies
pub const HIGH_VOLATILITY_PCT: f64 = 4.0;
pub const VOLUME_SPIKE_MULTIPLIER: f64 = 1.3;

/// Price position against the 50/200 SMAs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendState {
    /// close > SMA50 > SMA200
    Bullish,
    /// close < SMA200
    Bearish,
    Consolidating,
    /// One of the SMAs has no full window
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Overheated,
    Oversold,
    Neutral,
}

/// Last-bar readings of every indicator the verdict engine consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalReadings {
    pub last_close: f64,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi: f64,
    pub atr: Option<f64>,
    /// 0.0 when ATR cannot be computed
    pub volatility_ratio: f64,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_bullish: bool,
    pub volume_ratio: Option<f64>,
    /// First-to-last close return over the supplied history
    pub period_return: Option<f64>,
}

impl TechnicalReadings {
    pub fn trend(&self) -> TrendState {
        match (self.sma_50, self.sma_200) {
            (Some(s50), Some(s200)) => {
                if self.last_close > s50 && s50 > s200 {
                    TrendState::Bullish
                } else if self.last_close < s200 {
                    TrendState::Bearish
                } else {
                    TrendState::Consolidating
                }
            }
            _ => TrendState::Incomplete,
        }
    }

    pub fn trend_signal(&self) -> FactorSignal {
        match self.trend() {
            TrendState::Bullish => FactorSignal::Positive,
            TrendState::Bearish => FactorSignal::Negative,
            TrendState::Consolidating | TrendState::Incomplete => FactorSignal::Neutral,
        }
    }

    pub fn rsi_zone(&self) -> RsiZone {
        if self.rsi > RSI_OVERHEATED {
            RsiZone::Overheated
        } else if self.rsi < RSI_OVERSOLD {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }

    /// Overheated is bearish, oversold is bullish
    pub fn rsi_signal(&self) -> FactorSignal {
        match self.rsi_zone() {
            RsiZone::Overheated => FactorSignal::Negative,
            RsiZone::Oversold => FactorSignal::Positive,
            RsiZone::Neutral => FactorSignal::Neutral,
        }
    }

    /// Penalty-only: never positive
    pub fn volatility_signal(&self) -> FactorSignal {
        if self.volatility_ratio > HIGH_VOLATILITY_PCT {
            FactorSignal::Negative
        } else {
            FactorSignal::Neutral
        }
    }

    pub fn volume_signal(&self) -> FactorSignal {
        match self.volume_ratio {
            Some(r) if r > VOLUME_SPIKE_MULTIPLIER => FactorSignal::Positive,
            _ => FactorSignal::Neutral,
        }
    }

    pub fn macd_signal_state(&self) -> FactorSignal {
        if self.macd_bullish {
            FactorSignal::Positive
        } else {
            FactorSignal::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalAnalysisEngine;

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute all readings from an ordered bar series. `None` for an empty series.
    pub fn readings(&self, bars: &[PriceBar]) -> Option<TechnicalReadings> {
        let last_close = bars.last()?.close;
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let macd_result = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
        let atr_values = atr(bars, ATR_PERIOD);

        Some(TechnicalReadings {
            last_close,
            sma_50: last_sma(&closes, SMA_SHORT),
            sma_200: last_sma(&closes, SMA_LONG),
            rsi: rsi(&closes, RSI_PERIOD),
            atr: atr_values.last().copied(),
            volatility_ratio: volatility_ratio(bars, ATR_PERIOD).unwrap_or(0.0),
            macd: macd_result.last_macd(),
            macd_signal: macd_result.last_signal(),
            macd_bullish: macd_result.is_bullish(),
            volume_ratio: volume_ratio(&volumes, VOLUME_LOOKBACK),
            period_return: period_return(&closes),
        })
    }
}

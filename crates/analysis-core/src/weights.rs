//! Per-factor point values for the verdict engine.
//!
//! The eleven budget weights share a ceiling of [`MAX_BUDGET`] points. The
//! negative-news weight is a per-headline penalty and sits outside the budget.
//! Older factor sets (eight factors, nine factors) are expressed by zeroing the
//! factors they lacked rather than by separate scoring code.

use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// Upper bound for the sum of the budget weights
pub const MAX_BUDGET: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightConfig {
    pub trend: u32,
    pub rsi: u32,
    pub volatility: u32,
    pub margin: u32,
    pub cash: u32,
    pub value: u32,
    pub volume: u32,
    pub news_positive: u32,
    pub sector: u32,
    pub macd: u32,
    pub peg: u32,
    /// Penalty per negative headline, not part of the budget
    pub news_negative: u32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            trend: 15,
            rsi: 10,
            volatility: 5,
            margin: 10,
            cash: 5,
            value: 10,
            volume: 10,
            news_positive: 5,
            sector: 10,
            macd: 5,
            peg: 5,
            news_negative: 7,
        }
    }
}

impl WeightConfig {
    /// Every factor switched off
    pub fn neutral() -> Self {
        Self {
            trend: 0,
            rsi: 0,
            volatility: 0,
            margin: 0,
            cash: 0,
            value: 0,
            volume: 0,
            news_positive: 0,
            sector: 0,
            macd: 0,
            peg: 0,
            news_negative: 0,
        }
    }

    /// Eight-factor strategy: no sector, MACD or PEG points
    pub fn eight_factor() -> Self {
        Self {
            sector: 0,
            macd: 0,
            peg: 0,
            ..Self::default()
        }
    }

    /// Sum of the eleven budget weights, widened so it cannot overflow
    pub fn budget_total(&self) -> u64 {
        [
            self.trend,
            self.rsi,
            self.volatility,
            self.margin,
            self.cash,
            self.value,
            self.volume,
            self.news_positive,
            self.sector,
            self.macd,
            self.peg,
        ]
        .iter()
        .map(|&w| u64::from(w))
        .sum()
    }

    /// Points still available under the budget
    pub fn budget_remaining(&self) -> u32 {
        let remaining = u64::from(MAX_BUDGET).saturating_sub(self.budget_total());
        u32::try_from(remaining).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let total = self.budget_total();
        if total > u64::from(MAX_BUDGET) {
            return Err(ConfigurationError::BudgetExceeded {
                total,
                max: MAX_BUDGET,
            });
        }
        Ok(())
    }
}

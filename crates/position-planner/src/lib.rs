use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub mod dividend;

pub use dividend::{DividendProjection, DividendSource};

/// Stop-loss / take-profit planner for a fixed investment amount.
///
/// Risk and profit are measured against the invested amount:
///   risk   = invest * stop_loss_pct / 100
///   profit = invest * take_profit_pct / 100
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionPlanner {
    /// Distance to the stop below entry, in percent (0, 100]
    pub stop_loss_pct: f64,

    /// Distance to the target above entry, in percent (0, 1000]
    pub take_profit_pct: f64,
}

/// Planned position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionPlan {
    /// Whole shares affordable with the investment amount
    pub shares: u64,

    pub stop_loss_price: f64,
    pub take_profit_price: f64,

    /// Amount lost if the stop is hit
    pub risk_amount: f64,

    /// Amount gained if the target is hit
    pub profit_amount: f64,

    /// profit / risk, 0 when nothing is at risk
    pub reward_risk: f64,
}

/// Share count from a fixed-fraction risk budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBudgetSize {
    pub shares: u64,
    pub max_loss: f64,
    pub total_cost: f64,
}

impl Default for PositionPlanner {
    fn default() -> Self {
        Self {
            stop_loss_pct: 5.0,
            take_profit_pct: 15.0,
        }
    }
}

impl PositionPlanner {
    pub fn new(stop_loss_pct: f64, take_profit_pct: f64) -> Result<Self> {
        if !(stop_loss_pct > 0.0 && stop_loss_pct <= 100.0) {
            bail!("stop_loss_pct must be in (0, 100], got {}", stop_loss_pct);
        }
        if !(take_profit_pct > 0.0 && take_profit_pct <= 1000.0) {
            bail!("take_profit_pct must be in (0, 1000], got {}", take_profit_pct);
        }

        Ok(Self {
            stop_loss_pct,
            take_profit_pct,
        })
    }

    pub fn plan(&self, invest_amount: f64, price: f64) -> Result<PositionPlan> {
        if !(price > 0.0) {
            bail!("price must be positive, got {}", price);
        }
        if !(invest_amount >= 0.0) || !invest_amount.is_finite() {
            bail!("invest_amount must be a non-negative amount, got {}", invest_amount);
        }

        let shares = (invest_amount / price).floor() as u64;
        let risk_amount = invest_amount * self.stop_loss_pct / 100.0;
        let profit_amount = invest_amount * self.take_profit_pct / 100.0;
        let reward_risk = if risk_amount > 0.0 {
            profit_amount / risk_amount
        } else {
            0.0
        };

        tracing::debug!(shares, risk_amount, profit_amount, reward_risk, "position planned");

        Ok(PositionPlan {
            shares,
            stop_loss_price: price * (1.0 - self.stop_loss_pct / 100.0),
            take_profit_price: price * (1.0 + self.take_profit_pct / 100.0),
            risk_amount,
            profit_amount,
            reward_risk,
        })
    }
}

/// Size a position so that hitting `stop_price` loses `risk_pct` of `account_value`.
pub fn size_by_risk(
    account_value: f64,
    risk_pct: f64,
    entry_price: f64,
    stop_price: f64,
) -> Result<RiskBudgetSize> {
    if !(account_value > 0.0) {
        bail!("account_value must be positive");
    }
    if !(risk_pct > 0.0 && risk_pct <= 100.0) {
        bail!("risk_pct must be in (0, 100]");
    }
    if entry_price <= stop_price {
        bail!("entry price {} must be above stop price {}", entry_price, stop_price);
    }

    let max_loss = account_value * risk_pct / 100.0;
    let shares = (max_loss / (entry_price - stop_price)).floor() as u64;

    Ok(RiskBudgetSize {
        shares,
        max_loss,
        total_cost: shares as f64 * entry_price,
    })
}

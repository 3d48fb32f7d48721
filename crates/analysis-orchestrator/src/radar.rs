//! Radar profile
//!
//! Normalised per-factor display scores in [0, 1]. Purely presentational: the
//! verdict score never reads these values.

use analysis_core::{FactorSignal, RadarProfile};
use fundamental_analysis::FundamentalAssessment;
use technical_analysis::{RsiZone, TechnicalReadings, TrendState};

const STRONG: f64 = 1.0;
const MIDDLE: f64 = 0.5;
/// Fundamental check did not pass (or had no data)
const SOFT: f64 = 0.4;
const WEAK: f64 = 0.2;

fn pass_or(signal: FactorSignal, otherwise: f64) -> f64 {
    if signal.is_positive() {
        STRONG
    } else {
        otherwise
    }
}

pub fn build_radar(
    readings: &TechnicalReadings,
    assessment: &FundamentalAssessment,
) -> RadarProfile {
    let trend = match readings.trend() {
        TrendState::Bullish => STRONG,
        TrendState::Bearish => 0.0,
        TrendState::Consolidating | TrendState::Incomplete => MIDDLE,
    };

    let rsi = match readings.rsi_zone() {
        RsiZone::Overheated => WEAK,
        RsiZone::Oversold => STRONG,
        RsiZone::Neutral => MIDDLE,
    };

    let stability = if readings.volatility_signal() == FactorSignal::Negative {
        WEAK
    } else {
        STRONG
    };

    RadarProfile {
        trend,
        rsi,
        stability,
        margin: pass_or(assessment.margin, SOFT),
        balance: pass_or(assessment.balance_sheet, SOFT),
        value: pass_or(assessment.valuation.signal(), SOFT),
        growth: pass_or(assessment.peg, MIDDLE),
        momentum: pass_or(readings.volume_signal(), MIDDLE),
        relative_strength: pass_or(assessment.relative_strength, SOFT),
        macd: pass_or(readings.macd_signal_state(), SOFT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundamental_analysis::Valuation;

    fn readings() -> TechnicalReadings {
        TechnicalReadings {
            last_close: 110.0,
            sma_50: Some(105.0),
            sma_200: Some(95.0),
            rsi: 75.0,
            atr: Some(6.0),
            volatility_ratio: 5.5,
            macd: Some(1.0),
            macd_signal: Some(0.5),
            macd_bullish: true,
            volume_ratio: Some(1.0),
            period_return: Some(0.1),
        }
    }

    fn assessment() -> FundamentalAssessment {
        FundamentalAssessment {
            margin: FactorSignal::Positive,
            balance_sheet: FactorSignal::Neutral,
            valuation: Valuation::AttractiveSales(2.0),
            peg: FactorSignal::Neutral,
            relative_strength: FactorSignal::Neutral,
            one_year_return: Some(0.1),
            analyst_upside_pct: None,
        }
    }

    #[test]
    fn test_radar_values() {
        let radar = build_radar(&readings(), &assessment());
        assert_eq!(radar.trend, 1.0);
        assert_eq!(radar.rsi, 0.2);
        assert_eq!(radar.stability, 0.2);
        assert_eq!(radar.margin, 1.0);
        assert_eq!(radar.balance, 0.4);
        assert_eq!(radar.value, 1.0);
        assert_eq!(radar.growth, 0.5);
        assert_eq!(radar.momentum, 0.5);
        assert_eq!(radar.relative_strength, 0.4);
        assert_eq!(radar.macd, 1.0);
    }

    #[test]
    fn test_radar_values_stay_in_unit_range() {
        let radar = build_radar(&readings(), &assessment());
        assert!(radar.axes().iter().all(|(_, v)| (0.0..=1.0).contains(v)));
    }
}

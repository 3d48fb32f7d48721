//! Threshold checks against a [`FundamentalSnapshot`].
//!
//! Each check is independent and returns a [`FactorSignal`]. A missing field
//! disables the check (neutral); it is never treated as a weak fundamental.

use analysis_core::{FactorSignal, FundamentalSnapshot};
use serde::{Deserialize, Serialize};

pub const MIN_OPERATING_MARGIN: f64 = 0.15;
pub const MAX_FORWARD_PE: f64 = 18.0;
pub const MAX_PRICE_TO_SALES: f64 = 3.0;
pub const PEG_LOWER: f64 = 0.5;
pub const PEG_UPPER: f64 = 1.5;
/// One-year return needed to count as a relative-strength leader
pub const MIN_RELATIVE_RETURN: f64 = 0.20;

/// Outcome of the two-path valuation check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Valuation {
    /// Forward P/E in (0, 18)
    AttractivePe(f64),
    /// No usable P/E, price/sales in (0, 3)
    AttractiveSales(f64),
    /// Data present but neither path qualifies
    Expensive,
    /// Neither P/E nor price/sales reported
    NoData,
}

impl Valuation {
    pub fn signal(&self) -> FactorSignal {
        match self {
            Valuation::AttractivePe(_) | Valuation::AttractiveSales(_) => FactorSignal::Positive,
            Valuation::Expensive | Valuation::NoData => FactorSignal::Neutral,
        }
    }
}

/// All fundamental checks for one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalAssessment {
    pub margin: FactorSignal,
    pub balance_sheet: FactorSignal,
    pub valuation: Valuation,
    pub peg: FactorSignal,
    pub relative_strength: FactorSignal,
    pub one_year_return: Option<f64>,
    pub analyst_upside_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FundamentalAnalysisEngine;

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn margin_check(&self, snapshot: &FundamentalSnapshot) -> FactorSignal {
        match snapshot.operating_margin {
            Some(margin) if margin > MIN_OPERATING_MARGIN => FactorSignal::Positive,
            _ => FactorSignal::Neutral,
        }
    }

    /// Net cash. A single missing side counts as zero; both missing is no data.
    pub fn balance_sheet_check(&self, snapshot: &FundamentalSnapshot) -> FactorSignal {
        if snapshot.total_cash.is_none() && snapshot.total_debt.is_none() {
            return FactorSignal::Neutral;
        }
        let cash = snapshot.total_cash.unwrap_or(0.0);
        let debt = snapshot.total_debt.unwrap_or(0.0);
        if cash > debt {
            FactorSignal::Positive
        } else {
            FactorSignal::Neutral
        }
    }

    /// Forward P/E first. Price/sales is only consulted when P/E is absent or
    /// non-positive, so loss-making growth companies still get a valuation.
    pub fn valuation_check(&self, snapshot: &FundamentalSnapshot) -> Valuation {
        if let Some(pe) = snapshot.forward_pe {
            if pe > 0.0 && pe < MAX_FORWARD_PE {
                return Valuation::AttractivePe(pe);
            }
        }

        let pe_unusable = snapshot.forward_pe.map_or(true, |pe| pe <= 0.0);
        if pe_unusable {
            if let Some(ps) = snapshot.price_to_sales {
                if ps > 0.0 && ps < MAX_PRICE_TO_SALES {
                    return Valuation::AttractiveSales(ps);
                }
            }
        }

        if snapshot.forward_pe.is_none() && snapshot.price_to_sales.is_none() {
            Valuation::NoData
        } else {
            Valuation::Expensive
        }
    }

    pub fn peg_check(&self, snapshot: &FundamentalSnapshot) -> FactorSignal {
        match snapshot.peg_ratio {
            Some(peg) if peg > PEG_LOWER && peg < PEG_UPPER => FactorSignal::Positive,
            _ => FactorSignal::Neutral,
        }
    }

    /// `period_return` is the first-to-last close return of the price history
    pub fn relative_strength_check(&self, period_return: Option<f64>) -> FactorSignal {
        match period_return {
            Some(ret) if ret > MIN_RELATIVE_RETURN => FactorSignal::Positive,
            _ => FactorSignal::Neutral,
        }
    }

    /// Percentage distance from the last close to the mean analyst target
    pub fn analyst_upside_pct(
        &self,
        snapshot: &FundamentalSnapshot,
        last_close: f64,
    ) -> Option<f64> {
        let target = snapshot.target_mean_price?;
        if last_close <= 0.0 || target <= 0.0 {
            return None;
        }
        Some((target / last_close - 1.0) * 100.0)
    }

    pub fn assess(
        &self,
        snapshot: &FundamentalSnapshot,
        last_close: f64,
        period_return: Option<f64>,
    ) -> FundamentalAssessment {
        FundamentalAssessment {
            margin: self.margin_check(snapshot),
            balance_sheet: self.balance_sheet_check(snapshot),
            valuation: self.valuation_check(snapshot),
            peg: self.peg_check(snapshot),
            relative_strength: self.relative_strength_check(period_return),
            one_year_return: period_return,
            analyst_upside_pct: self.analyst_upside_pct(snapshot, last_close),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> FundamentalAnalysisEngine {
        FundamentalAnalysisEngine::new()
    }

    #[test]
    fn test_margin_check() {
        let mut snap = FundamentalSnapshot::default();
        assert_eq!(engine().margin_check(&snap), FactorSignal::Neutral);

        snap.operating_margin = Some(0.15);
        assert_eq!(engine().margin_check(&snap), FactorSignal::Neutral);

        snap.operating_margin = Some(0.20);
        assert_eq!(engine().margin_check(&snap), FactorSignal::Positive);

        // a reported zero margin is data, but still not a penalty
        snap.operating_margin = Some(0.0);
        assert_eq!(engine().margin_check(&snap), FactorSignal::Neutral);
    }

    #[test]
    fn test_balance_sheet_check() {
        let mut snap = FundamentalSnapshot::default();
        assert_eq!(engine().balance_sheet_check(&snap), FactorSignal::Neutral);

        snap.total_cash = Some(500.0);
        snap.total_debt = Some(100.0);
        assert_eq!(engine().balance_sheet_check(&snap), FactorSignal::Positive);

        snap.total_debt = Some(500.0);
        assert_eq!(engine().balance_sheet_check(&snap), FactorSignal::Neutral);

        // debt not reported counts as zero debt
        snap.total_debt = None;
        assert_eq!(engine().balance_sheet_check(&snap), FactorSignal::Positive);

        snap.total_cash = None;
        snap.total_debt = Some(10.0);
        assert_eq!(engine().balance_sheet_check(&snap), FactorSignal::Neutral);
    }

    #[test]
    fn test_valuation_forward_pe_path() {
        let snap = FundamentalSnapshot {
            forward_pe: Some(15.0),
            price_to_sales: Some(10.0),
            ..Default::default()
        };
        assert_eq!(engine().valuation_check(&snap), Valuation::AttractivePe(15.0));
    }

    #[test]
    fn test_valuation_expensive_pe_does_not_fall_back() {
        let snap = FundamentalSnapshot {
            forward_pe: Some(40.0),
            price_to_sales: Some(1.0),
            ..Default::default()
        };
        assert_eq!(engine().valuation_check(&snap), Valuation::Expensive);
        assert_eq!(engine().valuation_check(&snap).signal(), FactorSignal::Neutral);
    }

    #[test]
    fn test_valuation_price_to_sales_fallback() {
        let missing_pe = FundamentalSnapshot {
            price_to_sales: Some(2.0),
            ..Default::default()
        };
        assert_eq!(engine().valuation_check(&missing_pe), Valuation::AttractiveSales(2.0));

        let negative_pe = FundamentalSnapshot {
            forward_pe: Some(-12.0),
            price_to_sales: Some(2.5),
            ..Default::default()
        };
        assert_eq!(engine().valuation_check(&negative_pe).signal(), FactorSignal::Positive);

        let zero_pe = FundamentalSnapshot {
            forward_pe: Some(0.0),
            price_to_sales: Some(3.0),
            ..Default::default()
        };
        assert_eq!(engine().valuation_check(&zero_pe), Valuation::Expensive);
    }

    #[test]
    fn test_valuation_no_data() {
        assert_eq!(
            engine().valuation_check(&FundamentalSnapshot::default()),
            Valuation::NoData
        );
    }

    #[test]
    fn test_peg_check_is_exclusive() {
        let mut snap = FundamentalSnapshot::default();
        assert_eq!(engine().peg_check(&snap), FactorSignal::Neutral);
        snap.peg_ratio = Some(0.5);
        assert_eq!(engine().peg_check(&snap), FactorSignal::Neutral);
        snap.peg_ratio = Some(0.8);
        assert_eq!(engine().peg_check(&snap), FactorSignal::Positive);
        snap.peg_ratio = Some(1.5);
        assert_eq!(engine().peg_check(&snap), FactorSignal::Neutral);
    }

    #[test]
    fn test_relative_strength() {
        assert_eq!(engine().relative_strength_check(Some(0.25)), FactorSignal::Positive);
        // threshold is exclusive
        assert_eq!(engine().relative_strength_check(Some(0.20)), FactorSignal::Neutral);
        assert_eq!(engine().relative_strength_check(Some(-0.3)), FactorSignal::Neutral);
        assert_eq!(engine().relative_strength_check(None), FactorSignal::Neutral);
    }

    #[test]
    fn test_analyst_upside() {
        let snap = FundamentalSnapshot {
            target_mean_price: Some(120.0),
            ..Default::default()
        };
        let upside = engine().analyst_upside_pct(&snap, 100.0).unwrap();
        assert!((upside - 20.0).abs() < 1e-9);
        assert!(engine().analyst_upside_pct(&FundamentalSnapshot::default(), 100.0).is_none());
    }

    #[test]
    fn test_assess_empty_snapshot_is_all_neutral() {
        let a = engine().assess(&FundamentalSnapshot::default(), 101.0, Some(0.01));
        assert_eq!(a.margin, FactorSignal::Neutral);
        assert_eq!(a.balance_sheet, FactorSignal::Neutral);
        assert_eq!(a.valuation, Valuation::NoData);
        assert_eq!(a.peg, FactorSignal::Neutral);
        assert_eq!(a.relative_strength, FactorSignal::Neutral);
        assert!(a.analyst_upside_pct.is_none());
        assert_eq!(a.one_year_return, Some(0.01));
    }

    #[test]
    fn test_assess_passes_period_return_through() {
        let snap = FundamentalSnapshot {
            target_mean_price: Some(110.0),
            ..Default::default()
        };
        let a = engine().assess(&snap, 100.0, Some(0.3));
        assert_eq!(a.relative_strength, FactorSignal::Positive);
        assert_eq!(a.one_year_return, Some(0.3));
        assert!((a.analyst_upside_pct.unwrap() - 10.0).abs() < 1e-9);
    }
}

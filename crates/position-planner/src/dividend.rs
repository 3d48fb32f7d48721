use serde::{Deserialize, Serialize};

/// Where the projected rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DividendSource {
    /// Reported dividend per share
    Rate,
    /// Derived from the reported yield and the current price
    Yield,
    /// Nothing reported
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendProjection {
    /// Yield as a ratio (0.03 = 3%)
    pub dividend_yield: f64,
    /// Annual dividend per share
    pub rate_per_share: f64,
    pub annual_payout: f64,
    pub monthly_payout: f64,
    pub source: DividendSource,
}

impl DividendProjection {
    /// Project payouts for `shares` at `price`.
    ///
    /// A reported rate takes precedence over a reported yield. Non-positive
    /// values count as not reported.
    pub fn project(
        dividend_rate: Option<f64>,
        dividend_yield: Option<f64>,
        price: f64,
        shares: u64,
    ) -> Self {
        let rate = dividend_rate.filter(|r| *r > 0.0);
        let reported_yield = dividend_yield.filter(|y| *y > 0.0);

        let dividend_yield = match (rate, reported_yield) {
            (Some(r), _) if price > 0.0 => r / price,
            (_, Some(y)) => y,
            _ => 0.0,
        };

        let (rate_per_share, source) = match (rate, reported_yield) {
            (Some(r), _) => (r, DividendSource::Rate),
            (None, Some(y)) if price > 0.0 => (y * price, DividendSource::Yield),
            _ => (0.0, DividendSource::None),
        };

        let annual_payout = shares as f64 * rate_per_share;

        Self {
            dividend_yield,
            rate_per_share,
            annual_payout,
            monthly_payout: annual_payout / 12.0,
            source,
        }
    }

    pub fn pays_dividend(&self) -> bool {
        self.rate_per_share > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_projection_from_rate() {
        let p = DividendProjection::project(Some(2.4), Some(0.01), 80.0, 100);
        assert_eq!(p.source, DividendSource::Rate);
        assert_relative_eq!(p.dividend_yield, 0.03, epsilon = 1e-12);
        assert_relative_eq!(p.annual_payout, 240.0, epsilon = 1e-9);
        assert_relative_eq!(p.monthly_payout, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_projection_from_yield_only() {
        let p = DividendProjection::project(None, Some(0.05), 40.0, 10);
        assert_eq!(p.source, DividendSource::Yield);
        assert_relative_eq!(p.dividend_yield, 0.05, epsilon = 1e-12);
        assert_relative_eq!(p.rate_per_share, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.annual_payout, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_dividend() {
        let p = DividendProjection::project(None, None, 40.0, 10);
        assert!(!p.pays_dividend());
        assert_eq!(p.source, DividendSource::None);
        assert_eq!(p.annual_payout, 0.0);

        let zero = DividendProjection::project(Some(0.0), Some(0.0), 40.0, 10);
        assert!(!zero.pays_dividend());
    }
}

#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use analysis_core::PriceBar;
    use chrono::{Duration, TimeZone, Utc};

    fn bar(i: usize, high: f64, low: f64, close: f64, volume: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::days(i as i64),
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| bar(i, c + 1.0, c - 1.0, c, 1_000_000.0))
            .collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 1e-12);
        assert!((result[1] - 3.0).abs() < 1e-12);
        assert!((result[2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_sma_requires_full_window() {
        let data = vec![1.0, 2.0];
        assert!(sma(&data, 5).is_empty());
        assert!(last_sma(&data, 5).is_none());
        assert!(sma(&data, 0).is_empty());
    }

    #[test]
    fn test_last_sma_uses_trailing_window() {
        let data: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        // mean of 6..=10
        assert_eq!(last_sma(&data, 5), Some(8.0));
    }

    #[test]
    fn test_ema_is_recursive_and_unadjusted() {
        // span 3 => alpha 0.5
        let result = ema(&[1.0, 2.0, 3.0], 3);
        assert_eq!(result.len(), 3);
        assert!((result[0] - 1.0).abs() < 1e-12);
        assert!((result[1] - 1.5).abs() < 1e-12);
        assert!((result[2] - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_ema_constant_series() {
        let result = ema(&[42.0; 30], 12);
        assert!(result.iter().all(|v| (v - 42.0).abs() < 1e-12));
    }

    #[test]
    fn test_ema_empty_data() {
        assert!(ema(&[], 5).is_empty());
    }

    #[test]
    fn test_rsi_monotonic_increase_is_100() {
        let data: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let value = rsi(&data, 14);
        assert!(value.is_finite());
        assert!((value - 100.0).abs() < 1e-6, "rsi = {}", value);
    }

    #[test]
    fn test_rsi_monotonic_decrease_is_0() {
        let data: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        assert!(rsi(&data, 14).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_short_series_is_neutral() {
        let data: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&data, 14), NEUTRAL_RSI);
    }

    #[test]
    fn test_rsi_flat_series_is_zero() {
        // no gains over the epsilon-guarded zero loss
        assert_eq!(rsi(&[50.0; 30], 14), 0.0);
    }

    #[test]
    fn test_rsi_uses_simple_means() {
        // one gain of 2, one loss of 1 => RS 2 => RSI 66.67
        let value = rsi(&[1.0, 3.0, 2.0], 2);
        assert!((value - 200.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_rsi_only_reads_last_window() {
        // early crash followed by 15 up days
        let mut data = vec![200.0, 100.0];
        data.extend((0..15).map(|i| 100.0 + i as f64));
        assert!((rsi(&data, 14) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_true_range_uses_previous_close() {
        let bars = vec![bar(0, 11.0, 9.0, 10.0, 1.0), bar(1, 15.0, 12.0, 14.0, 1.0)];
        let tr = true_range(&bars);
        assert_eq!(tr, vec![2.0, 5.0]);
    }

    #[test]
    fn test_atr_and_volatility_ratio() {
        let bars = bars_from_closes(&[100.0; 20]);
        let values = atr(&bars, 14);
        assert_eq!(values.len(), 7);
        assert!((values[0] - 2.0).abs() < 1e-12);

        let ratio = volatility_ratio(&bars, 14).unwrap();
        assert!((ratio - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_ratio_short_series() {
        let bars = bars_from_closes(&[100.0; 10]);
        assert!(atr(&bars, 14).is_empty());
        assert!(volatility_ratio(&bars, 14).is_none());
    }

    #[test]
    fn test_macd_uptrend_is_bullish() {
        let data: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let result = macd(&data, 12, 26, 9);
        assert_eq!(result.macd_line.len(), data.len());
        assert_eq!(result.signal_line.len(), data.len());
        assert!(result.is_bullish());
        assert!(result.histogram.last().unwrap() > &0.0);
    }

    #[test]
    fn test_macd_downtrend_is_not_bullish() {
        let data: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        assert!(!macd(&data, 12, 26, 9).is_bullish());
    }

    #[test]
    fn test_macd_invalid_parameters() {
        let data = vec![1.0, 2.0, 3.0];
        let result = macd(&data, 26, 12, 9);
        assert!(result.macd_line.is_empty());
        assert!(!result.is_bullish());
        assert!(!macd(&[], 12, 26, 9).is_bullish());
    }

    #[test]
    fn test_volume_ratio_includes_last_bar() {
        let mut volumes = vec![100.0; 19];
        volumes.push(200.0);
        let ratio = volume_ratio(&volumes, 20).unwrap();
        assert!((ratio - 200.0 / 105.0).abs() < 1e-12);
    }

    #[test]
    fn test_volume_ratio_short_and_empty() {
        assert_eq!(volume_ratio(&[100.0, 100.0], 20), Some(1.0));
        assert!(volume_ratio(&[], 20).is_none());
        assert!(volume_ratio(&[0.0, 0.0], 20).is_none());
    }

    #[test]
    fn test_period_return() {
        let ret = period_return(&[100.0, 90.0, 125.0]).unwrap();
        assert!((ret - 0.25).abs() < 1e-12);
        assert!(period_return(&[0.0, 10.0]).is_none());
        assert!(period_return(&[]).is_none());
    }
}

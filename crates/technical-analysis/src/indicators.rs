use analysis_core::PriceBar;

/// Added to the average loss so a series without down moves yields RSI 100, not NaN
pub const RSI_EPSILON: f64 = 1e-9;

/// RSI reported when there is not enough history to compute one
pub const NEUTRAL_RSI: f64 = 50.0;

/// Simple Moving Average.
///
/// Rolling semantics: one value per full window, so the output is empty when
/// `data` is shorter than `period`.
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    data.windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}

/// Final SMA value, `None` when fewer than `period` points exist
pub fn last_sma(data: &[f64], period: usize) -> Option<f64> {
    sma(data, period).last().copied()
}

/// Exponential Moving Average, recursive and unadjusted.
///
/// Seeded with the first value; smoothing factor is `2 / (span + 1)`.
/// Output has the same length as the input.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    let mut prev = data[0];
    result.push(prev);

    for &value in &data[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        result.push(prev);
    }

    result
}

/// Relative Strength Index over the last `period` close-to-close moves.
///
/// Average gain and loss are simple means over the window. Returns
/// [`NEUTRAL_RSI`] when fewer than `period + 1` closes exist. A window with
/// no movement has RS 0 and therefore RSI 0.
pub fn rsi(data: &[f64], period: usize) -> f64 {
    if period == 0 || data.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let window = &data[data.len() - period - 1..];
    let (gains, losses) = window.windows(2).fold((0.0_f64, 0.0_f64), |(g, l), w| {
        let change = w[1] - w[0];
        if change > 0.0 {
            (g + change, l)
        } else {
            (g, l - change)
        }
    });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    let rs = avg_gain / (avg_loss + RSI_EPSILON);
    100.0 - 100.0 / (1.0 + rs)
}

/// True range per bar.
///
/// The first bar has no previous close, so its range is just high - low.
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let high_low = bar.high - bar.low;
            if i == 0 {
                return high_low;
            }
            let prev_close = bars[i - 1].close;
            let high_close = (bar.high - prev_close).abs();
            let low_close = (bar.low - prev_close).abs();
            high_low.max(high_close).max(low_close)
        })
        .collect()
}

/// Average True Range: simple rolling mean of the true range
pub fn atr(bars: &[PriceBar], period: usize) -> Vec<f64> {
    sma(&true_range(bars), period)
}

/// ATR as a percentage of the last close. `None` without a full ATR window
/// or a positive close.
pub fn volatility_ratio(bars: &[PriceBar], period: usize) -> Option<f64> {
    let last_atr = *atr(bars, period).last()?;
    let last_close = bars.last()?.close;
    if last_close <= 0.0 {
        return None;
    }
    Some(last_atr / last_close * 100.0)
}

/// MACD (Moving Average Convergence Divergence)
#[derive(Debug, Clone, Default)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdResult {
    pub fn last_macd(&self) -> Option<f64> {
        self.macd_line.last().copied()
    }

    pub fn last_signal(&self) -> Option<f64> {
        self.signal_line.last().copied()
    }

    /// MACD line above its signal line on the last bar
    pub fn is_bullish(&self) -> bool {
        match (self.last_macd(), self.last_signal()) {
            (Some(m), Some(s)) => m > s,
            _ => false,
        }
    }
}

pub fn macd(data: &[f64], fast_span: usize, slow_span: usize, signal_span: usize) -> MacdResult {
    if fast_span == 0 || signal_span == 0 || slow_span <= fast_span || data.is_empty() {
        return MacdResult::default();
    }

    let ema_fast = ema(data, fast_span);
    let ema_slow = ema(data, slow_span);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal_line = ema(&macd_line, signal_span);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Last volume relative to the mean of the trailing `lookback` volumes
/// (the last bar included). Uses whatever is available when the series is
/// shorter than `lookback`.
pub fn volume_ratio(volumes: &[f64], lookback: usize) -> Option<f64> {
    let last = *volumes.last()?;
    if lookback == 0 {
        return None;
    }
    let tail = &volumes[volumes.len().saturating_sub(lookback)..];
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    if mean <= 0.0 {
        return None;
    }
    Some(last / mean)
}

/// Total return from the first to the last close (0.25 = +25%)
pub fn period_return(data: &[f64]) -> Option<f64> {
    let first = *data.first()?;
    let last = *data.last()?;
    if first <= 0.0 {
        return None;
    }
    Some(last / first - 1.0)
}

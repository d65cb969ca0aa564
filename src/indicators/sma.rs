// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_i = (close_{i-period+1} + ... + close_i) / period
//
// One value per full window; the first value belongs to raw index period - 1.

/// Compute the SMA series for `closes` over a trailing window of `period`.
///
/// The output has `closes.len() - period + 1` elements; element `k` averages
/// `closes[k ..= k + period - 1]`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() < period` => empty vec
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    let mut result = Vec::with_capacity(closes.len() - period + 1);
    for window in closes.windows(period) {
        result.push(window.iter().sum::<f64>() / period_f);
    }

    result
}

/// Raw index of the first SMA value.
pub fn sma_offset(period: usize) -> usize {
    period.saturating_sub(1)
}

// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_0      = close_0
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The series is seeded with the first raw value, not an SMA of the first
// `period` closes, so the output is as long as the input and starts at raw
// index 0.  Downstream consumers (MACD, export) rely on that length.
// =============================================================================

/// Compute the EMA series for the given `values` and look-back `period`.
///
/// Returns one value per input value. Used for both price EMA and the MACD
/// signal line.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - empty input => empty vec
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }
    let Some(&seed) = values.first() else {
        return Vec::new();
    };

    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    result.push(seed);

    let mut prev_ema = seed;
    for &value in &values[1..] {
        let ema = (value - prev_ema) * multiplier + prev_ema;
        result.push(ema);
        prev_ema = ema;
    }

    result
}

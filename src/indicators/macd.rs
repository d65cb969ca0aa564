// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   MACD_t   = EMA_fast(close)_t - EMA_slow(close)_t
//   Signal_t = EMA_signal(MACD)_t
//   Hist_t   = MACD_t - Signal_t
//
// Both EMAs span the whole close series, so every line is as long as the
// input and aligned 1:1 with it.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::ema::calculate_ema;

/// Periods for the three EMAs behind MACD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdPeriods {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdPeriods {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// MACD line, signal line and histogram, each one value per close.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdResult {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD over `closes`.
///
/// Returns empty lines when `closes` is empty or any period is zero.
pub fn calculate_macd(closes: &[f64], periods: MacdPeriods) -> MacdResult {
    let fast = calculate_ema(closes, periods.fast);
    let slow = calculate_ema(closes, periods.slow);
    if fast.is_empty() || slow.is_empty() || periods.signal == 0 {
        return MacdResult::default();
    }

    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&macd, periods.signal);
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    MacdResult {
        macd,
        signal,
        histogram,
    }
}

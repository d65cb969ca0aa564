// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Split the first `period` deltas (close_i - close_{i-1}, i = 1..=period)
//          into gains and losses; the seed averages are their means.
// Step 2 — First RSI from the seed averages.
// Step 3 — For i = period..n-1 apply Wilder's smoothing with the delta at i:
//            avg_gain = (prev_avg_gain * (period - 1) + gain_i) / period
//            avg_loss = (prev_avg_loss * (period - 1) + loss_i) / period
//          The smoothing pass starts at i = period, so the last seed delta is
//          folded in a second time; this keeps the series length at
//          n - period + 1.
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//          With avg_loss == 0 the RSI is pinned to 100.
//
// Thresholds:  RSI >= 70 => OVERBOUGHT,  RSI <= 30 => OVERSOLD.
// =============================================================================

use serde::Serialize;

/// Compute the full RSI series for the given `closes` and `period`.
///
/// The returned vector has `closes.len() - period + 1` values; element 0 is
/// the seed RSI and belongs to raw index `period`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() <= period` => empty vec (need `period` deltas plus one)
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }

    // --- Seed averages from the first `period` deltas ------------------------
    let (sum_gain, sum_loss) = closes[..=period]
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0_f64, 0.0_f64), |(g, l), d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(rsi_from_averages(avg_gain, avg_loss));

    // --- Wilder's smoothing for subsequent values ----------------------------
    for i in period..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Raw index of the first RSI value.
pub fn rsi_offset(period: usize) -> usize {
    period
}

/// Overbought / oversold classification of a single RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RsiZone {
    Overbought,
    Neutral,
    Oversold,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi >= 70.0 {
            Self::Overbought
        } else if rsi <= 30.0 {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "OVERBOUGHT"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Oversold => write!(f, "OVERSOLD"),
        }
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // ---- calculate_rsi ---------------------------------------------------

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn rsi_insufficient_data() {
        // n == period is not enough: need period deltas.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).is_empty());
    }

    #[test]
    fn rsi_single_gain_without_losses_is_100() {
        // 15 closes of 10, stepping to 12 at index 10: one gain of 2, no
        // losses => avg_gain = 2/14, avg_loss = 0 => RSI pinned at 100.
        let mut closes = vec![10.0; 15];
        for c in closes.iter_mut().skip(10) {
            *c = 12.0;
        }
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 2);
        assert!((series[0] - 100.0).abs() < 1e-12);
        assert!((series[1] - 100.0).abs() < 1e-12);
    }

    #[test]
    fn rsi_isolated_spike_balances_to_50() {
        // A one-day spike to 12 is a +2 gain followed by a -2 loss.
        let mut closes = vec![10.0; 15];
        closes[10] = 12.0;
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 2);
        assert!((series[0] - 50.0).abs() < 1e-12);
    }

    #[test]
    fn rsi_length_and_offset() {
        let closes: Vec<f64> = (0..40).map(|x| (x as f64 * 0.7).sin() + 5.0).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 40 - 14 + 1);
        assert_eq!(rsi_offset(14), 14);
    }

    #[test]
    fn rsi_all_gains() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert!(!series.is_empty());
        for &v in &series {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert!(!series.is_empty());
        for &v in &series {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 5);
        for &v in &series {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_smoothing_reuses_last_seed_delta() {
        // period 2: deltas +1, -1 seed => avg_gain 0.5, avg_loss 0.5 => 50.
        // First smoothing step re-reads the delta at i = 2 (-1):
        //   avg_gain = (0.5 + 0) / 2 = 0.25, avg_loss = (0.5 + 1) / 2 = 0.75
        //   RSI = 100 - 100 / (1 + 1/3) = 25
        let series = calculate_rsi(&[1.0, 2.0, 1.0], 2);
        assert_eq!(series.len(), 2);
        assert!((series[0] - 50.0).abs() < 1e-12);
        assert!((series[1] - 25.0).abs() < 1e-12);
    }

    // ---- RsiZone ---------------------------------------------------------

    #[test]
    fn zone_thresholds() {
        assert_eq!(RsiZone::classify(100.0), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(70.0), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(50.0), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(30.0), RsiZone::Oversold);
        assert_eq!(RsiZone::classify(0.0).to_string(), "OVERSOLD");
    }
}

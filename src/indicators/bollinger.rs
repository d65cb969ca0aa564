// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ).
//
// The deviation window is taken over the SMA series itself.  For band index i
// (an index into SMA) the variance sums, for j = i-period+1 ..= i,
//
//     (close_j - SMA_{j-period+1})^2
//
// i.e. each close is compared against the SMA whose window ends on that same
// close.  σ = sqrt(sum / period) (population).
//
// SMA_{j-period+1} only exists for j >= period-1, so the first band index with
// a complete deviation window is 2*(period-1).  Each band value sits on the
// raw index of its middle SMA, i + period - 1, which puts the first band at
// raw index 3*(period-1).
// =============================================================================

use crate::indicators::sma::calculate_sma;

/// Upper, middle and lower bands, index-aligned with each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Returns empty bands when:
/// - `period == 0`
/// - the SMA series is shorter than `period`
/// - no band index has a complete deviation window
///   (`closes.len() < bollinger_min_len(period)`)
pub fn calculate_bollinger(closes: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let sma = calculate_sma(closes, period);
    if period == 0 || sma.len() < period {
        return BollingerBands::default();
    }

    let first = 2 * (period - 1);
    if first >= sma.len() {
        return BollingerBands::default();
    }

    let period_f = period as f64;
    let count = sma.len() - first;
    let mut bands = BollingerBands {
        upper: Vec::with_capacity(count),
        middle: Vec::with_capacity(count),
        lower: Vec::with_capacity(count),
    };

    for i in first..sma.len() {
        let sum: f64 = (i + 1 - period..=i)
            .map(|j| (closes[j] - sma[j + 1 - period]).powi(2))
            .sum();
        let std_dev = (sum / period_f).sqrt();

        bands.upper.push(sma[i] + std_dev * multiplier);
        bands.middle.push(sma[i]);
        bands.lower.push(sma[i] - std_dev * multiplier);
    }

    bands
}

/// Raw index of the first band value.
pub fn bollinger_offset(period: usize) -> usize {
    3usize.saturating_mul(period.saturating_sub(1))
}

/// Smallest series length that yields at least one band.
pub fn bollinger_min_len(period: usize) -> usize {
    bollinger_offset(period).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_hand_computed() {
        // SMA(2) = [2, 2.5, 4, 5, 6]
        let closes = vec![1.0, 3.0, 2.0, 6.0, 4.0, 8.0];
        let bb = calculate_bollinger(&closes, 2, 2.0);

        // i = 2: (3-2)^2 + (2-2.5)^2 = 1.25   -> var 0.625
        // i = 3: (2-2.5)^2 + (6-4)^2 = 4.25   -> var 2.125
        // i = 4: (6-4)^2 + (4-5)^2   = 5.0    -> var 2.5
        let middles = [4.0, 5.0, 6.0];
        let std_devs = [0.625_f64.sqrt(), 2.125_f64.sqrt(), 2.5_f64.sqrt()];

        assert_eq!(bb.middle, middles.to_vec());
        for k in 0..3 {
            assert!((bb.upper[k] - (middles[k] + 2.0 * std_devs[k])).abs() < 1e-12);
            assert!((bb.lower[k] - (middles[k] - 2.0 * std_devs[k])).abs() < 1e-12);
        }
        assert_eq!(bollinger_offset(2), 3);
    }

    #[test]
    fn bollinger_linear_series_has_constant_width() {
        // On a straight line every close sits 0.5 above its trailing SMA(2).
        let closes = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let bb = calculate_bollinger(&closes, 2, 2.0);
        assert_eq!(bb.upper, vec![4.5, 5.5, 6.5]);
        assert_eq!(bb.lower, vec![2.5, 3.5, 4.5]);
    }

    #[test]
    fn bollinger_insufficient_data() {
        for period in 1..25 {
            let closes: Vec<f64> = (0..period - 1).map(|x| x as f64 + 1.0).collect();
            assert!(calculate_bollinger(&closes, period, 2.0).is_empty());
        }
    }

    #[test]
    fn bollinger_needs_complete_deviation_window() {
        let period = 20;
        let short: Vec<f64> = (0..bollinger_min_len(period) - 1).map(|x| x as f64).collect();
        assert!(calculate_bollinger(&short, period, 2.0).is_empty());

        let enough: Vec<f64> = (0..bollinger_min_len(period)).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&enough, period, 2.0);
        assert_eq!(bb.middle.len(), 1);
    }

    #[test]
    fn bollinger_flat() {
        let closes = vec![100.0; 60];
        let bb = calculate_bollinger(&closes, 20, 2.0);
        assert!(!bb.is_empty());
        for k in 0..bb.middle.len() {
            assert!((bb.upper[k] - bb.lower[k]).abs() < 1e-10);
        }
    }

    #[test]
    fn bands_bracket_middle() {
        let closes: Vec<f64> = (0..80).map(|x| (x as f64 * 0.3).sin() + 2.0).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        assert_eq!(bb.middle.len(), 80 - bollinger_offset(20));
        for k in 0..bb.middle.len() {
            assert!(bb.upper[k] >= bb.middle[k]);
            assert!(bb.lower[k] <= bb.middle[k]);
        }
    }
}

// =============================================================================
// Indicator Engine
// =============================================================================
//
// Runs every indicator over the cleaned close series and packages each result
// as a `DerivedSeries` with its raw-index offset:
//
//   SMA(p)        offset p - 1        len n - p + 1
//   EMA(p)        offset 0            len n
//   RSI(p)        offset p            len n - p + 1
//   MACD / signal offset 0            len n
//   Bollinger(p)  offset 3 * (p - 1)  len n - 3 * (p - 1)
//
// Short series are not an error: the affected indicator comes back empty, a
// `Degenerate` condition is recorded, and the remaining indicators still run.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::Degenerate;
use crate::indicators::bollinger::{bollinger_min_len, bollinger_offset, calculate_bollinger};
use crate::indicators::ema::calculate_ema;
use crate::indicators::macd::{calculate_macd, MacdPeriods};
use crate::indicators::rsi::{calculate_rsi, rsi_offset, RsiZone};
use crate::indicators::sma::{calculate_sma, sma_offset};
use crate::indicators::DerivedSeries;
use crate::market_data::SeriesStore;
use crate::types::IndicatorKind;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_sma_period() -> usize {
    20
}

fn default_ema_period() -> usize {
    14
}

fn default_rsi_period() -> usize {
    14
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_multiplier() -> f64 {
    2.0
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Look-back periods for every indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_sma_period")]
    pub sma_period: usize,

    #[serde(default = "default_ema_period")]
    pub ema_period: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Fast / slow / signal EMA periods for MACD.
    #[serde(default)]
    pub macd: MacdPeriods,

    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    /// Number of standard deviations between the middle and outer bands.
    #[serde(default = "default_bollinger_multiplier")]
    pub bollinger_multiplier: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_period: default_sma_period(),
            ema_period: default_ema_period(),
            rsi_period: default_rsi_period(),
            macd: MacdPeriods::default(),
            bollinger_period: default_bollinger_period(),
            bollinger_multiplier: default_bollinger_multiplier(),
        }
    }
}

// =============================================================================
// IndicatorSet
// =============================================================================

/// Every derived sequence for one run, plus the conditions raised while
/// computing them.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub sma: DerivedSeries,
    pub ema: DerivedSeries,
    pub rsi: DerivedSeries,
    pub macd: DerivedSeries,
    pub signal: DerivedSeries,
    pub histogram: DerivedSeries,
    pub upper_band: DerivedSeries,
    pub middle_band: DerivedSeries,
    pub lower_band: DerivedSeries,
    pub conditions: Vec<Degenerate>,
}

impl IndicatorSet {
    /// Compute every indicator over the store's close prices.
    pub fn compute(store: &SeriesStore, params: &IndicatorParams) -> Self {
        let set = Self::compute_closes(store.prices(), params);
        for cond in &set.conditions {
            warn!(symbol = store.symbol(), condition = %cond, "indicator degenerate");
        }
        debug!(
            symbol = store.symbol(),
            sma = set.sma.len(),
            ema = set.ema.len(),
            rsi = set.rsi.len(),
            macd = set.macd.len(),
            bands = set.middle_band.len(),
            "indicators computed"
        );
        set
    }

    /// Compute every indicator over a bare close series.
    pub fn compute_closes(closes: &[f64], params: &IndicatorParams) -> Self {
        let n = closes.len();
        let mut set = Self::default();

        // --- SMA -------------------------------------------------------------
        let p = params.sma_period;
        set.sma = DerivedSeries::new(calculate_sma(closes, p), sma_offset(p));
        set.note_empty(IndicatorKind::Sma, p, set.sma.is_empty(), p, n);

        // --- EMA -------------------------------------------------------------
        let p = params.ema_period;
        set.ema = DerivedSeries::new(calculate_ema(closes, p), 0);
        set.note_empty(IndicatorKind::Ema, p, set.ema.is_empty(), 1, n);

        // --- RSI -------------------------------------------------------------
        let p = params.rsi_period;
        set.rsi = DerivedSeries::new(calculate_rsi(closes, p), rsi_offset(p));
        set.note_empty(IndicatorKind::Rsi, p, set.rsi.is_empty(), p.saturating_add(1), n);

        // --- MACD ------------------------------------------------------------
        let periods = params.macd;
        let macd = calculate_macd(closes, periods);
        let shortest = periods.fast.min(periods.slow).min(periods.signal);
        set.note_empty(IndicatorKind::Macd, shortest, macd.macd.is_empty(), 1, n);
        set.macd = DerivedSeries::new(macd.macd, 0);
        set.signal = DerivedSeries::new(macd.signal, 0);
        set.histogram = DerivedSeries::new(macd.histogram, 0);

        // --- Bollinger Bands -------------------------------------------------
        let p = params.bollinger_period;
        let bands = calculate_bollinger(closes, p, params.bollinger_multiplier);
        let offset = bollinger_offset(p);
        set.note_empty(IndicatorKind::Bollinger, p, bands.is_empty(), bollinger_min_len(p), n);
        set.upper_band = DerivedSeries::new(bands.upper, offset);
        set.middle_band = DerivedSeries::new(bands.middle, offset);
        set.lower_band = DerivedSeries::new(bands.lower, offset);

        set
    }

    /// Zone of the most recent RSI value, if any.
    pub fn latest_rsi_zone(&self) -> Option<(f64, RsiZone)> {
        let value = self.rsi.last()?;
        Some((value, RsiZone::classify(value)))
    }

    fn note_empty(
        &mut self,
        indicator: IndicatorKind,
        period: usize,
        empty: bool,
        required: usize,
        available: usize,
    ) {
        if period == 0 {
            self.conditions.push(Degenerate::InvalidPeriod { indicator });
        } else if empty {
            self.conditions.push(Degenerate::InsufficientLength {
                indicator,
                required,
                available,
            });
        }
    }
}

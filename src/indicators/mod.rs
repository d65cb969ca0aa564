// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators exported for each
// symbol.  The low-level `calculate_*` functions take a price slice and return
// an empty `Vec` on insufficient data; `engine` wraps them into
// `DerivedSeries` values that carry their alignment offset and reports the
// degenerate conditions.

pub mod bollinger;
pub mod ema;
pub mod engine;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use engine::{IndicatorParams, IndicatorSet};

use serde::Serialize;

/// A derived sequence paired with the raw index of its first element.
///
/// `values[k]` belongs to raw observation `offset + k`. Sequences whose window
/// consumes leading observations (SMA, RSI, Bollinger) have a nonzero offset;
/// EMA and MACD start at raw index 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedSeries {
    pub values: Vec<f64>,
    pub offset: usize,
}

impl DerivedSeries {
    pub fn new(values: Vec<f64>, offset: usize) -> Self {
        Self { values, offset }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a position in the derived sequence itself, ignoring the
    /// offset.
    pub fn at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Value aligned to raw observation `raw_index`, or `None` before the
    /// offset and past the end.
    pub fn at_raw(&self, raw_index: usize) -> Option<f64> {
        raw_index
            .checked_sub(self.offset)
            .and_then(|k| self.values.get(k).copied())
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::types::Field;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single daily observation, used when a row has to be handled as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Row {
    /// Value of one numeric column.
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume,
        }
    }
}

// ---------------------------------------------------------------------------
// SeriesStore -- parallel column storage for one symbol
// ---------------------------------------------------------------------------

/// Column-oriented OHLCV storage for a single symbol.
///
/// Index `i` across every column refers to the same observation. The store
/// performs no computation; cleaning and indicators operate on it from the
/// outside.
///
/// The per-field appenders (`add_date`, `add_open`, ...) must be called in
/// lockstep by the caller, one call per field per row. Reading the store
/// while a row is half-appended is a precondition violation; use
/// [`SeriesStore::check_consistency`] to detect it.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    symbol: String,
    dates: Vec<String>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl SeriesStore {
    /// Create an empty store for `symbol`.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Build a store from complete rows, in order.
    pub fn from_rows(symbol: impl Into<String>, rows: impl IntoIterator<Item = Row>) -> Self {
        let mut store = Self::new(symbol);
        for row in rows {
            store.push(row);
        }
        store
    }

    // -------------------------------------------------------------------------
    // Accumulation
    // -------------------------------------------------------------------------

    /// Append one full observation. No validation is performed.
    pub fn append_row(
        &mut self,
        date: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) {
        self.dates.push(date.into());
        self.open.push(open);
        self.high.push(high);
        self.low.push(low);
        self.close.push(close);
        self.volume.push(volume);
    }

    /// Append a [`Row`] record.
    pub fn push(&mut self, row: Row) {
        self.append_row(row.date, row.open, row.high, row.low, row.close, row.volume);
    }

    pub fn add_date(&mut self, date: impl Into<String>) {
        self.dates.push(date.into());
    }

    pub fn add_open(&mut self, price: f64) {
        self.open.push(price);
    }

    pub fn add_high(&mut self, price: f64) {
        self.high.push(price);
    }

    pub fn add_low(&mut self, price: f64) {
        self.low.push(price);
    }

    pub fn add_close(&mut self, price: f64) {
        self.close.push(price);
    }

    pub fn add_volume(&mut self, volume: f64) {
        self.volume.push(volume);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of observations currently held.
    pub fn rows(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Close prices; the default "price" series for every indicator.
    pub fn prices(&self) -> &[f64] {
        &self.close
    }

    /// Read-only view of a numeric column.
    pub fn field(&self, field: Field) -> &[f64] {
        match field {
            Field::Open => &self.open,
            Field::High => &self.high,
            Field::Low => &self.low,
            Field::Close => &self.close,
            Field::Volume => &self.volume,
        }
    }

    /// Mutable view of a numeric column, for in-place rescaling.
    pub(crate) fn field_mut(&mut self, field: Field) -> &mut [f64] {
        match field {
            Field::Open => &mut self.open,
            Field::High => &mut self.high,
            Field::Low => &mut self.low,
            Field::Close => &mut self.close,
            Field::Volume => &mut self.volume,
        }
    }

    /// Copy out the observation at `index`, if every column has one.
    pub fn row(&self, index: usize) -> Option<Row> {
        Some(Row {
            date: self.dates.get(index)?.clone(),
            open: *self.open.get(index)?,
            high: *self.high.get(index)?,
            low: *self.low.get(index)?,
            close: *self.close.get(index)?,
            volume: *self.volume.get(index)?,
        })
    }

    // -------------------------------------------------------------------------
    // Invariants & compaction
    // -------------------------------------------------------------------------

    /// Verify that all six columns have equal length.
    pub fn check_consistency(&self) -> Result<(), PipelineError> {
        let expected = self.dates.len();
        let columns: [(&'static str, usize); 5] = [
            ("Open", self.open.len()),
            ("High", self.high.len()),
            ("Low", self.low.len()),
            ("Close", self.close.len()),
            ("Volume", self.volume.len()),
        ];
        for (field, actual) in columns {
            if actual != expected {
                return Err(PipelineError::Consistency {
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Keep only the rows for which `keep` returns true, preserving order.
    ///
    /// All six columns are rebuilt in one left-to-right pass and swapped in
    /// together, so the store is never observable with mismatched lengths.
    /// Returns the number of rows removed.
    ///
    /// # Errors
    /// A store whose columns are out of lockstep is rejected untouched;
    /// zipping it would silently drop the trailing partial row.
    pub fn retain_rows(
        &mut self,
        mut keep: impl FnMut(&Row) -> bool,
    ) -> Result<usize, PipelineError> {
        self.check_consistency()?;
        let before = self.rows();
        let mut kept = SeriesStore::new(std::mem::take(&mut self.symbol));

        let columns = self
            .dates
            .drain(..)
            .zip(self.open.drain(..))
            .zip(self.high.drain(..))
            .zip(self.low.drain(..))
            .zip(self.close.drain(..))
            .zip(self.volume.drain(..));

        for (((((date, open), high), low), close), volume) in columns {
            let row = Row {
                date,
                open,
                high,
                low,
                close,
                volume,
            };
            if keep(&row) {
                kept.push(row);
            }
        }

        *self = kept;
        Ok(before - self.rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SeriesStore {
        let mut store = SeriesStore::new("AAPL");
        store.append_row("2024-01-02", 10.0, 12.0, 9.0, 11.0, 1000.0);
        store.append_row("2024-01-03", 11.0, 13.0, 10.0, 12.0, 1100.0);
        store.append_row("2024-01-04", 12.0, 14.0, 11.0, 13.0, 1200.0);
        store
    }

    #[test]
    fn append_row_keeps_columns_aligned() {
        let store = sample();
        assert_eq!(store.rows(), 3);
        assert_eq!(store.symbol(), "AAPL");
        assert!(store.check_consistency().is_ok());
        assert_eq!(store.prices(), &[11.0, 12.0, 13.0]);
        assert_eq!(store.field(Field::Volume), &[1000.0, 1100.0, 1200.0]);
    }

    #[test]
    fn per_field_appends_in_lockstep() {
        let mut store = SeriesStore::new("MSFT");
        store.add_date("2024-01-02");
        store.add_open(1.0);
        store.add_close(2.0);
        store.add_high(3.0);
        store.add_low(0.5);
        store.add_volume(10.0);
        assert!(store.check_consistency().is_ok());
        let row = store.row(0).unwrap();
        assert_eq!(row.close, 2.0);
        assert_eq!(row.high, 3.0);
    }

    #[test]
    fn partial_append_is_detected() {
        let mut store = sample();
        store.add_date("2024-01-05");
        store.add_open(13.0);
        match store.check_consistency() {
            Err(PipelineError::Consistency {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "High");
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("expected consistency error, got {other:?}"),
        }
        assert!(store.row(3).is_none());
    }

    #[test]
    fn retain_rows_preserves_order() {
        let mut store = sample();
        let removed = store.retain_rows(|r| r.date != "2024-01-03").unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.rows(), 2);
        assert_eq!(store.symbol(), "AAPL");
        assert_eq!(store.dates(), &["2024-01-02".to_string(), "2024-01-04".to_string()]);
        assert_eq!(store.prices(), &[11.0, 13.0]);
        assert!(store.check_consistency().is_ok());
    }

    #[test]
    fn retain_rows_rejects_partial_append() {
        let mut store = sample();
        store.add_date("2024-01-05");
        store.add_open(13.0);

        let err = store.retain_rows(|_| true).unwrap_err();
        assert!(matches!(err, PipelineError::Consistency { field: "High", .. }));
        // Nothing was compacted or truncated.
        assert_eq!(store.dates().len(), 4);
        assert_eq!(store.field(Field::Open).len(), 4);
        assert_eq!(store.prices().len(), 3);
    }
}

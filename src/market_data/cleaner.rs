// =============================================================================
// Cleaner / Normalizer
// =============================================================================
//
// Two fixed steps, always in this order:
//
//   1. Invalid-row removal — any row whose open, high, low, close or volume
//      is not a finite, strictly positive number is dropped in full.
//   2. Min–max normalization — each numeric column is rescaled to [0, 1]
//      against its own min / max over the cleaned series:
//        value' = (value - min) / (max - min)
//
// Cleaning changes the min / max, so normalizing first would be wrong.
// A column with max == min is left untouched and reported as degenerate.
// =============================================================================

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{Degenerate, PipelineError};
use crate::market_data::series_store::{Row, SeriesStore};
use crate::types::Field;

/// Outcome of [`preprocess`].
#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    pub rows_removed: usize,
    pub rows_remaining: usize,
    pub conditions: Vec<Degenerate>,
}

/// A row is valid only when every numeric column is finite and strictly
/// positive.
pub fn is_valid_row(row: &Row) -> bool {
    Field::ALL.iter().all(|&field| {
        let v = row.get(field);
        v.is_finite() && v > 0.0
    })
}

/// Drop every invalid row, preserving the order of the rest.
///
/// Returns the number of rows removed. Running it twice is a no-op the second
/// time. Fails without touching the store if its columns are out of lockstep.
pub fn remove_invalid_rows(store: &mut SeriesStore) -> Result<usize, PipelineError> {
    let removed = store.retain_rows(is_valid_row)?;
    if removed > 0 {
        debug!(
            symbol = store.symbol(),
            removed,
            remaining = store.rows(),
            "invalid rows removed"
        );
    }
    Ok(removed)
}

/// Min–max rescale every numeric column in place.
///
/// Returns one condition per column that could not be rescaled. Columns with
/// a nonzero range are always rescaled, whatever happens to the others.
pub fn normalize(store: &mut SeriesStore) -> Vec<Degenerate> {
    if store.is_empty() {
        return vec![Degenerate::EmptySeries];
    }

    let mut conditions = Vec::new();
    for field in Field::ALL {
        if let Err(cond) = normalize_column(store.field_mut(field), field) {
            conditions.push(cond);
        }
    }
    conditions
}

/// Cleaning followed by normalization.
pub fn preprocess(store: &mut SeriesStore) -> Result<CleaningReport, PipelineError> {
    let rows_removed = remove_invalid_rows(store)?;
    let conditions = normalize(store);

    for cond in &conditions {
        warn!(symbol = store.symbol(), condition = %cond, "normalization degenerate");
    }
    info!(
        symbol = store.symbol(),
        rows_removed,
        rows_remaining = store.rows(),
        "preprocessing complete"
    );

    Ok(CleaningReport {
        rows_removed,
        rows_remaining: store.rows(),
        conditions,
    })
}

// =============================================================================
// Internal helpers
// =============================================================================

fn normalize_column(values: &mut [f64], field: Field) -> Result<(), Degenerate> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let range = max - min;
    if range == 0.0 {
        return Err(Degenerate::ZeroRange { field, value: min });
    }

    for v in values.iter_mut() {
        *v = (*v - min) / range;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn store_from(rows: &[(f64, f64, f64, f64, f64)]) -> SeriesStore {
        let mut store = SeriesStore::new("TEST");
        for (i, &(o, h, l, c, v)) in rows.iter().enumerate() {
            store.append_row(format!("d{i}"), o, h, l, c, v);
        }
        store
    }

    // ---- remove_invalid_rows ---------------------------------------------

    #[test]
    fn adjacent_invalid_rows_are_both_removed() {
        let mut store = store_from(&[
            (1.0, 2.0, 0.5, 1.5, 100.0),
            (2.0, 3.0, 1.5, 2.5, 200.0),
            (3.0, 4.0, 2.5, 3.5, 0.0),
            (4.0, 5.0, 3.5, 4.5, 0.0),
            (5.0, 6.0, 4.5, 5.5, 500.0),
            (6.0, 7.0, 5.5, 6.5, 600.0),
        ]);
        let removed = remove_invalid_rows(&mut store).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.rows(), 4);
        let dates: Vec<&str> = store.dates().iter().map(String::as_str).collect();
        assert_eq!(dates, vec!["d0", "d1", "d4", "d5"]);
        assert_eq!(store.prices(), &[1.5, 2.5, 5.5, 6.5]);
        assert!(store.check_consistency().is_ok());
    }

    #[test]
    fn any_non_positive_field_invalidates_row() {
        let mut store = store_from(&[
            (-1.0, 2.0, 1.0, 1.0, 1.0),
            (1.0, 0.0, 1.0, 1.0, 1.0),
            (1.0, 2.0, -0.1, 1.0, 1.0),
            (1.0, 2.0, 1.0, 0.0, 1.0),
            (1.0, 2.0, 1.0, f64::NAN, 1.0),
            (1.0, 2.0, 1.0, 1.0, 1.0),
        ]);
        assert_eq!(remove_invalid_rows(&mut store).unwrap(), 5);
        assert_eq!(store.dates(), &["d5".to_string()]);
    }

    #[test]
    fn non_finite_values_invalidate_row() {
        let mut store = store_from(&[
            (1.0, 2.0, 1.0, 1.0, 10.0),
            (1.0, 2.0, 1.0, f64::INFINITY, 10.0),
            (1.0, f64::INFINITY, 1.0, 2.0, 10.0),
            (1.0, 2.0, 1.0, 3.0, f64::NEG_INFINITY),
            (2.0, 3.0, 1.5, 4.0, 20.0),
        ]);
        let report = preprocess(&mut store).unwrap();
        assert_eq!(report.rows_removed, 3);
        assert_eq!(report.rows_remaining, 2);
        // The surviving close range is real, so nothing is reported.
        assert!(report.conditions.is_empty());
        assert_eq!(store.prices(), &[0.0, 1.0]);
    }

    #[test]
    fn out_of_lockstep_store_is_not_cleaned() {
        let mut store = store_from(&[(1.0, 2.0, 1.0, 1.0, 10.0), (-1.0, 2.0, 1.0, 1.0, 10.0)]);
        store.add_date("d2");
        assert!(matches!(
            preprocess(&mut store),
            Err(PipelineError::Consistency { field: "Open", .. })
        ));
        assert_eq!(store.dates().len(), 3);
        assert_eq!(store.prices().len(), 2);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let mut store = store_from(&[
            (0.0, 1.0, 1.0, 1.0, 1.0),
            (1.0, 1.0, 1.0, 1.0, 1.0),
            (1.0, 1.0, 1.0, 1.0, -5.0),
            (2.0, 2.0, 2.0, 2.0, 2.0),
        ]);
        remove_invalid_rows(&mut store).unwrap();
        let once: Vec<Row> = (0..store.rows()).filter_map(|i| store.row(i)).collect();
        assert_eq!(remove_invalid_rows(&mut store).unwrap(), 0);
        let twice: Vec<Row> = (0..store.rows()).filter_map(|i| store.row(i)).collect();
        assert_eq!(once, twice);
    }

    // ---- normalize --------------------------------------------------------

    #[test]
    fn normalized_fields_span_unit_interval() {
        let mut store = store_from(&[
            (10.0, 12.0, 9.0, 11.0, 1000.0),
            (20.0, 22.0, 19.0, 21.0, 3000.0),
            (15.0, 17.0, 14.0, 16.0, 2000.0),
        ]);
        let conditions = normalize(&mut store);
        assert!(conditions.is_empty());
        for field in Field::ALL {
            let col = store.field(field);
            let min = col.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = col.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!((min - 0.0).abs() < 1e-12, "{field} min {min}");
            assert!((max - 1.0).abs() < 1e-12, "{field} max {max}");
        }
        assert!((store.prices()[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn constant_field_reports_zero_range_without_nan() {
        let mut store = store_from(&[
            (10.0, 12.0, 9.0, 5.0, 1000.0),
            (20.0, 22.0, 19.0, 5.0, 3000.0),
            (15.0, 17.0, 14.0, 5.0, 2000.0),
        ]);
        let conditions = normalize(&mut store);
        assert_eq!(
            conditions,
            vec![Degenerate::ZeroRange {
                field: Field::Close,
                value: 5.0
            }]
        );
        assert!(store.prices().iter().all(|v| v.is_finite()));
        assert_eq!(store.prices(), &[5.0, 5.0, 5.0]);
        // Other columns still rescaled.
        assert_eq!(store.field(Field::Open), &[0.0, 1.0, 0.5]);
    }

    #[test]
    fn empty_store_is_degenerate() {
        let mut store = SeriesStore::new("EMPTY");
        assert_eq!(normalize(&mut store), vec![Degenerate::EmptySeries]);
    }

    // ---- preprocess -------------------------------------------------------

    #[test]
    fn preprocess_cleans_before_normalizing() {
        // The invalid row carries the largest open; if normalization ran
        // first it would set the max.
        let mut store = store_from(&[
            (1.0, 1.0, 1.0, 1.0, 1.0),
            (100.0, 2.0, 2.0, 2.0, 0.0),
            (3.0, 3.0, 3.0, 3.0, 3.0),
        ]);
        let report = preprocess(&mut store).unwrap();
        assert_eq!(report.rows_removed, 1);
        assert_eq!(report.rows_remaining, 2);
        assert!(report.conditions.is_empty());
        assert_eq!(store.field(Field::Open), &[0.0, 1.0]);
    }
}

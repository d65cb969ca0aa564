// =============================================================================
// Export Adapter — one row per observation, raw columns plus indicators
// =============================================================================
//
// Output columns:
//   Date,Open,High,Low,Close,Volume,SMA,EMA,RSI,MACD,SignalLine
//
// Indicator cells are filled according to the configured `AlignmentPolicy`
// and zero-filled everywhere else.  A derived sequence that is shorter than
// the row index being exported never faults; the cell falls back to 0.0.
// =============================================================================

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::PipelineError;
use crate::indicators::{DerivedSeries, IndicatorSet};
use crate::market_data::SeriesStore;
use crate::types::AlignmentPolicy;

/// Value written for cells with no indicator value.
pub const EMPTY_CELL: f64 = 0.0;

/// One exported table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
    #[serde(rename = "SMA")]
    pub sma: f64,
    #[serde(rename = "EMA")]
    pub ema: f64,
    #[serde(rename = "RSI")]
    pub rsi: f64,
    #[serde(rename = "MACD")]
    pub macd: f64,
    #[serde(rename = "SignalLine")]
    pub signal_line: f64,
}

/// Assemble the export table from the store and the computed indicators.
pub fn build_rows(
    store: &SeriesStore,
    indicators: &IndicatorSet,
    policy: AlignmentPolicy,
) -> Vec<ExportRow> {
    let cell = |series: &DerivedSeries, i: usize| -> f64 {
        let value = match policy {
            AlignmentPolicy::Verbatim { cutoff } if i >= cutoff => series.at(i),
            AlignmentPolicy::Verbatim { .. } => None,
            AlignmentPolicy::Aligned => series.at_raw(i),
        };
        value.unwrap_or(EMPTY_CELL)
    };

    (0..store.rows())
        .filter_map(|i| {
            let row = store.row(i)?;
            Some(ExportRow {
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
                sma: cell(&indicators.sma, i),
                ema: cell(&indicators.ema, i),
                rsi: cell(&indicators.rsi, i),
                macd: cell(&indicators.macd, i),
                signal_line: cell(&indicators.signal, i),
            })
        })
        .collect()
}

/// Write the table (with header) to any writer.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), PipelineError> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Write the table to `path`, replacing any existing file.
pub fn write_csv_file(rows: &[ExportRow], path: impl AsRef<Path>) -> Result<(), PipelineError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_csv(rows, File::create(path)?)?;
    info!(path = %path.display(), rows = rows.len(), "processed table written");
    Ok(())
}

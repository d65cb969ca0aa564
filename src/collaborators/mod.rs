// =============================================================================
// Collaborators Module
// =============================================================================
//
// Capabilities the core talks to but does not own:
// - DataSource  — produces the raw quote table (local CSV, Alpha Vantage)
// - Visualizer  — consumes the exported table (log summary)
// - Predictor   — consumes the exported table (MACD crossover direction)
//
// The core never launches external processes; each collaborator is a plain
// Rust value selected by the binary.

pub mod alpha_vantage;
pub mod crossover;
pub mod csv_file;
pub mod summary;

pub use alpha_vantage::AlphaVantageSource;
pub use crossover::{CrossoverPredictor, Direction, Prediction};
pub use csv_file::CsvFileSource;
pub use summary::SummaryVisualizer;

use crate::errors::PipelineError;
use crate::export::ExportRow;
use crate::indicators::IndicatorSet;
use crate::market_data::Row;

/// Produces the raw, time-ordered quote table for one symbol.
#[allow(async_fn_in_trait)]
pub trait DataSource {
    /// Short label used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch every available observation for `symbol`, oldest first.
    async fn fetch(&self, symbol: &str) -> Result<Vec<Row>, PipelineError>;
}

/// Presents an exported table.
pub trait Visualizer {
    fn render(&self, symbol: &str, rows: &[ExportRow], indicators: &IndicatorSet) -> anyhow::Result<()>;
}

/// Derives a forward-looking call from an exported table.
pub trait Predictor {
    fn predict(&self, rows: &[ExportRow]) -> Option<Prediction>;
}

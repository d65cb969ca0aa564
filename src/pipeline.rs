// =============================================================================
// Pipeline — one symbol, end to end
// =============================================================================
//
//   DataSource ─► SeriesStore ─► clean + normalize ─► IndicatorSet ─► export
//                                                                     │
//                                              Visualizer / Predictor ◄┘
//
// `process` is the synchronous core and performs no I/O.  `run` wraps it with
// the collaborators: fetching, persisting the raw and processed tables, the
// run report, and the optional visualizer / predictor.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::collaborators::csv_file::write_quotes_file;
use crate::collaborators::{DataSource, Prediction, Predictor, Visualizer};
use crate::errors::{Degenerate, PipelineError};
use crate::export::{build_rows, write_csv_file, ExportRow};
use crate::indicators::{IndicatorParams, IndicatorSet};
use crate::market_data::{preprocess, Row, SeriesStore};
use crate::runtime_config::{write_atomic, PipelineConfig};
use crate::types::{AlignmentPolicy, SourceKind};

/// Auditable record of one symbol run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique identifier for this run (UUID v4).
    pub run_id: Uuid,
    pub symbol: String,
    pub source: String,
    pub alignment: AlignmentPolicy,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rows_read: usize,
    pub rows_removed: usize,
    pub rows_exported: usize,
    /// Every non-fatal condition raised by cleaning and the indicators.
    pub conditions: Vec<Degenerate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

/// Everything produced by [`process`].
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub store: SeriesStore,
    pub indicators: IndicatorSet,
    pub rows: Vec<ExportRow>,
    pub report: RunReport,
}

/// Run the core over an already-fetched quote table.
///
/// Fails only when cleaning finds the store's columns out of lockstep; short
/// or degenerate data is reported in `report.conditions`.
pub fn process(
    symbol: &str,
    quotes: Vec<Row>,
    params: &IndicatorParams,
    alignment: AlignmentPolicy,
) -> Result<RunOutput, PipelineError> {
    let started_at = Utc::now();
    let rows_read = quotes.len();

    let mut store = SeriesStore::from_rows(symbol, quotes);
    let cleaning = preprocess(&mut store)?;
    let indicators = IndicatorSet::compute(&store, params);
    let rows = build_rows(&store, &indicators, alignment);

    let mut conditions = cleaning.conditions;
    conditions.extend(indicators.conditions.iter().cloned());

    let report = RunReport {
        run_id: Uuid::new_v4(),
        symbol: symbol.to_string(),
        source: String::new(),
        alignment,
        started_at,
        finished_at: Utc::now(),
        rows_read,
        rows_removed: cleaning.rows_removed,
        rows_exported: rows.len(),
        conditions,
        prediction: None,
    };

    Ok(RunOutput {
        store,
        indicators,
        rows,
        report,
    })
}

/// Fetch, process and export one symbol as configured.
pub async fn run<S: DataSource>(
    config: &PipelineConfig,
    source: &S,
    visualizer: Option<&dyn Visualizer>,
    predictor: Option<&dyn Predictor>,
) -> Result<RunOutput> {
    let span = info_span!("run", symbol = %config.symbol, source = source.name());
    async move {
        let quotes = source
            .fetch(&config.symbol)
            .await
            .with_context(|| format!("failed to load quotes from {}", source.name()))?;

        if config.source != SourceKind::CsvFile && config.persist_raw {
            write_quotes_file(&quotes, &config.input_path)
                .with_context(|| format!("failed to save raw quotes to {}", config.input_path))?;
        }

        let mut output = process(&config.symbol, quotes, &config.indicators, config.alignment)
            .context("series store rejected the quote table")?;
        output.report.source = source.name().to_string();

        write_csv_file(&output.rows, &config.output_path)
            .with_context(|| format!("failed to write {}", config.output_path))?;

        if let Some(vis) = visualizer {
            if let Err(e) = vis.render(&config.symbol, &output.rows, &output.indicators) {
                warn!(error = %e, "visualizer failed");
            }
        }

        if let Some(pred) = predictor {
            output.report.prediction = pred.predict(&output.rows);
            if let Some(p) = &output.report.prediction {
                info!(direction = %p.direction, crossover = p.crossover, as_of = %p.as_of, "next-session call");
            }
        }

        output.report.finished_at = Utc::now();
        if let Some(path) = &config.report_path {
            save_report(&output.report, path)?;
        }

        info!(
            run_id = %output.report.run_id,
            rows_read = output.report.rows_read,
            rows_removed = output.report.rows_removed,
            rows_exported = output.report.rows_exported,
            conditions = output.report.conditions.len(),
            "run complete"
        );
        Ok(output)
    }
    .instrument(span)
    .await
}

/// Persist a run report as pretty JSON (atomic).
pub fn save_report(report: &RunReport, path: impl AsRef<Path>) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("failed to serialise run report")?;
    write_atomic(path.as_ref(), &content)
}

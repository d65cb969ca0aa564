// =============================================================================
// OHLCV Engine — Main Entry Point
// =============================================================================
//
// Loads the pipeline config, picks the quote source, and runs one symbol
// through cleaning, indicators and export.  Plotting and prediction are
// handled by the in-process collaborators; nothing here launches external
// processes.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod collaborators;
mod errors;
mod export;
mod indicators;
mod market_data;
mod pipeline;
mod runtime_config;
mod types;

use std::path::Path;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::collaborators::{
    AlphaVantageSource, CrossoverPredictor, CsvFileSource, Predictor, SummaryVisualizer,
    Visualizer,
};
use crate::runtime_config::PipelineConfig;
use crate::types::SourceKind;

const CONFIG_PATH: &str = "pipeline_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var("OHLCV_CONFIG").unwrap_or_else(|_| CONFIG_PATH.into());
    let mut config = PipelineConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        let defaults = PipelineConfig::default();
        // Template only when absent; a file that failed to parse is left alone.
        if !Path::new(&config_path).exists() {
            if let Err(e) = defaults.save(&config_path) {
                warn!(error = %e, path = %config_path, "Failed to write default config");
            }
        }
        defaults
    });
    config.apply_env_overrides();

    info!(
        symbol = %config.symbol,
        source = %config.source,
        alignment = %config.alignment,
        output = %config.output_path,
        "OHLCV engine starting"
    );

    // ── 2. Collaborators ─────────────────────────────────────────────────
    let summary = SummaryVisualizer;
    let crossover = CrossoverPredictor;
    let visualizer = config
        .enable_visualizer
        .then_some(&summary as &dyn Visualizer);
    let predictor = config
        .enable_predictor
        .then_some(&crossover as &dyn Predictor);

    // ── 3. Run ───────────────────────────────────────────────────────────
    let output = match config.source {
        SourceKind::CsvFile => {
            let source = CsvFileSource::new(&config.input_path);
            pipeline::run(&config, &source, visualizer, predictor).await?
        }
        SourceKind::AlphaVantage => {
            let api_key = std::env::var("ALPHA_VANTAGE_API_KEY")
                .context("ALPHA_VANTAGE_API_KEY must be set for the AlphaVantage source")?;
            let source = AlphaVantageSource::new(api_key)?;
            pipeline::run(&config, &source, visualizer, predictor).await?
        }
    };

    for cond in &output.report.conditions {
        warn!(condition = %cond, "degenerate data");
    }

    info!(
        symbol = %config.symbol,
        rows = output.rows.len(),
        path = %config.output_path,
        "Success! processed data saved"
    );
    Ok(())
}

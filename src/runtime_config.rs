// =============================================================================
// Runtime Configuration — pipeline settings with atomic save
// =============================================================================
//
// Every tunable of a symbol run lives here: where quotes come from, where the
// processed table goes, the indicator periods and the export alignment
// policy.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::indicators::IndicatorParams;
use crate::types::{AlignmentPolicy, SourceKind};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_symbol() -> String {
    "AAPL".to_string()
}

fn default_input_path() -> String {
    "data/fetched_stock_data.csv".to_string()
}

fn default_output_path() -> String {
    "data/processed_stock_data.csv".to_string()
}

fn default_report_path() -> Option<String> {
    Some("data/run_report.json".to_string())
}

// =============================================================================
// PipelineConfig
// =============================================================================

/// Top-level configuration for one symbol run.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    // --- Input ---------------------------------------------------------------

    /// Symbol to process.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Where raw quotes come from.
    #[serde(default)]
    pub source: SourceKind,

    /// Raw quote table in `Date,Open,Close,High,Low,Volume` order. Read by the
    /// CSV source; written after a remote fetch when `persist_raw` is set.
    #[serde(default = "default_input_path")]
    pub input_path: String,

    /// Save quotes fetched from a remote source to `input_path`.
    #[serde(default = "default_true")]
    pub persist_raw: bool,

    // --- Output --------------------------------------------------------------

    /// Processed table with indicator columns.
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// JSON run report; `null` disables it.
    #[serde(default = "default_report_path")]
    pub report_path: Option<String>,

    /// How indicator cells are mapped onto raw rows.
    #[serde(default)]
    pub alignment: AlignmentPolicy,

    // --- Indicators ----------------------------------------------------------

    #[serde(default)]
    pub indicators: IndicatorParams,

    // --- Collaborators -------------------------------------------------------

    /// Log a summary of the processed table.
    #[serde(default = "default_true")]
    pub enable_visualizer: bool,

    /// Log a MACD crossover call for the next session.
    #[serde(default = "default_true")]
    pub enable_predictor: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            source: SourceKind::default(),
            input_path: default_input_path(),
            persist_raw: true,
            output_path: default_output_path(),
            report_path: default_report_path(),
            alignment: AlignmentPolicy::default(),
            indicators: IndicatorParams::default(),
            enable_visualizer: true,
            enable_predictor: true,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read pipeline config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse pipeline config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbol = %config.symbol,
            source = %config.source,
            alignment = %config.alignment,
            "pipeline config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise pipeline config to JSON")?;
        write_atomic(path.as_ref(), &content)?;
        info!(path = %path.as_ref().display(), "pipeline config saved (atomic)");
        Ok(())
    }

    /// Apply `OHLCV_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(symbol) = lookup("OHLCV_SYMBOL")
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
        {
            self.symbol = symbol;
        }
        if let Some(input) = lookup("OHLCV_INPUT").filter(|s| !s.is_empty()) {
            self.input_path = input;
        }
        if let Some(output) = lookup("OHLCV_OUTPUT").filter(|s| !s.is_empty()) {
            self.output_path = output;
        }
    }
}

/// Write `content` to `path` via a sibling `.tmp` file and a rename.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let tmp_path = path.with_extension("json.tmp");

    std::fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write tmp file {}", tmp_path.display()))?;

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename tmp file to {}", path.display()))?;

    Ok(())
}

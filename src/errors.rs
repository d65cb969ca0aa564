use serde::Serialize;
use thiserror::Error;

use crate::types::{Field, IndicatorKind};

/// Fatal conditions for a single symbol run.
///
/// Input and consistency failures abort the run before any output is written.
/// The binary wraps these with `anyhow::Context` for propagation.
#[derive(Error, Debug)]
pub enum PipelineError {
    // -- Input --------------------------------------------------------------
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input table: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: column {column} has non-numeric value {value:?}")]
    Parse {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: missing column {column}")]
    MissingField { line: u64, column: &'static str },

    #[error("data source {source_name} failed: {reason}")]
    Source { source_name: String, reason: String },

    // -- Consistency --------------------------------------------------------
    #[error("series store out of lockstep: {field} has {actual} entries, dates has {expected}")]
    Consistency {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Non-fatal conditions reported by individual computations.
///
/// A degenerate condition empties (or leaves untouched) only the computation
/// that raised it; every other computation proceeds.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum Degenerate {
    #[error("{indicator}: need at least {required} values, have {available}")]
    InsufficientLength {
        indicator: IndicatorKind,
        required: usize,
        available: usize,
    },

    #[error("{indicator}: period must be at least 1")]
    InvalidPeriod { indicator: IndicatorKind },

    #[error("{field}: zero range (min == max == {value}), left unnormalized")]
    ZeroRange { field: Field, value: f64 },

    #[error("series is empty, nothing to normalize")]
    EmptySeries,
}

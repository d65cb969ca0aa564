// =============================================================================
// Shared types used across the OHLCV indicator engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// One of the five numeric columns held by the series store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    /// Every numeric field, in export column order.
    pub const ALL: [Field; 5] = [
        Field::Open,
        Field::High,
        Field::Low,
        Field::Close,
        Field::Volume,
    ];
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::High => write!(f, "High"),
            Self::Low => write!(f, "Low"),
            Self::Close => write!(f, "Close"),
            Self::Volume => write!(f, "Volume"),
        }
    }
}

/// Identifies a derived sequence produced by the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    SignalLine,
    Bollinger,
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sma => write!(f, "SMA"),
            Self::Ema => write!(f, "EMA"),
            Self::Rsi => write!(f, "RSI"),
            Self::Macd => write!(f, "MACD"),
            Self::SignalLine => write!(f, "SignalLine"),
            Self::Bollinger => write!(f, "Bollinger"),
        }
    }
}

/// How the export step maps a raw row index onto each derived sequence.
///
/// `Verbatim` reads every derived sequence at the raw index itself once the
/// row index reaches `cutoff`, ignoring per-sequence offsets. `Aligned` reads
/// through each sequence's recorded offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum AlignmentPolicy {
    Verbatim { cutoff: usize },
    Aligned,
}

impl Default for AlignmentPolicy {
    fn default() -> Self {
        Self::Aligned
    }
}

impl std::fmt::Display for AlignmentPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verbatim { cutoff } => write!(f, "Verbatim(cutoff={cutoff})"),
            Self::Aligned => write!(f, "Aligned"),
        }
    }
}

/// Where the raw quote table comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// A local delimited file in `Date,Open,Close,High,Low,Volume` order.
    CsvFile,
    /// The Alpha Vantage `TIME_SERIES_DAILY` endpoint.
    AlphaVantage,
}

impl Default for SourceKind {
    fn default() -> Self {
        Self::CsvFile
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CsvFile => write!(f, "CsvFile"),
            Self::AlphaVantage => write!(f, "AlphaVantage"),
        }
    }
}

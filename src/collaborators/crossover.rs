// =============================================================================
// MACD Crossover Predictor
// =============================================================================
//
// Calls the next move from the final two exported rows:
//   - MACD crosses above its signal line  => Up
//   - MACD crosses below its signal line  => Down
//   - no cross => the side MACD sits on relative to the signal, or Flat
// =============================================================================

use serde::Serialize;

use crate::collaborators::Predictor;
use crate::export::ExportRow;

/// Predicted direction of the next close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "UP"),
            Self::Down => write!(f, "DOWN"),
            Self::Flat => write!(f, "FLAT"),
        }
    }
}

/// A predictor's call for the row after the last exported one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub direction: Direction,
    /// True when the call comes from a fresh crossover on the last row.
    pub crossover: bool,
    /// Date of the row the call was made on.
    pub as_of: String,
}

/// Stateless MACD / signal-line crossover predictor.
#[derive(Debug, Clone, Default)]
pub struct CrossoverPredictor;

impl Predictor for CrossoverPredictor {
    fn predict(&self, rows: &[ExportRow]) -> Option<Prediction> {
        let [.., prev, last] = rows else {
            return None;
        };

        let (direction, crossover) =
            match cross(prev.macd, prev.signal_line, last.macd, last.signal_line) {
                Some(direction) => (direction, true),
                None if last.macd > last.signal_line => (Direction::Up, false),
                None if last.macd < last.signal_line => (Direction::Down, false),
                None => (Direction::Flat, false),
            };

        Some(Prediction {
            direction,
            crossover,
            as_of: last.date.clone(),
        })
    }
}

/// Detect a crossover of `fast` through `slow` between two observations.
fn cross(prev_fast: f64, prev_slow: f64, fast: f64, slow: f64) -> Option<Direction> {
    if prev_fast <= prev_slow && fast > slow {
        Some(Direction::Up)
    } else if prev_fast >= prev_slow && fast < slow {
        Some(Direction::Down)
    } else {
        None
    }
}

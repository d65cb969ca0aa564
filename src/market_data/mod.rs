pub mod cleaner;
pub mod series_store;

// Re-export for convenient access (e.g. `use crate::market_data::SeriesStore`).
pub use cleaner::{preprocess, CleaningReport};
pub use series_store::{Row, SeriesStore};

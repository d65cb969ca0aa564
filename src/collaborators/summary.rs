use tracing::{info, warn};

use crate::collaborators::Visualizer;
use crate::export::ExportRow;
use crate::indicators::IndicatorSet;

/// Renders a compact textual summary of a run through the log.
#[derive(Debug, Clone, Default)]
pub struct SummaryVisualizer;

impl Visualizer for SummaryVisualizer {
    fn render(&self, symbol: &str, rows: &[ExportRow], indicators: &IndicatorSet) -> anyhow::Result<()> {
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            warn!(symbol, "nothing to summarise: exported table is empty");
            return Ok(());
        };

        info!(
            symbol,
            from = %first.date,
            to = %last.date,
            rows = rows.len(),
            close = last.close,
            "series summary"
        );

        if let Some((rsi, zone)) = indicators.latest_rsi_zone() {
            info!(symbol, rsi = %format!("{rsi:.2}"), zone = %zone, "latest RSI");
        }

        if let (Some(macd), Some(signal), Some(histogram)) = (
            indicators.macd.last(),
            indicators.signal.last(),
            indicators.histogram.last(),
        ) {
            info!(
                symbol,
                macd = %format!("{macd:.4}"),
                signal = %format!("{signal:.4}"),
                histogram = %format!("{histogram:+.4}"),
                "latest MACD"
            );
        }

        if let (Some(upper), Some(middle), Some(lower)) = (
            indicators.upper_band.last(),
            indicators.middle_band.last(),
            indicators.lower_band.last(),
        ) {
            info!(
                symbol,
                upper = %format!("{upper:.4}"),
                middle = %format!("{middle:.4}"),
                lower = %format!("{lower:.4}"),
                "latest Bollinger Bands"
            );
        }

        Ok(())
    }
}

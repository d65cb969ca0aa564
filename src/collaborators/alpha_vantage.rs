// =============================================================================
// Alpha Vantage Daily Source — TIME_SERIES_DAILY over HTTPS
// =============================================================================
//
// SECURITY: The API key is never logged.  The provider signals failures with
// HTTP 200 and an "Error Message", "Note" or "Information" field, so the body
// is inspected before the series is parsed.
// =============================================================================

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::collaborators::DataSource;
use crate::errors::PipelineError;
use crate::market_data::Row;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
const SERIES_KEY: &str = "Time Series (Daily)";
const SOURCE_NAME: &str = "alpha-vantage";

/// Daily quote source backed by the Alpha Vantage REST API.
#[derive(Clone)]
pub struct AlphaVantageSource {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl AlphaVantageSource {
    /// Create a source using the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, PipelineError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a source against a custom endpoint (proxies, test servers).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| source_error(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.into();
        debug!(base_url = %base_url, "AlphaVantageSource initialised");

        Ok(Self {
            api_key: api_key.into(),
            base_url,
            client,
        })
    }
}

impl DataSource for AlphaVantageSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    #[instrument(skip(self), name = "alpha_vantage::fetch")]
    async fn fetch(&self, symbol: &str) -> Result<Vec<Row>, PipelineError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| source_error(format!("request failed: {}", e.without_url())))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(source_error(format!("HTTP {status}")));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| source_error(format!("invalid JSON body: {}", e.without_url())))?;

        let rows = parse_daily_series(&body)?;
        info!(symbol, rows = rows.len(), "daily quotes fetched");
        Ok(rows)
    }
}

/// Extract the daily series from a `TIME_SERIES_DAILY` response, oldest
/// first.
pub fn parse_daily_series(body: &Value) -> Result<Vec<Row>, PipelineError> {
    let Some(series) = body.get(SERIES_KEY).and_then(Value::as_object) else {
        let reason = ["Error Message", "Note", "Information"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_str))
            .unwrap_or("response has no daily series");
        return Err(source_error(reason.to_string()));
    };

    let mut dated: Vec<(NaiveDate, Row)> = Vec::with_capacity(series.len());
    for (date, fields) in series {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| source_error(format!("unparseable date {date:?}")))?;

        let row = Row {
            date: date.clone(),
            open: field_f64(fields, "1. open", date)?,
            high: field_f64(fields, "2. high", date)?,
            low: field_f64(fields, "3. low", date)?,
            close: field_f64(fields, "4. close", date)?,
            volume: field_f64(fields, "5. volume", date)?,
        };
        dated.push((day, row));
    }

    dated.sort_by_key(|(day, _)| *day);
    Ok(dated.into_iter().map(|(_, row)| row).collect())
}

// =============================================================================
// Internal helpers
// =============================================================================

fn field_f64(fields: &Value, key: &str, date: &str) -> Result<f64, PipelineError> {
    let raw = fields
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| source_error(format!("{date}: missing {key:?}")))?;
    raw.parse::<f64>()
        .map_err(|_| source_error(format!("{date}: {key:?} is not a number: {raw:?}")))
}

fn source_error(reason: String) -> PipelineError {
    PipelineError::Source {
        source_name: SOURCE_NAME.to_string(),
        reason,
    }
}

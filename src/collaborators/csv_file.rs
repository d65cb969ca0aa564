use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::collaborators::DataSource;
use crate::errors::PipelineError;
use crate::market_data::Row;

/// Input column order. Close precedes High and Low.
pub const INPUT_COLUMNS: [&str; 6] = ["Date", "Open", "Close", "High", "Low", "Volume"];

/// Reads a local delimited file in [`INPUT_COLUMNS`] order.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for CsvFileSource {
    fn name(&self) -> &str {
        "csv-file"
    }

    async fn fetch(&self, symbol: &str) -> Result<Vec<Row>, PipelineError> {
        let file = File::open(&self.path)?;
        let rows = read_quotes(file)?;
        info!(
            symbol,
            path = %self.path.display(),
            rows = rows.len(),
            "quotes loaded from file"
        );
        Ok(rows)
    }
}

/// Parse a quote table. The first line is a header and is skipped; columns
/// are positional.
///
/// Any malformed number or short row fails the whole read.
pub fn read_quotes<R: Read>(reader: R) -> Result<Vec<Row>, PipelineError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line());
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(parse_record(&record, line)?);
    }

    debug!(rows = rows.len(), "quote table parsed");
    Ok(rows)
}

/// Write quotes in [`INPUT_COLUMNS`] order, with header.
pub fn write_quotes<W: Write>(rows: &[Row], writer: W) -> Result<(), PipelineError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(INPUT_COLUMNS)?;
    for row in rows {
        out.write_record(&[
            row.date.clone(),
            row.open.to_string(),
            row.close.to_string(),
            row.high.to_string(),
            row.low.to_string(),
            row.volume.to_string(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Write quotes to `path`, creating parent directories as needed.
pub fn write_quotes_file(rows: &[Row], path: impl AsRef<Path>) -> Result<(), PipelineError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_quotes(rows, File::create(path)?)?;
    info!(path = %path.display(), rows = rows.len(), "raw quotes written");
    Ok(())
}

// =============================================================================
// Internal helpers
// =============================================================================

fn parse_record(record: &StringRecord, line: u64) -> Result<Row, PipelineError> {
    let text = |idx: usize| -> Result<&str, PipelineError> {
        record
            .get(idx)
            .filter(|s| !s.is_empty())
            .ok_or(PipelineError::MissingField {
                line,
                column: INPUT_COLUMNS[idx],
            })
    };
    let number = |idx: usize| -> Result<f64, PipelineError> {
        let raw = text(idx)?;
        raw.parse::<f64>().map_err(|_| PipelineError::Parse {
            line,
            column: INPUT_COLUMNS[idx],
            value: raw.to_string(),
        })
    };

    Ok(Row {
        date: text(0)?.to_string(),
        open: number(1)?,
        close: number(2)?,
        high: number(3)?,
        low: number(4)?,
        volume: number(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Date,Open,Close,High,Low,Volume
2024-01-02,187.15,185.64,188.44,183.89,82488700
2024-01-03,184.22,184.25,185.88,183.43,58414500
";

    #[test]
    fn columns_are_read_in_input_order() {
        let rows = read_quotes(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2024-01-02");
        assert_eq!(rows[0].open, 187.15);
        assert_eq!(rows[0].close, 185.64);
        assert_eq!(rows[0].high, 188.44);
        assert_eq!(rows[0].low, 183.89);
        assert_eq!(rows[0].volume, 82_488_700.0);
    }

    #[test]
    fn header_only_yields_no_rows() {
        let rows = read_quotes("Date,Open,Close,High,Low,Volume\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn malformed_number_is_fatal() {
        let text = "Date,Open,Close,High,Low,Volume\n2024-01-02,1.0,abc,1.0,1.0,1.0\n";
        match read_quotes(text.as_bytes()) {
            Err(PipelineError::Parse { line, column, value }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "Close");
                assert_eq!(value, "abc");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn short_row_is_fatal() {
        let text = "Date,Open,Close,High,Low,Volume\n2024-01-02,1.0,2.0\n";
        match read_quotes(text.as_bytes()) {
            Err(PipelineError::MissingField { column, .. }) => assert_eq!(column, "High"),
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn written_quotes_read_back() {
        let rows = read_quotes(SAMPLE.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_quotes(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Date,Open,Close,High,Low,Volume\n"));
        assert_eq!(read_quotes(text.as_bytes()).unwrap(), rows);
    }

    #[tokio::test]
    async fn file_source_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fetched_stock_data.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let source = CsvFileSource::new(&path);
        let rows = source.fetch("AAPL").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(source.name(), "csv-file");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = CsvFileSource::new("/nonexistent/quotes.csv");
        assert!(matches!(source.fetch("AAPL").await, Err(PipelineError::Io(_))));
    }
}

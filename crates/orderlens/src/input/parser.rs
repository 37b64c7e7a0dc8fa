//! Format-agnostic parser producing a [`Table`].

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OrderlensError, Result};
use crate::table::{Column, Table};

use super::format::FileFormat;
use super::infer::infer_column;
use super::source::SourceMetadata;
use super::{columnar, json, spreadsheet};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter for delimited text (None = auto-detect; `.tsv` always uses tab).
    pub delimiter: Option<u8>,
    /// Whether the first row of delimited text is a header.
    pub has_header: bool,
    /// Maximum data rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Cell texts read as null in delimited text.
    pub null_values: Vec<String>,
    /// Worksheet to read from a workbook (None = first sheet).
    pub sheet_name: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            null_values: vec![String::new()],
            sheet_name: None,
        }
    }
}

/// Parses raw bytes into tables.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse bytes declared to be in `format`.
    pub fn parse_bytes(&self, bytes: &[u8], format: FileFormat) -> Result<Table> {
        let table = match format {
            FileFormat::Csv => {
                let delimiter = match self.config.delimiter {
                    Some(d) => d,
                    None => detect_delimiter(bytes)?,
                };
                self.parse_delimited(bytes, delimiter, format)?
            }
            FileFormat::Tsv => self.parse_delimited(bytes, b'\t', format)?,
            FileFormat::Json => json::read_json(bytes)?,
            FileFormat::NdJson => json::read_ndjson(bytes)?,
            FileFormat::Parquet => columnar::read_parquet(bytes)?,
            FileFormat::Spreadsheet => {
                spreadsheet::read_spreadsheet(bytes, self.config.sheet_name.as_deref())?
            }
        };

        let table = match self.config.max_rows {
            Some(max) if !format.is_delimited() && table.row_count() > max => table.head(max),
            _ => table,
        };

        debug!(
            format = %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed input"
        );
        Ok(table)
    }

    /// Parse bytes and describe where they came from.
    pub fn parse_with_metadata(
        &self,
        bytes: &[u8],
        format: FileFormat,
    ) -> Result<(Table, SourceMetadata)> {
        let table = self.parse_bytes(bytes, format)?;
        let metadata = SourceMetadata::new(bytes, format, table.row_count(), table.column_count());
        Ok((table, metadata))
    }

    /// Parse a file, choosing the format from its extension.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;

        let contents = fs::read(path).map_err(|e| OrderlensError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (table, metadata) = self.parse_with_metadata(&contents, format)?;
        Ok((table, metadata.with_path(path.to_path_buf())))
    }

    /// Parse delimited text; the header row names the columns.
    fn parse_delimited(&self, bytes: &[u8], delimiter: u8, format: FileFormat) -> Result<Table> {
        let fmt = format.to_string();
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(OrderlensError::malformed(fmt, "input is empty"));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .from_reader(bytes);

        let mut rows: Vec<Vec<String>> = Vec::new();

        let headers: Vec<String> = if self.config.has_header {
            reader
                .headers()
                .map_err(|e| OrderlensError::malformed(&fmt, e))?
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            // Without a header the first record names the columns and is also data
            let mut first = csv::StringRecord::new();
            match reader.read_record(&mut first) {
                Ok(true) => {
                    if self.config.max_rows != Some(0) {
                        rows.push(first.iter().map(|s| s.to_string()).collect());
                    }
                    (0..first.len()).map(|i| format!("column_{}", i + 1)).collect()
                }
                Ok(false) => return Err(OrderlensError::malformed(&fmt, "no data rows found")),
                Err(e) => return Err(OrderlensError::malformed(&fmt, e)),
            }
        };

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(OrderlensError::malformed(&fmt, "missing header row"));
        }

        for result in reader.records() {
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }
            let record = result.map_err(|e| OrderlensError::malformed(&fmt, e))?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        // Transpose into columns of optional cells
        let mut cells: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(rows.len()); headers.len()];
        for row in rows {
            for (col, value) in cells.iter_mut().zip(row) {
                col.push(if self.is_null_value(&value) { None } else { Some(value) });
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, col)| Column::new(name, infer_column(col)))
            .collect();

        Table::new(columns).map_err(|e| OrderlensError::malformed(fmt, e))
    }

    /// Check if a cell text is one of the configured null tokens.
    fn is_null_value(&self, value: &str) -> bool {
        self.config.null_values.iter().any(|n| n == value)
    }
}

/// Ingest bytes using the default parser configuration.
///
/// `format_hint` is a file extension such as `.csv` or `xlsx`.
pub fn ingest(bytes: &[u8], format_hint: &str) -> Result<Table> {
    ingest_with_config(bytes, format_hint, &ParserConfig::default())
}

/// Ingest bytes with an explicit parser configuration.
pub fn ingest_with_config(bytes: &[u8], format_hint: &str, config: &ParserConfig) -> Result<Table> {
    let format = FileFormat::from_extension(format_hint)?;
    Parser::with_config(config.clone()).parse_bytes(bytes, format)
}

/// Pick the delimiter whose per-line count is highest and most stable over
/// the first ten non-blank lines. Comma wins exact ties.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();
    if lines.is_empty() {
        return Err(OrderlensError::malformed("csv", "input is empty"));
    }

    let score = |delimiter: u8| -> usize {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| unquoted_count(line, delimiter))
            .collect();
        let first = counts[0];
        if first == 0 {
            return 0;
        }
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let spread = counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>()
            / counts.len() as f64;

        if counts.iter().all(|&c| c == first) {
            first * 1000 + usize::from(delimiter == b',')
        } else if spread < 1.0 {
            first * 100
        } else {
            first
        }
    };

    Ok(DELIMITERS
        .iter()
        .copied()
        .map(|d| (d, score(d)))
        .filter(|&(_, s)| s > 0)
        .fold((b',', 0), |best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .0)
}

/// Occurrences of `delimiter` outside double quotes.
fn unquoted_count(line: &str, delimiter: u8) -> usize {
    let delimiter = delimiter as char;
    let mut in_quotes = false;
    line.chars()
        .filter(|&ch| {
            if ch == '"' {
                in_quotes = !in_quotes;
            }
            ch == delimiter && !in_quotes
        })
        .count()
}

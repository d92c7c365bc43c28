use chrono::NaiveDateTime;
use csv::WriterBuilder;
use masterhub_core::{AppError, AppResult};

use super::ImportRow;

const BYTE_ORDER_MARK: &[u8] = "\u{feff}".as_bytes();

/// Header of the leading row-number column of an error report.
pub const ROW_NUMBER_HEADER: &str = "Row";
/// Header of the trailing message column of an error report.
pub const ERRORS_HEADER: &str = "Errors";

/// Returns `<prefix>_<yyyyMMddHHmmss>.csv`.
#[must_use]
pub fn timestamped_file_name(prefix: &str, at: NaiveDateTime) -> String {
    format!("{prefix}_{}.csv", at.format("%Y%m%d%H%M%S"))
}

/// In-memory CSV table written as UTF-8 with a byte order mark, so
/// spreadsheet tools detect the encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDocument {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvDocument {
    /// Creates an empty document with the given header row.
    #[must_use]
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a data row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Returns the header row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Serializes the document.
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_writer(BYTE_ORDER_MARK.to_vec());

        writer
            .write_record(&self.headers)
            .map_err(|error| AppError::Internal(format!("failed to write CSV header: {error}")))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|error| AppError::Internal(format!("failed to write CSV row: {error}")))?;
        }

        writer
            .into_inner()
            .map_err(|error| AppError::Internal(format!("failed to flush CSV output: {error}")))
    }
}

/// One rejected row. Row `0` marks a failure not tied to a specific row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReportEntry {
    /// Line number in the uploaded file.
    pub row_number: usize,
    /// Original values aligned with the report headers.
    pub values: Vec<String>,
    /// Messages joined with ` / `.
    pub message: String,
}

/// Rows rejected by an import, with their original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    headers: Vec<String>,
    entries: Vec<ErrorReportEntry>,
    file_prefix: String,
}

impl ErrorReport {
    /// Creates an empty report for the given headers.
    #[must_use]
    pub fn new(headers: &[&str], file_prefix: &str) -> Self {
        Self {
            headers: headers.iter().map(|header| (*header).to_owned()).collect(),
            entries: Vec::new(),
            file_prefix: file_prefix.to_owned(),
        }
    }

    /// Adds a rejected row with its messages.
    pub fn push_row(&mut self, row: &ImportRow, messages: &[String]) {
        self.entries.push(ErrorReportEntry {
            row_number: row.row_number(),
            values: row.values_for(&self.headers),
            message: messages.join(" / "),
        });
    }

    /// Adds a row-0 entry with blank values.
    pub fn push_general(&mut self, message: impl Into<String>) {
        self.entries.push(ErrorReportEntry {
            row_number: 0,
            values: vec![String::new(); self.headers.len()],
            message: message.into(),
        });
    }

    /// Returns whether the report has no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ErrorReportEntry] {
        &self.entries
    }

    /// Returns the report file name for a timestamp.
    #[must_use]
    pub fn file_name(&self, at: NaiveDateTime) -> String {
        timestamped_file_name(&self.file_prefix, at)
    }

    /// Builds the `Row, <headers>, Errors` table.
    #[must_use]
    pub fn to_document(&self) -> CsvDocument {
        let mut headers = Vec::with_capacity(self.headers.len() + 2);
        headers.push(ROW_NUMBER_HEADER.to_owned());
        headers.extend(self.headers.iter().cloned());
        headers.push(ERRORS_HEADER.to_owned());

        let mut document = CsvDocument::new(headers);
        for entry in &self.entries {
            let mut row = Vec::with_capacity(entry.values.len() + 2);
            row.push(entry.row_number.to_string());
            row.extend(entry.values.iter().cloned());
            row.push(entry.message.clone());
            document.push_row(row);
        }
        document
    }

    /// Serializes the report.
    pub fn to_csv_bytes(&self) -> AppResult<Vec<u8>> {
        self.to_document().to_bytes()
    }
}

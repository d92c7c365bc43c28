use std::fmt::{Display, Formatter};
use std::str::FromStr;

use csv::ReaderBuilder;
use masterhub_core::{AppError, AppResult};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Field delimiter of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvDelimiter(u8);

impl CsvDelimiter {
    /// Comma, the default delimiter.
    pub const COMMA: Self = Self(b',');
    /// Horizontal tab.
    pub const TAB: Self = Self(b'\t');

    /// Returns the delimiter byte.
    #[must_use]
    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl Default for CsvDelimiter {
    fn default() -> Self {
        Self::COMMA
    }
}

impl Display for CsvDelimiter {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            b'\t' => write!(formatter, "tab"),
            other => write!(formatter, "{}", char::from(other)),
        }
    }
}

impl FromStr for CsvDelimiter {
    type Err = AppError;

    /// Accepts a single printable ASCII character, `tab` or `\t`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("tab") || value == "\\t" || value == "\t" {
            return Ok(Self::TAB);
        }

        match value.as_bytes() {
            [byte] if byte.is_ascii_punctuation() || *byte == b' ' => {
                if *byte == b'"' {
                    return Err(AppError::Validation(
                        "the quote character cannot be used as a delimiter".to_owned(),
                    ));
                }
                Ok(Self(*byte))
            }
            _ => Err(AppError::Validation(format!(
                "invalid CSV delimiter '{value}': use a single punctuation character or 'tab'"
            ))),
        }
    }
}

/// One data row of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    row_number: usize,
    fields: Vec<(String, String)>,
}

impl ImportRow {
    /// Creates a row from ordered `(header, value)` pairs.
    #[must_use]
    pub fn new(row_number: usize, fields: Vec<(String, String)>) -> Self {
        Self { row_number, fields }
    }

    /// Returns the line number of the row; the header is line 1.
    #[must_use]
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// Returns the raw value of a column, or `""` when the column is absent.
    #[must_use]
    pub fn get(&self, header: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == header)
            .map_or("", |(_, value)| value.as_str())
    }

    /// Returns the raw values for `headers`, in that order.
    #[must_use]
    pub fn values_for(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|header| self.get(header).to_owned())
            .collect()
    }
}

/// Headers and rows of a decoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCsv {
    /// Trimmed, non-empty header names in file order.
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<ImportRow>,
}

/// Decodes `bytes` and checks that every `expected` header is present.
///
/// Unknown headers are tolerated. Blank header cells are dropped together
/// with their column.
pub fn parse_csv(bytes: &[u8], delimiter: CsvDelimiter, expected: &[&str]) -> AppResult<ParsedCsv> {
    let text = std::str::from_utf8(bytes).map_err(|error| {
        AppError::Validation(format!("the CSV file must be UTF-8 encoded: {error}"))
    })?;
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<(usize, String)> = reader
        .headers()
        .map_err(|error| AppError::Validation(format!("failed to read CSV header: {error}")))?
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let name = name.trim();
            (!name.is_empty()).then(|| (index, name.to_owned()))
        })
        .collect();
    let headers: Vec<String> = columns.iter().map(|(_, name)| name.clone()).collect();

    check_headers(&headers, expected)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let row_number = index + 2;
        let record = record.map_err(|error| {
            AppError::Validation(format!("malformed CSV record at row {row_number}: {error}"))
        })?;

        let fields = columns
            .iter()
            .map(|(position, name)| {
                (name.clone(), record.get(*position).unwrap_or_default().to_owned())
            })
            .collect();
        rows.push(ImportRow::new(row_number, fields));
    }

    Ok(ParsedCsv { headers, rows })
}

fn check_headers(actual: &[String], expected: &[&str]) -> AppResult<()> {
    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|name| !actual.iter().any(|header| header == name))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let mut message = format!("invalid CSV header. missing: {}", missing.join(", "));
    if let [only] = actual
        && only.contains(',')
    {
        message.push_str(" (the header was read as a single column; check the delimiter)");
    }

    Err(AppError::Validation(message))
}

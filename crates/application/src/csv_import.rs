//! Transactional CSV bulk import.
//!
//! An import either writes every row of a file in one atomic batch or writes
//! nothing and returns an [`ErrorReport`] listing each rejected row with its
//! original values. Entity specifics (headers, field rules, persistence) are
//! plugged in through [`ImportProfile`].

mod parser;
mod profile;
mod report;
mod service;
mod validator;

#[cfg(test)]
mod tests;

pub use parser::{CsvDelimiter, ImportRow, ParsedCsv, parse_csv};
pub use profile::{FieldCheck, ImportMessages, ImportProfile};
pub use report::{CsvDocument, ErrorReport, ErrorReportEntry, timestamped_file_name};
pub use service::{CsvImporter, INTEGRITY_FAILURE_MESSAGE, ImportResult};
pub use validator::{RowCheck, RowValidationOutcome, SeenKeys, ValidRow, validate_row};

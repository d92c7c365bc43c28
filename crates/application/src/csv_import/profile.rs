use std::hash::Hash;

use async_trait::async_trait;
use masterhub_core::{AppResult, UserIdentity};

use super::ImportRow;

/// Entity-specific wording of row errors raised by the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportMessages {
    /// The row repeats a key seen earlier in the same file.
    pub duplicate_in_file: &'static str,
    /// A stored record already uses the row's key.
    pub already_registered: &'static str,
    /// A record with the row's key appeared between validation and the write.
    pub concurrent_duplicate: &'static str,
}

/// Outcome of the field-level checks of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck<D> {
    /// Errors from mapping categorical labels to codes.
    pub label_errors: Vec<String>,
    /// Errors from field validation, formatted `field: message / message`.
    pub field_errors: Vec<String>,
    /// Validated record, present only when both error lists are empty.
    pub draft: Option<D>,
}

impl<D> FieldCheck<D> {
    /// Builds a passing check.
    #[must_use]
    pub fn passed(draft: D) -> Self {
        Self {
            label_errors: Vec::new(),
            field_errors: Vec::new(),
            draft: Some(draft),
        }
    }
}

/// Plugs one entity type into the generic importer.
#[async_trait]
pub trait ImportProfile: Send + Sync {
    /// Validated record ready to be written.
    type Draft: Clone + Send + Sync;
    /// Business key that must be unique within a tenant.
    type Key: Clone + Eq + Hash + Send + Sync;

    /// Expected headers, in error-report column order.
    fn headers(&self) -> &'static [&'static str];

    /// File name prefix of the error report.
    fn error_file_prefix(&self) -> &'static str;

    /// Row error wording.
    fn messages(&self) -> ImportMessages;

    /// Returns the row's business key, or `None` when a key component is blank.
    fn duplicate_key(&self, row: &ImportRow) -> Option<Self::Key>;

    /// Maps labels and validates fields of a row.
    fn check_fields(&self, row: &ImportRow) -> FieldCheck<Self::Draft>;

    /// Returns whether a stored record of the actor's tenant uses `key`.
    async fn is_registered(&self, actor: &UserIdentity, key: &Self::Key) -> AppResult<bool>;

    /// Writes every draft atomically and returns the number of records created.
    ///
    /// Must fail with `AppError::Conflict` on a uniqueness violation and leave
    /// storage untouched on any failure.
    async fn create_all(&self, actor: &UserIdentity, drafts: Vec<Self::Draft>) -> AppResult<usize>;
}

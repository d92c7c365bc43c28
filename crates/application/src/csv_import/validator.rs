use std::collections::HashSet;
use std::hash::Hash;

use super::{FieldCheck, ImportProfile, ImportRow};

/// Keys already seen earlier in the same file.
#[derive(Debug, Clone)]
pub struct SeenKeys<K>(HashSet<K>);

impl<K: Eq + Hash> SeenKeys<K> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    /// Records `key`, returning `false` when it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.0.insert(key)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Eq + Hash> Default for SeenKeys<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A row that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRow<D, K> {
    /// Source row with its original values.
    pub row: ImportRow,
    /// Validated record.
    pub draft: D,
    /// Business key, kept for conflict recovery.
    pub key: Option<K>,
}

/// Final verdict on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValidationOutcome<D, K> {
    /// Row can be written.
    Valid(ValidRow<D, K>),
    /// Row is rejected with these messages.
    Invalid(Vec<String>),
}

/// In-progress result of checking one row.
#[derive(Debug, Clone)]
pub struct RowCheck<D, K> {
    row: ImportRow,
    errors: Vec<String>,
    key: Option<K>,
    draft: Option<D>,
}

impl<D, K> RowCheck<D, K> {
    /// Returns the business key computed for the row.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Returns the messages collected so far.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Appends a message.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Returns the source row.
    #[must_use]
    pub fn row(&self) -> &ImportRow {
        &self.row
    }

    /// Turns the check into a verdict.
    #[must_use]
    pub fn into_outcome(self) -> RowValidationOutcome<D, K> {
        match self.draft {
            Some(draft) if self.errors.is_empty() => RowValidationOutcome::Valid(ValidRow {
                row: self.row,
                draft,
                key: self.key,
            }),
            _ => RowValidationOutcome::Invalid(self.errors),
        }
    }
}

/// Runs the storage-independent checks on a row: label mapping, in-file
/// duplicate detection and field validation, in that order.
///
/// Every check runs even after a failure. The key is added to `seen` even when
/// the row has other errors so later rows with the same key are still flagged.
pub fn validate_row<P: ImportProfile>(
    profile: &P,
    row: &ImportRow,
    seen: &mut SeenKeys<P::Key>,
) -> RowCheck<P::Draft, P::Key> {
    let FieldCheck {
        label_errors,
        field_errors,
        draft,
    } = profile.check_fields(row);

    let mut errors = label_errors;

    let key = profile.duplicate_key(row);
    if let Some(key) = &key
        && !seen.insert(key.clone())
    {
        errors.push(profile.messages().duplicate_in_file.to_owned());
    }

    errors.extend(field_errors);

    RowCheck {
        row: row.clone(),
        errors,
        key,
        draft,
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Soft-delete flag and audit columns shared by every master-data record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAudit {
    is_deleted: bool,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
}

impl RecordAudit {
    /// Creates audit data for a record persisted by `subject` at `now`.
    #[must_use]
    pub fn created(subject: impl Into<String>, now: DateTime<Utc>) -> Self {
        let subject = subject.into();
        Self {
            is_deleted: false,
            created_at: now,
            created_by: subject.clone(),
            updated_at: now,
            updated_by: subject,
        }
    }

    /// Rehydrates audit data loaded from storage.
    #[must_use]
    pub fn from_parts(
        is_deleted: bool,
        created_at: DateTime<Utc>,
        created_by: impl Into<String>,
        updated_at: DateTime<Utc>,
        updated_by: impl Into<String>,
    ) -> Self {
        Self {
            is_deleted,
            created_at,
            created_by: created_by.into(),
            updated_at,
            updated_by: updated_by.into(),
        }
    }

    /// Returns a copy touched by `subject` at `now`, optionally flipping the deletion flag.
    #[must_use]
    pub fn touched(&self, subject: impl Into<String>, now: DateTime<Utc>, is_deleted: bool) -> Self {
        Self {
            is_deleted,
            created_at: self.created_at,
            created_by: self.created_by.clone(),
            updated_at: now,
            updated_by: subject.into(),
        }
    }

    /// Returns whether the record is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the subject that created the record.
    #[must_use]
    pub fn created_by(&self) -> &str {
        self.created_by.as_str()
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the subject that last updated the record.
    #[must_use]
    pub fn updated_by(&self) -> &str {
        self.updated_by.as_str()
    }
}

use masterhub_core::{AppError, AppResult, UserIdentity};
use tracing::{error, info, warn};

use super::{
    CsvDelimiter, ErrorReport, ImportProfile, RowValidationOutcome, SeenKeys, ValidRow, parse_csv,
    validate_row,
};

/// Row-0 message for a failed write whose cause cannot be tied to a row.
pub const INTEGRITY_FAILURE_MESSAGE: &str =
    "an integrity error occurred while saving; please run the CSV import again";

/// Result of one import call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResult {
    /// Every row was written.
    Success {
        /// Number of records created.
        created: usize,
    },
    /// Nothing was written.
    Failure(ErrorReport),
}

/// Validates an uploaded file and writes it all-or-nothing.
///
/// There is no lock between the per-row existence check and the write. A
/// concurrent import can insert a colliding key in between; the write then
/// fails on the unique constraint and the colliding rows are found again by
/// re-querying storage. The caller resubmits; nothing is retried here.
pub struct CsvImporter<P> {
    profile: P,
}

impl<P: ImportProfile> CsvImporter<P> {
    /// Creates an importer for one entity type.
    #[must_use]
    pub fn new(profile: P) -> Self {
        Self { profile }
    }

    #[cfg(test)]
    pub(crate) fn profile(&self) -> &P {
        &self.profile
    }

    /// Runs the import for the actor's tenant.
    ///
    /// Header and encoding problems are returned as `AppError::Validation`;
    /// row problems and write conflicts become an [`ErrorReport`].
    pub async fn run(
        &self,
        actor: &UserIdentity,
        bytes: &[u8],
        delimiter: CsvDelimiter,
    ) -> AppResult<ImportResult> {
        let headers = self.profile.headers();
        let parsed = parse_csv(bytes, delimiter, headers)?;
        if parsed.rows.is_empty() {
            return Ok(ImportResult::Success { created: 0 });
        }

        let messages = self.profile.messages();
        let mut report = ErrorReport::new(headers, self.profile.error_file_prefix());
        let mut seen = SeenKeys::new();
        let mut valid_rows = Vec::with_capacity(parsed.rows.len());

        for row in &parsed.rows {
            let mut check = validate_row(&self.profile, row, &mut seen);
            if let Some(key) = check.key()
                && self.profile.is_registered(actor, key).await?
            {
                check.push_error(messages.already_registered);
            }

            match check.into_outcome() {
                RowValidationOutcome::Valid(valid_row) => valid_rows.push(valid_row),
                RowValidationOutcome::Invalid(errors) => report.push_row(row, &errors),
            }
        }

        if !report.is_empty() {
            info!(
                tenant_id = %actor.tenant_id(),
                rows = parsed.rows.len(),
                invalid_rows = report.entries().len(),
                "csv import rejected"
            );
            return Ok(ImportResult::Failure(report));
        }

        let drafts = valid_rows.iter().map(|valid| valid.draft.clone()).collect();
        match self.profile.create_all(actor, drafts).await {
            Ok(created) => {
                info!(
                    tenant_id = %actor.tenant_id(),
                    rows = parsed.rows.len(),
                    created,
                    "csv import committed"
                );
                Ok(ImportResult::Success { created })
            }
            Err(AppError::Conflict(detail)) => {
                warn!(tenant_id = %actor.tenant_id(), %detail, "csv import hit a write conflict");
                self.recover_conflicts(actor, &valid_rows, report).await
            }
            Err(write_error) => {
                error!(tenant_id = %actor.tenant_id(), error = %write_error, "csv import write failed");
                report.push_general(INTEGRITY_FAILURE_MESSAGE);
                Ok(ImportResult::Failure(report))
            }
        }
    }

    async fn recover_conflicts(
        &self,
        actor: &UserIdentity,
        valid_rows: &[ValidRow<P::Draft, P::Key>],
        mut report: ErrorReport,
    ) -> AppResult<ImportResult> {
        let message = self.profile.messages().concurrent_duplicate.to_owned();

        for valid in valid_rows {
            if let Some(key) = &valid.key
                && self.profile.is_registered(actor, key).await?
            {
                report.push_row(&valid.row, std::slice::from_ref(&message));
            }
        }

        if report.is_empty() {
            report.push_general(INTEGRITY_FAILURE_MESSAGE);
        }

        Ok(ImportResult::Failure(report))
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use masterhub_core::{AppResult, UserIdentity};
use masterhub_domain::{
    Partner, PartnerData, PartnerId, PartnerInput, PartnerKey, PartnerType, RecordAudit,
};

use super::PartnerRepository;
use crate::csv_import::{FieldCheck, ImportMessages, ImportProfile, ImportRow};

/// Column headers of partner CSV files, in file order.
pub const PARTNER_CSV_HEADERS: &[&str] = &[
    "Partner Name",
    "Partner Name Kana",
    "Partner Type",
    "Contact Name",
    "Phone Number",
    "Email",
    "Postal Code",
    "Prefecture",
    "City",
    "Address",
    "Building",
    "Deleted",
];

/// File name prefix of partner import error reports.
pub const PARTNER_IMPORT_ERROR_PREFIX: &str = "partners_import_error";

const PARTNER_TYPE_ERROR: &str =
    "partner type is invalid (expected one of: Customer / Supplier / Customer & Supplier)";

const PARTNER_IMPORT_MESSAGES: ImportMessages = ImportMessages {
    duplicate_in_file: "the same partner name + email appears more than once in this file",
    already_registered: "a partner with the same partner name + email is already registered",
    concurrent_duplicate: "a duplicate was created by a concurrent update (a partner with the same partner name + email is already registered)",
};

/// Imports partners keyed by partner name and email.
#[derive(Clone)]
pub struct PartnerImportProfile {
    repository: Arc<dyn PartnerRepository>,
}

impl PartnerImportProfile {
    /// Creates a profile writing through `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn PartnerRepository>) -> Self {
        Self { repository }
    }
}

fn column(row: &ImportRow, header: &str) -> Option<String> {
    Some(row.get(header).to_owned())
}

#[async_trait]
impl ImportProfile for PartnerImportProfile {
    type Draft = PartnerData;
    type Key = PartnerKey;

    fn headers(&self) -> &'static [&'static str] {
        PARTNER_CSV_HEADERS
    }

    fn error_file_prefix(&self) -> &'static str {
        PARTNER_IMPORT_ERROR_PREFIX
    }

    fn messages(&self) -> ImportMessages {
        PARTNER_IMPORT_MESSAGES
    }

    fn duplicate_key(&self, row: &ImportRow) -> Option<PartnerKey> {
        PartnerKey::from_raw(row.get("Partner Name"), row.get("Email"))
    }

    fn check_fields(&self, row: &ImportRow) -> FieldCheck<PartnerData> {
        let partner_type = PartnerType::from_label(row.get("Partner Type"));
        let label_errors = match partner_type {
            Some(_) => Vec::new(),
            None => vec![PARTNER_TYPE_ERROR.to_owned()],
        };

        let input = PartnerInput {
            partner_name: column(row, "Partner Name"),
            partner_name_kana: column(row, "Partner Name Kana"),
            partner_type,
            contact_name: column(row, "Contact Name"),
            tel_number: column(row, "Phone Number"),
            email: column(row, "Email"),
            postal_code: column(row, "Postal Code"),
            state: column(row, "Prefecture"),
            city: column(row, "City"),
            address: column(row, "Address"),
            address2: column(row, "Building"),
        };

        match input.validate() {
            Ok(data) => FieldCheck::passed(data),
            Err(mut errors) => {
                // An unknown label is already reported above.
                errors.discard("partner_type");
                FieldCheck {
                    label_errors,
                    field_errors: errors.to_messages(),
                    draft: None,
                }
            }
        }
    }

    async fn is_registered(&self, actor: &UserIdentity, key: &PartnerKey) -> AppResult<bool> {
        self.repository
            .exists_by_key(actor.tenant_id(), key)
            .await
    }

    async fn create_all(&self, actor: &UserIdentity, drafts: Vec<PartnerData>) -> AppResult<usize> {
        let now = Utc::now();
        let partners = drafts
            .into_iter()
            .map(|data| {
                Partner::new(
                    PartnerId::new(),
                    actor.tenant_id(),
                    data,
                    RecordAudit::created(actor.subject(), now),
                )
            })
            .collect();

        self.repository.create_many(partners).await
    }
}

use std::sync::Arc;

use chrono::Utc;
use masterhub_core::{AppError, AppResult, UserIdentity};
use masterhub_domain::{Ordering, Partner, PartnerId, PartnerInput, RecordAudit};

use super::export::partners_document;
use super::{PartnerImportProfile, PartnerRepository};
use crate::csv_import::{CsvDelimiter, CsvDocument, CsvImporter, ImportResult};
use crate::{ListQuery, Page, ascending};

/// Fields a partner list may be ordered by.
pub const PARTNER_ORDERING_FIELDS: &[&str] = &[
    "partner_name",
    "partner_type",
    "email",
    "tel_number",
    "created_at",
    "updated_at",
];

const DEFAULT_ORDERING: Ordering = ascending("partner_name");

const DUPLICATE_PARTNER: &str = "a partner with the same partner name + email is already registered";

/// Application service for partner master data.
#[derive(Clone)]
pub struct PartnerService {
    repository: Arc<dyn PartnerRepository>,
}

impl PartnerService {
    /// Creates a partner service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn PartnerRepository>) -> Self {
        Self { repository }
    }

    /// Lists partners of the actor's tenant.
    pub async fn list(&self, actor: &UserIdentity, query: &ListQuery) -> AppResult<Page<Partner>> {
        let ordering = query.resolve_ordering(PARTNER_ORDERING_FIELDS, DEFAULT_ORDERING);
        self.repository
            .list(actor.tenant_id(), query, ordering)
            .await
    }

    /// Returns one partner of the actor's tenant.
    pub async fn get(&self, actor: &UserIdentity, partner_id: PartnerId) -> AppResult<Partner> {
        self.repository
            .find(actor.tenant_id(), partner_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("partner '{partner_id}' does not exist")))
    }

    /// Validates and stores a new partner.
    pub async fn create(&self, actor: &UserIdentity, input: PartnerInput) -> AppResult<Partner> {
        let data = input.validate()?;
        if self
            .repository
            .exists_by_key(actor.tenant_id(), &data.key())
            .await?
        {
            return Err(AppError::Conflict(DUPLICATE_PARTNER.to_owned()));
        }

        let partner = Partner::new(
            PartnerId::new(),
            actor.tenant_id(),
            data,
            RecordAudit::created(actor.subject(), Utc::now()),
        );
        self.repository.create(partner.clone()).await?;
        Ok(partner)
    }

    /// Replaces the attributes of an existing partner.
    pub async fn update(
        &self,
        actor: &UserIdentity,
        partner_id: PartnerId,
        input: PartnerInput,
    ) -> AppResult<Partner> {
        let existing = self.get(actor, partner_id).await?;
        let data = input.validate()?;

        if data.key() != existing.data().key()
            && self
                .repository
                .exists_by_key(actor.tenant_id(), &data.key())
                .await?
        {
            return Err(AppError::Conflict(DUPLICATE_PARTNER.to_owned()));
        }

        let audit = existing
            .audit()
            .touched(actor.subject(), Utc::now(), existing.audit().is_deleted());
        let partner = existing.with_data(data).with_audit(audit);
        self.repository.update(partner.clone()).await?;
        Ok(partner)
    }

    /// Soft-deletes a partner.
    pub async fn delete(&self, actor: &UserIdentity, partner_id: PartnerId) -> AppResult<()> {
        self.set_deleted(actor, partner_id, true).await.map(|_| ())
    }

    /// Clears the soft-delete flag of a partner.
    pub async fn restore(&self, actor: &UserIdentity, partner_id: PartnerId) -> AppResult<Partner> {
        self.set_deleted(actor, partner_id, false).await
    }

    /// Imports partners from an uploaded CSV file, all or nothing.
    pub async fn import_partners(
        &self,
        actor: &UserIdentity,
        bytes: &[u8],
        delimiter: CsvDelimiter,
    ) -> AppResult<ImportResult> {
        CsvImporter::new(PartnerImportProfile::new(self.repository.clone()))
            .run(actor, bytes, delimiter)
            .await
    }

    /// Renders every partner matching the query's filters as CSV.
    pub async fn export_partners(
        &self,
        actor: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<CsvDocument> {
        let ordering = query.resolve_ordering(PARTNER_ORDERING_FIELDS, DEFAULT_ORDERING);
        let partners = self
            .repository
            .list_all(actor.tenant_id(), query, ordering)
            .await?;
        Ok(partners_document(&partners))
    }

    async fn set_deleted(
        &self,
        actor: &UserIdentity,
        partner_id: PartnerId,
        is_deleted: bool,
    ) -> AppResult<Partner> {
        let existing = self.get(actor, partner_id).await?;
        let audit = existing
            .audit()
            .touched(actor.subject(), Utc::now(), is_deleted);
        let partner = existing.with_audit(audit);
        self.repository.update(partner.clone()).await?;
        Ok(partner)
    }
}

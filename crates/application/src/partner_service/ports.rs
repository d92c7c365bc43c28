use async_trait::async_trait;
use masterhub_core::{AppResult, TenantId};
use masterhub_domain::{Ordering, Partner, PartnerId, PartnerKey};

use crate::{ListQuery, Page};

/// Repository port for partner persistence. Every call is tenant-scoped.
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Returns one page of partners matching the query.
    async fn list(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        ordering: Ordering,
    ) -> AppResult<Page<Partner>>;

    /// Returns every partner matching the query's filters, ignoring paging.
    async fn list_all(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        ordering: Ordering,
    ) -> AppResult<Vec<Partner>>;

    /// Finds a partner, including soft-deleted ones.
    async fn find(
        &self,
        tenant_id: TenantId,
        partner_id: PartnerId,
    ) -> AppResult<Option<Partner>>;

    /// Inserts a partner. Fails with `AppError::Conflict` when the key is taken.
    async fn create(&self, partner: Partner) -> AppResult<()>;

    /// Overwrites a partner's attributes and audit data.
    async fn update(&self, partner: Partner) -> AppResult<()>;

    /// Returns whether any partner of the tenant, deleted or not, uses `key`.
    async fn exists_by_key(&self, tenant_id: TenantId, key: &PartnerKey) -> AppResult<bool>;

    /// Inserts every partner in one transaction and returns the number inserted.
    ///
    /// Nothing is stored when any insert fails; a unique violation is reported
    /// as `AppError::Conflict`.
    async fn create_many(&self, partners: Vec<Partner>) -> AppResult<usize>;
}

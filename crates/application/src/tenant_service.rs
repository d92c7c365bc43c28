//! Tenant administration, restricted to staff users.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use masterhub_core::{AppError, AppResult, TenantId, UserIdentity};
use masterhub_domain::{Ordering, RecordAudit, Tenant, TenantInput};

use crate::{ListQuery, Page, ascending};

/// Fields a tenant list may be ordered by.
pub const TENANT_ORDERING_FIELDS: &[&str] = &["tenant_name", "created_at", "updated_at"];

const DEFAULT_ORDERING: Ordering = ascending("tenant_name");

/// Repository port for tenants.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Returns one page of tenants.
    async fn list(&self, query: &ListQuery, ordering: Ordering) -> AppResult<Page<Tenant>>;

    /// Finds a tenant, including soft-deleted ones.
    async fn find(&self, tenant_id: TenantId) -> AppResult<Option<Tenant>>;

    /// Inserts a tenant. Fails with `AppError::Conflict` when the email is taken.
    async fn create(&self, tenant: &Tenant) -> AppResult<()>;

    /// Overwrites a tenant. Fails with `AppError::Conflict` when the email is taken.
    async fn update(&self, tenant: &Tenant) -> AppResult<()>;
}

/// Application service for tenant administration.
#[derive(Clone)]
pub struct TenantService {
    repository: Arc<dyn TenantRepository>,
}

impl TenantService {
    /// Creates a tenant service.
    #[must_use]
    pub fn new(repository: Arc<dyn TenantRepository>) -> Self {
        Self { repository }
    }

    /// Lists tenants.
    pub async fn list(&self, actor: &UserIdentity, query: &ListQuery) -> AppResult<Page<Tenant>> {
        require_staff(actor)?;
        let ordering = query.resolve_ordering(TENANT_ORDERING_FIELDS, DEFAULT_ORDERING);
        self.repository.list(query, ordering).await
    }

    /// Returns one tenant.
    pub async fn get(&self, actor: &UserIdentity, tenant_id: TenantId) -> AppResult<Tenant> {
        require_staff(actor)?;
        self.find(tenant_id).await
    }

    /// Validates and stores a new tenant.
    pub async fn create(&self, actor: &UserIdentity, input: TenantInput) -> AppResult<Tenant> {
        require_staff(actor)?;
        let tenant = Tenant::new(
            TenantId::new(),
            input.validate()?,
            RecordAudit::created(actor.subject(), Utc::now()),
        );
        self.repository.create(&tenant).await?;
        Ok(tenant)
    }

    /// Replaces the attributes of a tenant.
    pub async fn update(
        &self,
        actor: &UserIdentity,
        tenant_id: TenantId,
        input: TenantInput,
    ) -> AppResult<Tenant> {
        require_staff(actor)?;
        let existing = self.find(tenant_id).await?;
        let data = input.validate()?;
        let audit = existing
            .audit()
            .touched(actor.subject(), Utc::now(), existing.audit().is_deleted());
        let tenant = existing.with_data(data).with_audit(audit);
        self.repository.update(&tenant).await?;
        Ok(tenant)
    }

    /// Soft-deletes a tenant.
    pub async fn delete(&self, actor: &UserIdentity, tenant_id: TenantId) -> AppResult<()> {
        self.set_deleted(actor, tenant_id, true).await.map(|_| ())
    }

    /// Clears the soft-delete flag of a tenant.
    pub async fn restore(&self, actor: &UserIdentity, tenant_id: TenantId) -> AppResult<Tenant> {
        self.set_deleted(actor, tenant_id, false).await
    }

    async fn find(&self, tenant_id: TenantId) -> AppResult<Tenant> {
        self.repository
            .find(tenant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("tenant '{tenant_id}' does not exist")))
    }

    async fn set_deleted(
        &self,
        actor: &UserIdentity,
        tenant_id: TenantId,
        is_deleted: bool,
    ) -> AppResult<Tenant> {
        require_staff(actor)?;
        let existing = self.find(tenant_id).await?;
        let audit = existing
            .audit()
            .touched(actor.subject(), Utc::now(), is_deleted);
        let tenant = existing.with_audit(audit);
        self.repository.update(&tenant).await?;
        Ok(tenant)
    }
}

fn require_staff(actor: &UserIdentity) -> AppResult<()> {
    if actor.is_staff() {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "subject '{}' may not administer tenants",
        actor.subject()
    )))
}

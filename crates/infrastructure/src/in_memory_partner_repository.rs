use std::cmp::Ordering as CmpOrdering;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use masterhub_application::{ListQuery, Page, PartnerRepository};
use masterhub_core::{AppError, AppResult, TenantId};
use masterhub_domain::{Ordering, Partner, PartnerId, PartnerKey, SortDirection};
use tokio::sync::RwLock;


/// In-memory partner repository implementation.
///
/// Enforces the same per-tenant business key uniqueness as the database.
#[derive(Debug, Default)]
pub struct InMemoryPartnerRepository {
    partners: RwLock<HashMap<PartnerId, Partner>>,
}

impl InMemoryPartnerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn matching(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        ordering: Ordering,
    ) -> Vec<Partner> {
        let search = query.search_term().map(str::to_lowercase);
        let partners = self.partners.read().await;

        let mut values: Vec<Partner> = partners
            .values()
            .filter(|partner| partner.tenant_id() == tenant_id)
            .filter(|partner| query.include_deleted || !partner.audit().is_deleted())
            .filter(|partner| {
                search
                    .as_deref()
                    .is_none_or(|term| matches_search(partner, term))
            })
            .cloned()
            .collect();

        values.sort_by(|left, right| {
            let ordered = compare_field(left, right, ordering.field());
            let ordered = match ordering.direction() {
                SortDirection::Asc => ordered,
                SortDirection::Desc => ordered.reverse(),
            };
            ordered.then_with(|| left.id().as_uuid().cmp(&right.id().as_uuid()))
        });

        values
    }
}

fn matches_search(partner: &Partner, term: &str) -> bool {
    let data = partner.data();
    [
        Some(data.partner_name()),
        data.partner_name_kana(),
        data.contact_name(),
        Some(data.email()),
        data.tel_number(),
    ]
    .into_iter()
    .flatten()
    .any(|value| value.to_lowercase().contains(term))
}

fn compare_field(left: &Partner, right: &Partner, field: &str) -> CmpOrdering {
    let (left_data, right_data) = (left.data(), right.data());
    match field {
        "partner_type" => left_data
            .partner_type()
            .as_str()
            .cmp(right_data.partner_type().as_str()),
        "email" => left_data.email().cmp(right_data.email()),
        "tel_number" => left_data.tel_number().cmp(&right_data.tel_number()),
        "created_at" => left.audit().created_at().cmp(&right.audit().created_at()),
        "updated_at" => left.audit().updated_at().cmp(&right.audit().updated_at()),
        _ => left_data.partner_name().cmp(right_data.partner_name()),
    }
}

fn key_conflict(key: &PartnerKey) -> AppError {
    AppError::Conflict(format!(
        "a partner with the same partner name + email is already registered ('{}', '{}')",
        key.partner_name(),
        key.email()
    ))
}

fn taken_keys(
    partners: &HashMap<PartnerId, Partner>,
    tenant_id: TenantId,
    except: Option<PartnerId>,
) -> HashSet<PartnerKey> {
    partners
        .values()
        .filter(|partner| partner.tenant_id() == tenant_id && Some(partner.id()) != except)
        .map(|partner| partner.data().key())
        .collect()
}

#[async_trait]
impl PartnerRepository for InMemoryPartnerRepository {
    async fn list(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        ordering: Ordering,
    ) -> AppResult<Page<Partner>> {
        let matching = self.matching(tenant_id, query, ordering).await;
        let count = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.page_offset() as usize)
            .take(query.page_size() as usize)
            .collect();

        Ok(Page { items, count })
    }

    async fn list_all(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        ordering: Ordering,
    ) -> AppResult<Vec<Partner>> {
        Ok(self.matching(tenant_id, query, ordering).await)
    }

    async fn find(
        &self,
        tenant_id: TenantId,
        partner_id: PartnerId,
    ) -> AppResult<Option<Partner>> {
        Ok(self
            .partners
            .read()
            .await
            .get(&partner_id)
            .filter(|partner| partner.tenant_id() == tenant_id)
            .cloned())
    }

    async fn create(&self, partner: Partner) -> AppResult<()> {
        self.create_many(vec![partner]).await.map(|_| ())
    }

    async fn update(&self, partner: Partner) -> AppResult<()> {
        let mut partners = self.partners.write().await;

        let exists = partners
            .get(&partner.id())
            .is_some_and(|stored| stored.tenant_id() == partner.tenant_id());
        if !exists {
            return Err(AppError::NotFound(format!(
                "partner '{}' does not exist",
                partner.id()
            )));
        }

        let key = partner.data().key();
        if taken_keys(&partners, partner.tenant_id(), Some(partner.id())).contains(&key) {
            return Err(key_conflict(&key));
        }

        partners.insert(partner.id(), partner);
        Ok(())
    }

    async fn exists_by_key(&self, tenant_id: TenantId, key: &PartnerKey) -> AppResult<bool> {
        Ok(self
            .partners
            .read()
            .await
            .values()
            .any(|partner| partner.tenant_id() == tenant_id && &partner.data().key() == key))
    }

    async fn create_many(&self, partners: Vec<Partner>) -> AppResult<usize> {
        let mut stored = self.partners.write().await;

        let mut taken: HashMap<TenantId, HashSet<PartnerKey>> = HashMap::new();
        for partner in &partners {
            let keys = taken
                .entry(partner.tenant_id())
                .or_insert_with(|| taken_keys(&stored, partner.tenant_id(), None));
            let key = partner.data().key();
            if !keys.insert(key.clone()) {
                return Err(key_conflict(&key));
            }
        }

        let created = partners.len();
        for partner in partners {
            stored.insert(partner.id(), partner);
        }

        Ok(created)
    }
}

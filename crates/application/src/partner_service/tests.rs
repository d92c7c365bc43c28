use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use masterhub_core::{AppError, AppResult, TenantId, UserIdentity};
use masterhub_domain::{Ordering, Partner, PartnerId, PartnerInput, PartnerKey, PartnerType};

use super::{PARTNER_CSV_HEADERS, PartnerRepository, PartnerService};
use crate::csv_import::{CsvDelimiter, ImportResult};
use crate::{ListQuery, Page};

#[derive(Default)]
struct FakePartnerRepository {
    partners: Mutex<HashMap<PartnerId, Partner>>,
    concurrent_insert: Mutex<Option<Partner>>,
}

impl FakePartnerRepository {
    fn key_taken(partners: &HashMap<PartnerId, Partner>, candidate: &Partner) -> bool {
        partners.values().any(|stored| {
            stored.tenant_id() == candidate.tenant_id()
                && stored.data().key() == candidate.data().key()
                && stored.id() != candidate.id()
        })
    }

    fn matching(
        partners: &HashMap<PartnerId, Partner>,
        tenant_id: TenantId,
        query: &ListQuery,
    ) -> Vec<Partner> {
        let needle = query.search_term().map(str::to_lowercase);
        let mut matching: Vec<Partner> = partners
            .values()
            .filter(|partner| partner.tenant_id() == tenant_id)
            .filter(|partner| query.include_deleted || !partner.audit().is_deleted())
            .filter(|partner| {
                needle.as_ref().is_none_or(|needle| {
                    partner.data().partner_name().to_lowercase().contains(needle)
                        || partner.data().email().to_lowercase().contains(needle)
                })
            })
            .cloned()
            .collect();
        matching.sort_by(|left, right| left.data().partner_name().cmp(right.data().partner_name()));
        matching
    }
}

#[async_trait]
impl PartnerRepository for FakePartnerRepository {
    async fn list(
        &self,
        tenant_id: TenantId,
        query: &ListQuery,
        _ordering: Ordering,
    ) -> AppResult<Page<Partner>> {
        let matching = Self::matching(&*self.partners.lock().await, tenant_id, query);
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
        _ordering: Ordering,
    ) -> AppResult<Vec<Partner>> {
        Ok(Self::matching(
            &*self.partners.lock().await,
            tenant_id,
            query,
        ))
    }

    async fn find(
        &self,
        tenant_id: TenantId,
        partner_id: PartnerId,
    ) -> AppResult<Option<Partner>> {
        Ok(self
            .partners
            .lock()
            .await
            .get(&partner_id)
            .filter(|partner| partner.tenant_id() == tenant_id)
            .cloned())
    }

    async fn create(&self, partner: Partner) -> AppResult<()> {
        let mut partners = self.partners.lock().await;
        if Self::key_taken(&partners, &partner) {
            return Err(AppError::Conflict("duplicate partner".to_owned()));
        }
        partners.insert(partner.id(), partner);
        Ok(())
    }

    async fn update(&self, partner: Partner) -> AppResult<()> {
        let mut partners = self.partners.lock().await;
        if Self::key_taken(&partners, &partner) {
            return Err(AppError::Conflict("duplicate partner".to_owned()));
        }
        partners.insert(partner.id(), partner);
        Ok(())
    }

    async fn exists_by_key(&self, tenant_id: TenantId, key: &PartnerKey) -> AppResult<bool> {
        Ok(self
            .partners
            .lock()
            .await
            .values()
            .any(|partner| partner.tenant_id() == tenant_id && &partner.data().key() == key))
    }

    async fn create_many(&self, new_partners: Vec<Partner>) -> AppResult<usize> {
        let mut partners = self.partners.lock().await;
        if let Some(concurrent) = self.concurrent_insert.lock().await.take() {
            partners.insert(concurrent.id(), concurrent);
        }

        let mut staged = partners.clone();
        for partner in &new_partners {
            if Self::key_taken(&staged, partner) {
                return Err(AppError::Conflict("duplicate partner".to_owned()));
            }
            staged.insert(partner.id(), partner.clone());
        }

        *partners = staged;
        Ok(new_partners.len())
    }
}

fn actor(tenant_id: TenantId, subject: &str) -> UserIdentity {
    UserIdentity::new(subject, subject, None, tenant_id)
}

fn input(name: &str, email: &str) -> PartnerInput {
    PartnerInput {
        partner_name: Some(name.to_owned()),
        partner_type: Some(PartnerType::Supplier),
        email: Some(email.to_owned()),
        ..PartnerInput::default()
    }
}

fn service() -> (PartnerService, Arc<FakePartnerRepository>) {
    let repository = Arc::new(FakePartnerRepository::default());
    (PartnerService::new(repository.clone()), repository)
}

fn header_line() -> String {
    PARTNER_CSV_HEADERS.join(",")
}

fn csv(rows: &[&str]) -> Vec<u8> {
    let mut text = header_line();
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text.into_bytes()
}

fn failure_rows(result: &ImportResult) -> Vec<(usize, String)> {
    match result {
        ImportResult::Failure(report) => report
            .entries()
            .iter()
            .map(|entry| (entry.row_number, entry.message.clone()))
            .collect(),
        ImportResult::Success { .. } => Vec::new(),
    }
}

async fn stored_count(repository: &FakePartnerRepository) -> usize {
    repository.partners.lock().await.len()
}

#[tokio::test]
async fn created_partner_is_only_visible_to_its_tenant() -> AppResult<()> {
    let (service, _) = service();
    let owner = actor(TenantId::new(), "alice");
    let outsider = actor(TenantId::new(), "bob");

    let created = service
        .create(&owner, input(" Acme ", "acme@example.com"))
        .await?;
    assert_eq!(created.data().partner_name(), "Acme");
    assert_eq!(created.audit().created_by(), "alice");

    let fetched = service.get(&owner, created.id()).await?;
    assert_eq!(fetched, created);

    let hidden = service.get(&outsider, created.id()).await;
    assert!(matches!(hidden, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn duplicate_partner_is_a_conflict() -> AppResult<()> {
    let (service, _) = service();
    let owner = actor(TenantId::new(), "alice");

    service
        .create(&owner, input("Acme", "acme@example.com"))
        .await?;
    let duplicate = service
        .create(&owner, input("Acme", "acme@example.com"))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let other_tenant = service
        .create(
            &actor(TenantId::new(), "bob"),
            input("Acme", "acme@example.com"),
        )
        .await;
    assert!(other_tenant.is_ok());
    Ok(())
}

#[tokio::test]
async fn invalid_partner_is_rejected_with_field_messages() {
    let (service, _) = service();
    let owner = actor(TenantId::new(), "alice");

    let result = service
        .create(
            &owner,
            PartnerInput {
                tel_number: Some("03-ABCD".to_owned()),
                ..input("Acme", "acme@example.com")
            },
        )
        .await;

    match result {
        Err(AppError::Validation(message)) => assert!(message.starts_with("tel_number: ")),
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn delete_hides_partner_and_restore_brings_it_back() -> AppResult<()> {
    let (service, _) = service();
    let owner = actor(TenantId::new(), "alice");
    let editor = actor(owner.tenant_id(), "carol");
    let created = service
        .create(&owner, input("Acme", "acme@example.com"))
        .await?;

    service.delete(&editor, created.id()).await?;
    let visible = service.list(&owner, &ListQuery::default()).await?;
    assert_eq!(visible.count, 0);

    let everything = service
        .list(
            &owner,
            &ListQuery {
                include_deleted: true,
                ..ListQuery::default()
            },
        )
        .await?;
    assert_eq!(everything.count, 1);
    assert!(everything.items[0].audit().is_deleted());
    assert_eq!(everything.items[0].audit().updated_by(), "carol");

    let restored = service.restore(&owner, created.id()).await?;
    assert!(!restored.audit().is_deleted());
    assert_eq!(restored.audit().created_by(), "alice");
    Ok(())
}

#[tokio::test]
async fn update_rejects_a_key_used_by_another_partner() -> AppResult<()> {
    let (service, _) = service();
    let owner = actor(TenantId::new(), "alice");
    service
        .create(&owner, input("Acme", "acme@example.com"))
        .await?;
    let beta = service
        .create(&owner, input("Beta", "beta@example.com"))
        .await?;

    let clash = service
        .update(&owner, beta.id(), input("Acme", "acme@example.com"))
        .await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));

    let renamed = service
        .update(&owner, beta.id(), input("Beta Ltd", "beta@example.com"))
        .await?;
    assert_eq!(renamed.data().partner_name(), "Beta Ltd");
    Ok(())
}

#[tokio::test]
async fn import_writes_every_valid_row() -> AppResult<()> {
    let (service, repository) = service();
    let owner = actor(TenantId::new(), "alice");
    let bytes = csv(&[
        "Acme,アクメ,Customer,Taro,03-1111-2222,acme@example.com,100-0001,Tokyo,Chiyoda,1-1,,0",
        "Beta,,Supplier,,,beta@example.com,,,,,,0",
        "Gamma,,顧客・仕入先,,,gamma@example.com,,,,,,",
    ]);

    let result = service
        .import_partners(&owner, &bytes, CsvDelimiter::COMMA)
        .await?;
    assert_eq!(result, ImportResult::Success { created: 3 });

    let page = service.list(&owner, &ListQuery::default()).await?;
    assert_eq!(page.count, 3);
    let acme = &page.items[0];
    assert_eq!(acme.data().partner_name_kana(), Some("アクメ"));
    assert_eq!(acme.data().partner_type(), PartnerType::Customer);
    assert_eq!(acme.data().tel_number(), Some("03-1111-2222"));
    assert_eq!(acme.data().address2(), None);
    assert_eq!(page.items[2].data().partner_type(), PartnerType::Both);
    assert_eq!(stored_count(&repository).await, 3);
    Ok(())
}

#[tokio::test]
async fn import_reports_only_invalid_rows_and_writes_nothing() -> AppResult<()> {
    let (service, repository) = service();
    let owner = actor(TenantId::new(), "alice");
    let bytes = csv(&[
        "Acme,,Customer,,,acme@example.com,,,,,,",
        "Acme,,Customer,,,acme@example.com,,,,,,",
        "Beta,,Wholesaler,,,beta@example.com,,,,,,",
    ]);

    let result = service
        .import_partners(&owner, &bytes, CsvDelimiter::COMMA)
        .await?;

    assert_eq!(
        failure_rows(&result),
        vec![
            (
                3,
                "the same partner name + email appears more than once in this file".to_owned()
            ),
            (
                4,
                "partner type is invalid (expected one of: Customer / Supplier / Customer & Supplier)"
                    .to_owned()
            ),
        ]
    );
    assert_eq!(stored_count(&repository).await, 0);
    Ok(())
}

#[tokio::test]
async fn import_combines_every_problem_of_a_row() -> AppResult<()> {
    let (service, _) = service();
    let owner = actor(TenantId::new(), "alice");
    service
        .create(&owner, input("Acme", "acme@example.com"))
        .await?;
    let bytes = csv(&["Acme,,Partner,,03-ABCD,acme@example.com,,,,,,"]);

    let result = service
        .import_partners(&owner, &bytes, CsvDelimiter::COMMA)
        .await?;

    assert_eq!(
        failure_rows(&result),
        vec![(
            2,
            "partner type is invalid (expected one of: Customer / Supplier / Customer & Supplier) / \
             tel_number: enter the phone number using digits and hyphens only / \
             a partner with the same partner name + email is already registered"
                .to_owned()
        )]
    );
    Ok(())
}

#[tokio::test]
async fn import_reports_rows_taken_by_a_concurrent_write() -> AppResult<()> {
    let (service, repository) = service();
    let owner = actor(TenantId::new(), "alice");
    let racing = service
        .create(
            &actor(owner.tenant_id(), "bob"),
            input("Beta", "beta@example.com"),
        )
        .await?;
    repository.partners.lock().await.clear();
    *repository.concurrent_insert.lock().await = Some(racing);

    let bytes = csv(&[
        "Acme,,Customer,,,acme@example.com,,,,,,",
        "Beta,,Supplier,,,beta@example.com,,,,,,",
    ]);
    let result = service
        .import_partners(&owner, &bytes, CsvDelimiter::COMMA)
        .await?;

    assert_eq!(
        failure_rows(&result),
        vec![(
            3,
            "a duplicate was created by a concurrent update (a partner with the same partner name + email is already registered)"
                .to_owned()
        )]
    );
    assert_eq!(stored_count(&repository).await, 1);
    Ok(())
}

#[tokio::test]
async fn exported_file_can_be_imported_into_another_tenant() -> AppResult<()> {
    let (service, _) = service();
    let owner = actor(TenantId::new(), "alice");
    let created = service
        .create(
            &owner,
            PartnerInput {
                partner_type: Some(PartnerType::Both),
                city: Some("Osaka, Kita".to_owned()),
                ..input("Acme", "acme@example.com")
            },
        )
        .await?;
    service
        .create(&owner, input("Beta", "beta@example.com"))
        .await?;
    service.delete(&owner, created.id()).await?;

    let document = service
        .export_partners(
            &owner,
            &ListQuery {
                include_deleted: true,
                ..ListQuery::default()
            },
        )
        .await?;
    assert_eq!(document.headers(), PARTNER_CSV_HEADERS);
    assert_eq!(document.rows()[0][2], "Customer & Supplier");
    assert_eq!(document.rows()[0][11], "1");
    assert_eq!(document.rows()[1][11], "0");

    let bytes = document.to_bytes()?;
    let result = service
        .import_partners(
            &actor(TenantId::new(), "dave"),
            &bytes,
            CsvDelimiter::COMMA,
        )
        .await?;
    assert_eq!(result, ImportResult::Success { created: 2 });
    Ok(())
}

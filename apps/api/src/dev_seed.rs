use std::collections::HashSet;

use masterhub_application::{ListQuery, MAX_PAGE_SIZE, NewUser};
use masterhub_core::{AppResult, TenantId, UserIdentity};
use masterhub_domain::{
    PartnerInput, PartnerType, ProductCategoryId, ProductCategoryInput, ProductInput, TenantInput,
};
use sqlx::PgPool;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::api_services;
use crate::state::AppState;

const DEV_SEED_SUBJECT: &str = "dev-seed";
const DEV_SEED_TENANT_NAME: &str = "Masterhub Demo Trading";
const DEV_SEED_TENANT_EMAIL: &str = "info@masterhub.local";
const DEV_SEED_ADMIN_EMAIL: &str = "admin@masterhub.local";
const DEV_SEED_ADMIN_DISPLAY_NAME: &str = "Demo Admin";
const DEV_SEED_ADMIN_PASSWORD: &str = "admin";

const DEV_SEED_CATEGORIES: [(&str, i32); 3] = [("Food", 1), ("Beverages", 2), ("Stationery", 3)];

/// Product name, category name, unit, unit price.
const DEV_SEED_PRODUCTS: [(&str, Option<&str>, &str, &str); 5] = [
    ("Koshihikari Rice 5kg", Some("Food"), "bag", "2480"),
    ("Green Tea 500ml", Some("Beverages"), "bottle", "128"),
    ("Sparkling Water 1L", Some("Beverages"), "bottle", "160.5"),
    ("A4 Copy Paper", Some("Stationery"), "box", "3200"),
    ("Gift Wrapping", None, "set", "300"),
];

/// Partner name, partner type, contact name, email, city.
const DEV_SEED_PARTNERS: [(&str, PartnerType, &str, &str, &str); 4] = [
    (
        "Hokuto Foods",
        PartnerType::Supplier,
        "Kenji Sato",
        "sales@hokuto-foods.example",
        "Sapporo",
    ),
    (
        "Sakura Mart",
        PartnerType::Customer,
        "Yui Tanaka",
        "buyer@sakura-mart.example",
        "Osaka",
    ),
    (
        "Minato Office Supply",
        PartnerType::Both,
        "Ren Kobayashi",
        "info@minato-office.example",
        "Yokohama",
    ),
    (
        "Aozora Cafe",
        PartnerType::Customer,
        "Mei Suzuki",
        "order@aozora-cafe.example",
        "Fukuoka",
    ),
];

/// Creates the demo tenant, its staff admin and sample master data. Safe to rerun.
pub async fn run(pool: PgPool, config: &ApiConfig) -> AppResult<()> {
    let app_state = api_services::build_app_state(pool, config);

    let actor = ensure_admin(&app_state).await?;
    let category_ids = ensure_categories(&app_state, &actor).await?;
    ensure_products(&app_state, &actor, &category_ids).await?;
    ensure_partners(&app_state, &actor).await?;

    info!(
        tenant_id = %actor.tenant_id(),
        admin = DEV_SEED_ADMIN_EMAIL,
        "development seed completed"
    );
    Ok(())
}

fn everything() -> ListQuery {
    ListQuery {
        include_deleted: true,
        limit: Some(MAX_PAGE_SIZE),
        ..ListQuery::default()
    }
}

async fn ensure_admin(app_state: &AppState) -> AppResult<UserIdentity> {
    if let Some(existing) = app_state
        .auth_service
        .find_by_email(DEV_SEED_ADMIN_EMAIL)
        .await?
    {
        return Ok(existing.identity());
    }

    let tenant_id = ensure_tenant(app_state).await?;
    let admin = app_state
        .auth_service
        .create_user(NewUser {
            tenant_id,
            email: DEV_SEED_ADMIN_EMAIL.to_owned(),
            display_name: DEV_SEED_ADMIN_DISPLAY_NAME.to_owned(),
            password: DEV_SEED_ADMIN_PASSWORD.to_owned(),
            is_staff: true,
        })
        .await?;

    info!(email = DEV_SEED_ADMIN_EMAIL, "seeded admin user");
    Ok(admin.identity())
}

async fn ensure_tenant(app_state: &AppState) -> AppResult<TenantId> {
    let seeder =
        UserIdentity::new(DEV_SEED_SUBJECT, "Development Seed", None, TenantId::new())
            .with_staff(true);

    let existing = app_state
        .tenant_service
        .list(
            &seeder,
            &ListQuery {
                search: Some(DEV_SEED_TENANT_EMAIL.to_owned()),
                ..everything()
            },
        )
        .await?;
    if let Some(tenant) = existing
        .items
        .iter()
        .find(|tenant| tenant.data().email() == DEV_SEED_TENANT_EMAIL)
    {
        return Ok(tenant.id());
    }

    let tenant = app_state
        .tenant_service
        .create(
            &seeder,
            TenantInput {
                tenant_name: Some(DEV_SEED_TENANT_NAME.to_owned()),
                representative_name: Some(DEV_SEED_ADMIN_DISPLAY_NAME.to_owned()),
                email: Some(DEV_SEED_TENANT_EMAIL.to_owned()),
                tel_number: Some("03-1234-5678".to_owned()),
                city: Some("Tokyo".to_owned()),
                ..TenantInput::default()
            },
        )
        .await?;

    info!(tenant_id = %tenant.id(), "seeded demo tenant");
    Ok(tenant.id())
}

async fn ensure_categories(
    app_state: &AppState,
    actor: &UserIdentity,
) -> AppResult<Vec<(String, ProductCategoryId)>> {
    let mut categories: Vec<(String, ProductCategoryId)> = app_state
        .product_category_service
        .list(actor, &everything())
        .await?
        .items
        .into_iter()
        .map(|category| {
            (
                category.data().product_category_name().to_owned(),
                category.id(),
            )
        })
        .collect();

    for (name, sort) in DEV_SEED_CATEGORIES {
        if categories.iter().any(|(existing, _)| existing == name) {
            continue;
        }

        let created = app_state
            .product_category_service
            .create(
                actor,
                ProductCategoryInput {
                    product_category_name: Some(name.to_owned()),
                    sort: Some(sort),
                },
            )
            .await?;
        categories.push((name.to_owned(), created.id()));
    }

    Ok(categories)
}

async fn ensure_products(
    app_state: &AppState,
    actor: &UserIdentity,
    category_ids: &[(String, ProductCategoryId)],
) -> AppResult<()> {
    let existing: HashSet<String> = app_state
        .product_service
        .list(actor, &everything(), None)
        .await?
        .items
        .into_iter()
        .map(|product| product.data().product_name().to_owned())
        .collect();

    for (name, category_name, unit, unit_price) in DEV_SEED_PRODUCTS {
        if existing.contains(name) {
            continue;
        }

        let product_category_id = category_name.and_then(|category_name| {
            category_ids
                .iter()
                .find(|(existing, _)| existing == category_name)
                .map(|(_, id)| *id)
        });

        app_state
            .product_service
            .create(
                actor,
                ProductInput {
                    product_name: Some(name.to_owned()),
                    product_category_id,
                    unit: Some(unit.to_owned()),
                    unit_price: Some(unit_price.to_owned()),
                    description: None,
                },
            )
            .await?;
    }

    Ok(())
}

async fn ensure_partners(app_state: &AppState, actor: &UserIdentity) -> AppResult<()> {
    let existing: HashSet<String> = app_state
        .partner_service
        .list(actor, &everything())
        .await?
        .items
        .into_iter()
        .map(|partner| partner.data().partner_name().to_owned())
        .collect();

    for (name, partner_type, contact_name, email, city) in DEV_SEED_PARTNERS {
        if existing.contains(name) {
            continue;
        }

        app_state
            .partner_service
            .create(
                actor,
                PartnerInput {
                    partner_name: Some(name.to_owned()),
                    partner_type: Some(partner_type),
                    contact_name: Some(contact_name.to_owned()),
                    email: Some(email.to_owned()),
                    city: Some(city.to_owned()),
                    ..PartnerInput::default()
                },
            )
            .await?;
    }

    Ok(())
}

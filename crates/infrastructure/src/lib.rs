//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
#[cfg(test)]
mod in_memory_partner_repository;
mod postgres_listing;
mod postgres_partner_repository;
mod postgres_product_category_repository;
mod postgres_product_repository;
mod postgres_tenant_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::{Argon2PasswordHasher, DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB};
pub use postgres_partner_repository::PostgresPartnerRepository;
pub use postgres_product_category_repository::PostgresProductCategoryRepository;
pub use postgres_product_repository::PostgresProductRepository;
pub use postgres_tenant_repository::PostgresTenantRepository;
pub use postgres_user_repository::PostgresUserRepository;

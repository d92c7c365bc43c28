mod auth;
mod common;
mod listing;
mod partners;
mod products;
mod tenants;

pub use auth::AuthLoginRequest;
pub use common::{AuditResponse, HealthResponse, ImportCountResponse, ListResponse, UserIdentityResponse};
pub use listing::{ImportParams, ListParams, ProductFilterParams};
pub use partners::{PartnerRequest, PartnerResponse};
pub use products::{
    ProductCategoryChoiceResponse, ProductCategoryRequest, ProductCategoryResponse,
    ProductRequest, ProductResponse,
};
pub use tenants::{TenantRequest, TenantResponse};

#[cfg(test)]
mod tests {
    use super::{
        AuthLoginRequest, HealthResponse, ImportCountResponse, PartnerRequest, PartnerResponse,
        ProductCategoryChoiceResponse, ProductCategoryRequest, ProductCategoryResponse,
        ProductRequest, ProductResponse, TenantRequest, TenantResponse, UserIdentityResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        AuthLoginRequest::export(&config)?;
        ErrorResponse::export(&config)?;
        HealthResponse::export(&config)?;
        ImportCountResponse::export(&config)?;
        PartnerRequest::export(&config)?;
        PartnerResponse::export(&config)?;
        ProductCategoryChoiceResponse::export(&config)?;
        ProductCategoryRequest::export(&config)?;
        ProductCategoryResponse::export(&config)?;
        ProductRequest::export(&config)?;
        ProductResponse::export(&config)?;
        TenantRequest::export(&config)?;
        TenantResponse::export(&config)?;
        UserIdentityResponse::export(&config)?;

        Ok(())
    }
}

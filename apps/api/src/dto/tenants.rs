use masterhub_domain::{Tenant, TenantInput};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::AuditResponse;

/// Incoming payload for tenant creation and update.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/tenant-request.ts"
)]
pub struct TenantRequest {
    pub tenant_name: Option<String>,
    pub representative_name: Option<String>,
    pub email: Option<String>,
    pub tel_number: Option<String>,
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
}

impl From<TenantRequest> for TenantInput {
    fn from(request: TenantRequest) -> Self {
        Self {
            tenant_name: request.tenant_name,
            representative_name: request.representative_name,
            email: request.email,
            tel_number: request.tel_number,
            postal_code: request.postal_code,
            state: request.state,
            city: request.city,
            address: request.address,
            address2: request.address2,
        }
    }
}

/// API representation of a tenant. The id doubles as the tenant code.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/tenant-response.ts"
)]
pub struct TenantResponse {
    pub id: String,
    pub tenant_name: String,
    pub representative_name: String,
    pub email: String,
    pub tel_number: Option<String>,
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub address2: Option<String>,
    #[serde(flatten)]
    pub audit: AuditResponse,
}

impl From<Tenant> for TenantResponse {
    fn from(tenant: Tenant) -> Self {
        let data = tenant.data();
        Self {
            id: tenant.id().to_string(),
            tenant_name: data.tenant_name().to_owned(),
            representative_name: data.representative_name().to_owned(),
            email: data.email().to_owned(),
            tel_number: data.tel_number().map(ToOwned::to_owned),
            postal_code: data.postal_code().map(ToOwned::to_owned),
            state: data.state().map(ToOwned::to_owned),
            city: data.city().map(ToOwned::to_owned),
            address: data.address().map(ToOwned::to_owned),
            address2: data.address2().map(ToOwned::to_owned),
            audit: AuditResponse::from(tenant.audit()),
        }
    }
}

use masterhub_application::Page;
use masterhub_core::UserIdentity;
use masterhub_domain::RecordAudit;
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub tenant_id: String,
    pub is_staff: bool,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            tenant_id: identity.tenant_id().to_string(),
            is_staff: identity.is_staff(),
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/list-response.ts"
)]
pub struct ListResponse<T: TS> {
    pub items: Vec<T>,
    #[ts(type = "number")]
    pub count: u64,
}

impl<T: TS> ListResponse<T> {
    /// Converts a service page into its response form.
    pub fn from_page<S>(page: Page<S>) -> Self
    where
        T: From<S>,
    {
        let page = page.map(T::from);
        Self {
            items: page.items,
            count: page.count,
        }
    }
}

/// Number of records created by a successful import.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/import-count-response.ts"
)]
pub struct ImportCountResponse {
    #[ts(type = "number")]
    pub count: usize,
}

/// Soft-delete flag and audit columns of a master-data record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-response.ts"
)]
pub struct AuditResponse {
    pub is_deleted: bool,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl From<&RecordAudit> for AuditResponse {
    fn from(audit: &RecordAudit) -> Self {
        Self {
            is_deleted: audit.is_deleted(),
            created_at: audit.created_at().to_rfc3339(),
            created_by: audit.created_by().to_owned(),
            updated_at: audit.updated_at().to_rfc3339(),
            updated_by: audit.updated_by().to_owned(),
        }
    }
}

use masterhub_core::TenantId;
use serde::{Deserialize, Serialize};

use crate::field_rules::{
    FieldErrors, optional_digits_and_hyphens, optional_text, required_email, required_text,
};
use crate::record::RecordAudit;

/// Unvalidated tenant (organization) attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantInput {
    /// Organization name.
    pub tenant_name: Option<String>,
    /// Representative of the organization.
    pub representative_name: Option<String>,
    /// Contact email, globally unique.
    pub email: Option<String>,
    /// Phone number.
    pub tel_number: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Prefecture or state.
    pub state: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Building line.
    pub address2: Option<String>,
}

impl TenantInput {
    /// Validates every field and returns normalized tenant data.
    pub fn validate(&self) -> Result<TenantData, FieldErrors> {
        let mut errors = FieldErrors::new();

        let tenant_name =
            required_text(&mut errors, "tenant_name", self.tenant_name.as_deref(), 100);
        let representative_name = required_text(
            &mut errors,
            "representative_name",
            self.representative_name.as_deref(),
            100,
        );
        let email = required_email(&mut errors, "email", self.email.as_deref());
        let tel_number = optional_digits_and_hyphens(
            &mut errors,
            "tel_number",
            self.tel_number.as_deref(),
            20,
            "use digits and hyphens only",
        );
        let postal_code = optional_digits_and_hyphens(
            &mut errors,
            "postal_code",
            self.postal_code.as_deref(),
            10,
            "the postal code format is invalid",
        );
        let state = optional_text(&mut errors, "state", self.state.as_deref(), 10);
        let city = optional_text(&mut errors, "city", self.city.as_deref(), 50);
        let address = optional_text(&mut errors, "address", self.address.as_deref(), 100);
        let address2 = optional_text(&mut errors, "address2", self.address2.as_deref(), 150);

        errors.into_result(|| TenantData {
            tenant_name,
            representative_name,
            email,
            tel_number,
            postal_code,
            state,
            city,
            address,
            address2,
        })
    }
}

/// Validated tenant attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantData {
    tenant_name: String,
    representative_name: String,
    email: String,
    tel_number: Option<String>,
    postal_code: Option<String>,
    state: Option<String>,
    city: Option<String>,
    address: Option<String>,
    address2: Option<String>,
}

impl TenantData {
    /// Returns the organization name.
    #[must_use]
    pub fn tenant_name(&self) -> &str {
        self.tenant_name.as_str()
    }

    /// Returns the representative name.
    #[must_use]
    pub fn representative_name(&self) -> &str {
        self.representative_name.as_str()
    }

    /// Returns the contact email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the phone number.
    #[must_use]
    pub fn tel_number(&self) -> Option<&str> {
        self.tel_number.as_deref()
    }

    /// Returns the postal code.
    #[must_use]
    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    /// Returns the prefecture or state.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Returns the city.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Returns the street address.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns the building line.
    #[must_use]
    pub fn address2(&self) -> Option<&str> {
        self.address2.as_deref()
    }
}

/// Persisted tenant. The tenant id doubles as the public tenant code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    id: TenantId,
    data: TenantData,
    audit: RecordAudit,
}

impl Tenant {
    /// Assembles a tenant from its parts.
    #[must_use]
    pub fn new(id: TenantId, data: TenantData, audit: RecordAudit) -> Self {
        Self { id, data, audit }
    }

    /// Returns the tenant identifier.
    #[must_use]
    pub fn id(&self) -> TenantId {
        self.id
    }

    /// Returns the validated attributes.
    #[must_use]
    pub fn data(&self) -> &TenantData {
        &self.data
    }

    /// Returns soft-delete and audit data.
    #[must_use]
    pub fn audit(&self) -> &RecordAudit {
        &self.audit
    }

    /// Replaces the attributes.
    #[must_use]
    pub fn with_data(self, data: TenantData) -> Self {
        Self { data, ..self }
    }

    /// Replaces the audit data.
    #[must_use]
    pub fn with_audit(self, audit: RecordAudit) -> Self {
        Self { audit, ..self }
    }
}

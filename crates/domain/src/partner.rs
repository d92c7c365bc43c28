//! Partner (customer / supplier) master data.

use std::str::FromStr;

use masterhub_core::{AppError, TenantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field_rules::{
    FieldErrors, optional_digits_and_hyphens, optional_text, required_email, required_text,
};
use crate::record::RecordAudit;

/// Unique identifier for a partner record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartnerId(Uuid);

impl PartnerId {
    /// Creates a new random partner identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a partner identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PartnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PartnerId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Commercial relationship with a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerType {
    /// Partner buys from the tenant.
    Customer,
    /// Partner sells to the tenant.
    Supplier,
    /// Partner is both customer and supplier.
    Both,
}

/// Display labels accepted for each partner type, first entry is the canonical label.
const PARTNER_TYPE_LABELS: [(PartnerType, &[&str]); 3] = [
    (PartnerType::Customer, &["Customer", "顧客"]),
    (PartnerType::Supplier, &["Supplier", "仕入先"]),
    (PartnerType::Both, &["Customer & Supplier", "顧客・仕入先"]),
];

impl PartnerType {
    /// Returns the stable storage code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::Both => "both",
        }
    }

    /// Returns the human-readable label used in CSV files.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Supplier => "Supplier",
            Self::Both => "Customer & Supplier",
        }
    }

    /// Resolves a display label (current or legacy) to a partner type.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        PARTNER_TYPE_LABELS
            .iter()
            .find(|(_, labels)| labels.contains(&label))
            .map(|(partner_type, _)| *partner_type)
    }

    /// Returns every canonical label, in declaration order.
    #[must_use]
    pub fn labels() -> Vec<&'static str> {
        PARTNER_TYPE_LABELS
            .iter()
            .map(|(partner_type, _)| partner_type.label())
            .collect()
    }
}

impl FromStr for PartnerType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "customer" => Ok(Self::Customer),
            "supplier" => Ok(Self::Supplier),
            "both" => Ok(Self::Both),
            other => Err(AppError::Validation(format!(
                "unknown partner type '{other}'"
            ))),
        }
    }
}

/// Business key that must be unique per tenant: trimmed partner name and email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartnerKey {
    partner_name: String,
    email: String,
}

impl PartnerKey {
    /// Builds a key from raw values, or `None` when either component is blank.
    #[must_use]
    pub fn from_raw(partner_name: &str, email: &str) -> Option<Self> {
        let partner_name = partner_name.trim();
        let email = email.trim();
        if partner_name.is_empty() || email.is_empty() {
            return None;
        }

        Some(Self {
            partner_name: partner_name.to_owned(),
            email: email.to_owned(),
        })
    }

    /// Returns the partner name component.
    #[must_use]
    pub fn partner_name(&self) -> &str {
        self.partner_name.as_str()
    }

    /// Returns the email component.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Unvalidated partner attributes as submitted by a form or a CSV row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerInput {
    /// Partner name.
    pub partner_name: Option<String>,
    /// Phonetic (kana) reading of the name.
    pub partner_name_kana: Option<String>,
    /// Relationship type.
    pub partner_type: Option<PartnerType>,
    /// Contact person.
    pub contact_name: Option<String>,
    /// Phone number.
    pub tel_number: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Prefecture or state.
    pub state: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Building or supplementary address line.
    pub address2: Option<String>,
}

impl PartnerInput {
    /// Validates every field and returns normalized partner data.
    pub fn validate(&self) -> Result<PartnerData, FieldErrors> {
        let mut errors = FieldErrors::new();

        let partner_name =
            required_text(&mut errors, "partner_name", self.partner_name.as_deref(), 100);
        let partner_name_kana = optional_text(
            &mut errors,
            "partner_name_kana",
            self.partner_name_kana.as_deref(),
            100,
        );
        if self.partner_type.is_none() {
            errors.push("partner_type", "this field is required");
        }
        let contact_name =
            optional_text(&mut errors, "contact_name", self.contact_name.as_deref(), 50);
        let tel_number = optional_digits_and_hyphens(
            &mut errors,
            "tel_number",
            self.tel_number.as_deref(),
            20,
            "enter the phone number using digits and hyphens only",
        );
        let email = required_email(&mut errors, "email", self.email.as_deref());
        let postal_code = optional_digits_and_hyphens(
            &mut errors,
            "postal_code",
            self.postal_code.as_deref(),
            10,
            "enter the postal code using digits and hyphens only",
        );
        let state = optional_text(&mut errors, "state", self.state.as_deref(), 10);
        let city = optional_text(&mut errors, "city", self.city.as_deref(), 50);
        let address = optional_text(&mut errors, "address", self.address.as_deref(), 100);
        let address2 = optional_text(&mut errors, "address2", self.address2.as_deref(), 150);

        let partner_type = self.partner_type.unwrap_or(PartnerType::Customer);
        errors.into_result(|| PartnerData {
            partner_name,
            partner_name_kana,
            partner_type,
            contact_name,
            tel_number,
            email,
            postal_code,
            state,
            city,
            address,
            address2,
        })
    }
}

/// Validated partner attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerData {
    partner_name: String,
    partner_name_kana: Option<String>,
    partner_type: PartnerType,
    contact_name: Option<String>,
    tel_number: Option<String>,
    email: String,
    postal_code: Option<String>,
    state: Option<String>,
    city: Option<String>,
    address: Option<String>,
    address2: Option<String>,
}

impl PartnerData {
    /// Returns the business key of the partner.
    #[must_use]
    pub fn key(&self) -> PartnerKey {
        PartnerKey {
            partner_name: self.partner_name.clone(),
            email: self.email.clone(),
        }
    }

    /// Returns the partner name.
    #[must_use]
    pub fn partner_name(&self) -> &str {
        self.partner_name.as_str()
    }

    /// Returns the kana reading.
    #[must_use]
    pub fn partner_name_kana(&self) -> Option<&str> {
        self.partner_name_kana.as_deref()
    }

    /// Returns the relationship type.
    #[must_use]
    pub fn partner_type(&self) -> PartnerType {
        self.partner_type
    }

    /// Returns the contact person.
    #[must_use]
    pub fn contact_name(&self) -> Option<&str> {
        self.contact_name.as_deref()
    }

    /// Returns the phone number.
    #[must_use]
    pub fn tel_number(&self) -> Option<&str> {
        self.tel_number.as_deref()
    }

    /// Returns the email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
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

/// Persisted partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    id: PartnerId,
    tenant_id: TenantId,
    data: PartnerData,
    audit: RecordAudit,
}

impl Partner {
    /// Assembles a partner from its parts.
    #[must_use]
    pub fn new(id: PartnerId, tenant_id: TenantId, data: PartnerData, audit: RecordAudit) -> Self {
        Self {
            id,
            tenant_id,
            data,
            audit,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> PartnerId {
        self.id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the validated attributes.
    #[must_use]
    pub fn data(&self) -> &PartnerData {
        &self.data
    }

    /// Returns soft-delete and audit data.
    #[must_use]
    pub fn audit(&self) -> &RecordAudit {
        &self.audit
    }

    /// Replaces the attributes, keeping identity and audit data.
    #[must_use]
    pub fn with_data(self, data: PartnerData) -> Self {
        Self { data, ..self }
    }

    /// Replaces the audit data.
    #[must_use]
    pub fn with_audit(self, audit: RecordAudit) -> Self {
        Self { audit, ..self }
    }
}

//! Products and product categories.

use std::fmt::{Display, Formatter};

use masterhub_core::TenantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field_rules::{FieldErrors, normalize, optional_text, required_text};
use crate::record::RecordAudit;

/// Unique identifier for a product record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Creates a new random product identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a product identifier from an existing UUID value.
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

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ProductId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Unique identifier for a product category record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductCategoryId(Uuid);

impl ProductCategoryId {
    /// Creates a new random category identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a category identifier from an existing UUID value.
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

impl Default for ProductCategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ProductCategoryId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Maximum number of digits before the decimal point.
pub const UNIT_PRICE_INTEGER_DIGITS: usize = 10;
/// Maximum number of digits after the decimal point.
pub const UNIT_PRICE_FRACTION_DIGITS: usize = 2;

/// Non-negative decimal price kept in canonical text form (`1200.5` becomes `1200.50`).
///
/// Stored as `NUMERIC(12, 2)`; the text form avoids floating point rounding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitPrice(String);

impl UnitPrice {
    /// Parses and canonicalizes a price.
    pub fn parse(value: &str) -> Result<Self, String> {
        let value = value.trim().replace(',', "");
        if value.is_empty() {
            return Err("enter a number".to_owned());
        }
        if value.starts_with('-') {
            return Err("ensure this value is greater than or equal to 0".to_owned());
        }

        let value = value.strip_prefix('+').unwrap_or(&value);
        let (integer, fraction) = value.split_once('.').unwrap_or((value, ""));
        let all_digits = |part: &str| part.chars().all(|character| character.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty())
            || !all_digits(integer)
            || !all_digits(fraction)
        {
            return Err("enter a number".to_owned());
        }

        let integer = integer.trim_start_matches('0');
        if integer.len() > UNIT_PRICE_INTEGER_DIGITS {
            return Err(format!(
                "ensure that there are no more than {UNIT_PRICE_INTEGER_DIGITS} digits before the decimal point"
            ));
        }
        if fraction.len() > UNIT_PRICE_FRACTION_DIGITS {
            return Err(format!(
                "ensure that there are no more than {UNIT_PRICE_FRACTION_DIGITS} decimal places"
            ));
        }

        let integer = if integer.is_empty() { "0" } else { integer };
        let mut fraction = fraction.to_owned();
        while fraction.len() < UNIT_PRICE_FRACTION_DIGITS {
            fraction.push('0');
        }
        Ok(Self(format!("{integer}.{fraction}")))
    }

    /// Returns the canonical text form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UnitPrice {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl TryFrom<String> for UnitPrice {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UnitPrice> for String {
    fn from(value: UnitPrice) -> Self {
        value.0
    }
}

/// Unvalidated product attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    /// Product name.
    pub product_name: Option<String>,
    /// Optional category.
    pub product_category_id: Option<ProductCategoryId>,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Unit price as text.
    pub unit_price: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

impl ProductInput {
    /// Validates every field and returns normalized product data.
    ///
    /// Category ownership is checked by the application layer.
    pub fn validate(&self) -> Result<ProductData, FieldErrors> {
        let mut errors = FieldErrors::new();

        let product_name =
            required_text(&mut errors, "product_name", self.product_name.as_deref(), 100);
        let unit = optional_text(&mut errors, "unit", self.unit.as_deref(), 20);
        let unit_price = match normalize(self.unit_price.as_deref()) {
            None => {
                errors.push("unit_price", "this field is required");
                None
            }
            Some(raw) => match UnitPrice::parse(&raw) {
                Ok(price) => Some(price),
                Err(message) => {
                    errors.push("unit_price", message);
                    None
                }
            },
        };
        let description =
            optional_text(&mut errors, "description", self.description.as_deref(), 255);

        match unit_price {
            Some(unit_price) if errors.is_empty() => Ok(ProductData {
                product_name,
                product_category_id: self.product_category_id,
                unit,
                unit_price,
                description,
            }),
            _ => Err(errors),
        }
    }
}

/// Validated product attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    product_name: String,
    product_category_id: Option<ProductCategoryId>,
    unit: Option<String>,
    unit_price: UnitPrice,
    description: Option<String>,
}

impl ProductData {
    /// Returns the product name.
    #[must_use]
    pub fn product_name(&self) -> &str {
        self.product_name.as_str()
    }

    /// Returns the category, if any.
    #[must_use]
    pub fn product_category_id(&self) -> Option<ProductCategoryId> {
        self.product_category_id
    }

    /// Returns the unit of measure.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Returns the unit price.
    #[must_use]
    pub fn unit_price(&self) -> &UnitPrice {
        &self.unit_price
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Persisted product, with the resolved category name for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    tenant_id: TenantId,
    data: ProductData,
    product_category_name: Option<String>,
    audit: RecordAudit,
}

impl Product {
    /// Assembles a product from its parts.
    #[must_use]
    pub fn new(
        id: ProductId,
        tenant_id: TenantId,
        data: ProductData,
        product_category_name: Option<String>,
        audit: RecordAudit,
    ) -> Self {
        Self {
            id,
            tenant_id,
            data,
            product_category_name,
            audit,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the validated attributes.
    #[must_use]
    pub fn data(&self) -> &ProductData {
        &self.data
    }

    /// Returns the category name, if the product has a category.
    #[must_use]
    pub fn product_category_name(&self) -> Option<&str> {
        self.product_category_name.as_deref()
    }

    /// Returns soft-delete and audit data.
    #[must_use]
    pub fn audit(&self) -> &RecordAudit {
        &self.audit
    }

    /// Replaces the attributes and the resolved category name.
    #[must_use]
    pub fn with_data(self, data: ProductData, product_category_name: Option<String>) -> Self {
        Self {
            data,
            product_category_name,
            ..self
        }
    }

    /// Replaces the audit data.
    #[must_use]
    pub fn with_audit(self, audit: RecordAudit) -> Self {
        Self { audit, ..self }
    }
}

/// Unvalidated category attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCategoryInput {
    /// Category name.
    pub product_category_name: Option<String>,
    /// Display order, defaults to `0`.
    pub sort: Option<i32>,
}

impl ProductCategoryInput {
    /// Validates the category attributes.
    pub fn validate(&self) -> Result<ProductCategoryData, FieldErrors> {
        let mut errors = FieldErrors::new();
        let product_category_name = required_text(
            &mut errors,
            "product_category_name",
            self.product_category_name.as_deref(),
            100,
        );
        let sort = self.sort.unwrap_or(0);
        if sort < 0 {
            errors.push("sort", "ensure this value is greater than or equal to 0");
        }

        errors.into_result(|| ProductCategoryData {
            product_category_name,
            sort,
        })
    }
}

/// Validated category attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategoryData {
    product_category_name: String,
    sort: i32,
}

impl ProductCategoryData {
    /// Returns the category name.
    #[must_use]
    pub fn product_category_name(&self) -> &str {
        self.product_category_name.as_str()
    }

    /// Returns the display order.
    #[must_use]
    pub fn sort(&self) -> i32 {
        self.sort
    }
}

/// Persisted product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    id: ProductCategoryId,
    tenant_id: TenantId,
    data: ProductCategoryData,
    audit: RecordAudit,
}

impl ProductCategory {
    /// Assembles a category from its parts.
    #[must_use]
    pub fn new(
        id: ProductCategoryId,
        tenant_id: TenantId,
        data: ProductCategoryData,
        audit: RecordAudit,
    ) -> Self {
        Self {
            id,
            tenant_id,
            data,
            audit,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn id(&self) -> ProductCategoryId {
        self.id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the validated attributes.
    #[must_use]
    pub fn data(&self) -> &ProductCategoryData {
        &self.data
    }

    /// Returns soft-delete and audit data.
    #[must_use]
    pub fn audit(&self) -> &RecordAudit {
        &self.audit
    }

    /// Replaces the attributes.
    #[must_use]
    pub fn with_data(self, data: ProductCategoryData) -> Self {
        Self { data, ..self }
    }

    /// Replaces the audit data.
    #[must_use]
    pub fn with_audit(self, audit: RecordAudit) -> Self {
        Self { audit, ..self }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn unit_price_is_canonicalized() {
        let cases = [
            ("1200", "1200.00"),
            ("1200.5", "1200.50"),
            ("0.99", "0.99"),
            (".5", "0.50"),
            ("007", "7.00"),
            ("1,500", "1500.00"),
        ];
        for (raw, expected) in cases {
            let parsed = UnitPrice::parse(raw);
            assert_eq!(parsed.map(String::from), Ok(expected.to_owned()), "{raw}");
        }
    }

    #[test]
    fn unit_price_rejects_bad_values() {
        for raw in ["", "-1", "abc", "1.234", "12345678901", "1.2.3", "."] {
            assert!(UnitPrice::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn product_requires_name_and_price() {
        let errors = ProductInput::default().validate().err().unwrap_or_default();
        let fields: Vec<&str> = errors.errors().iter().map(|error| error.field()).collect();
        assert_eq!(fields, vec!["product_name", "unit_price"]);
    }

    #[test]
    fn product_description_is_limited() {
        let input = ProductInput {
            product_name: Some("Widget".to_owned()),
            unit_price: Some("10".to_owned()),
            description: Some("d".repeat(256)),
            ..ProductInput::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn category_sort_defaults_to_zero() {
        let data = ProductCategoryInput {
            product_category_name: Some("Food".to_owned()),
            sort: None,
        }
        .validate();
        assert!(matches!(data, Ok(ref value) if value.sort() == 0));
    }

    #[test]
    fn category_negative_sort_is_rejected() {
        let data = ProductCategoryInput {
            product_category_name: Some("Food".to_owned()),
            sort: Some(-1),
        }
        .validate();
        assert!(data.is_err());
    }

    proptest! {
        #[test]
        fn prices_within_precision_are_accepted(integer in 0_u64..10_000_000_000, cents in 0_u32..100) {
            let raw = format!("{integer}.{cents:02}");
            let parsed = UnitPrice::parse(&raw);
            prop_assert_eq!(parsed.map(String::from), Ok(raw));
        }
    }
}

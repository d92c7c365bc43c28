//! Field-level validation shared by every master-data entity.
//!
//! Validators never stop at the first failure: every failing field is
//! collected so a caller (form submit or CSV row) can report all of them.

use std::fmt::{Display, Formatter};

use masterhub_core::AppError;

/// Validation failure for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: String,
    messages: Vec<String>,
}

impl FieldError {
    /// Returns the logical field name.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Returns every message raised for the field.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Display for FieldError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}: {}", self.field, self.messages.join(" / "))
    }
}

/// Ordered accumulator of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field, grouping messages of the same field.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        if let Some(existing) = self.0.iter_mut().find(|error| error.field == field) {
            existing.messages.push(message);
            return;
        }

        self.0.push(FieldError {
            field: field.to_owned(),
            messages: vec![message],
        });
    }

    /// Drops every message recorded for `field`.
    pub fn discard(&mut self, field: &str) {
        self.0.retain(|error| error.field != field);
    }

    /// Returns whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the collected errors in the order fields were checked.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Renders each failing field as `field: message / message`.
    #[must_use]
    pub fn to_messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Returns `value` when no error was recorded.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.to_messages().join("; "))
    }
}

impl From<FieldErrors> for AppError {
    fn from(value: FieldErrors) -> Self {
        AppError::Validation(value.to_string())
    }
}

/// Trims a raw value and maps blank input to `None`.
#[must_use]
pub fn normalize(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// Validates a required text field with a maximum length in characters.
pub fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
    max_chars: usize,
) -> String {
    match normalize(raw) {
        Some(value) => {
            check_max_chars(errors, field, &value, max_chars);
            value
        }
        None => {
            errors.push(field, "this field is required");
            String::new()
        }
    }
}

/// Validates an optional text field with a maximum length in characters.
pub fn optional_text(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
    max_chars: usize,
) -> Option<String> {
    let value = normalize(raw)?;
    check_max_chars(errors, field, &value, max_chars);
    Some(value)
}

/// Validates an optional field that may only contain ASCII digits and hyphens.
pub fn optional_digits_and_hyphens(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
    max_chars: usize,
    message: &str,
) -> Option<String> {
    let value = optional_text(errors, field, raw, max_chars)?;
    if !is_digits_and_hyphens(&value) {
        errors.push(field, message);
    }
    Some(value)
}

/// Validates a required email field. The value keeps its original casing.
pub fn required_email(errors: &mut FieldErrors, field: &str, raw: Option<&str>) -> String {
    let value = required_text(errors, field, raw, EMAIL_MAX_LENGTH);
    if !value.is_empty() && !is_valid_email(&value) {
        errors.push(field, "enter a valid email address");
    }
    value
}

/// Maximum email length accepted by every entity.
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Returns whether the value is non-empty and made of ASCII digits and hyphens.
#[must_use]
pub fn is_digits_and_hyphens(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|character| character.is_ascii_digit() || character == '-')
}

/// Structural email check: one `@`, non-empty local part, dotted domain, no whitespace.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn check_max_chars(errors: &mut FieldErrors, field: &str, value: &str, max_chars: usize) {
    let length = value.chars().count();
    if length > max_chars {
        errors.push(
            field,
            format!("ensure this field has no more than {max_chars} characters (it has {length})"),
        );
    }
}

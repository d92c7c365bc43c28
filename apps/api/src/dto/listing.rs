use std::str::FromStr;

use masterhub_application::ListQuery;
use masterhub_application::csv_import::CsvDelimiter;
use masterhub_core::AppError;
use masterhub_domain::ProductCategoryId;
use serde::Deserialize;
use uuid::Uuid;

/// Query string shared by list and export endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub include_deleted: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListParams {
    /// Converts the raw query string into service filters.
    #[must_use]
    pub fn into_query(self) -> ListQuery {
        let include_deleted = self
            .include_deleted
            .as_deref()
            .map(str::trim)
            .is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true"));

        ListQuery {
            search: self.q,
            include_deleted,
            ordering: self.ordering,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Product list filter on top of [`ListParams`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilterParams {
    pub product_category: Option<String>,
}

impl ProductFilterParams {
    /// Parses the optional category filter.
    pub fn category_id(&self) -> Result<Option<ProductCategoryId>, AppError> {
        parse_optional_category_id(self.product_category.as_deref())
    }
}

/// Options of a CSV upload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportParams {
    pub delimiter: Option<String>,
}

impl ImportParams {
    /// Returns the requested delimiter or the configured default.
    pub fn delimiter_or(&self, default: CsvDelimiter) -> Result<CsvDelimiter, AppError> {
        match self.delimiter.as_deref().filter(|value| !value.is_empty()) {
            Some(value) => CsvDelimiter::from_str(value),
            None => Ok(default),
        }
    }
}

pub(super) fn parse_optional_category_id(
    raw: Option<&str>,
) -> Result<Option<ProductCategoryId>, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Uuid::parse_str(value)
            .map(|uuid| Some(ProductCategoryId::from_uuid(uuid)))
            .map_err(|_| {
                AppError::Validation(format!(
                    "product_category: '{value}' is not a valid category id"
                ))
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use masterhub_application::csv_import::CsvDelimiter;
    use masterhub_core::AppError;
    use proptest::prelude::*;

    use super::{ImportParams, ListParams, ProductFilterParams};

    #[test]
    fn include_deleted_accepts_one_or_true() {
        for (raw, expected) in [("1", true), ("true", true), ("TRUE", true), ("0", false)] {
            let query = ListParams {
                include_deleted: Some(raw.to_owned()),
                ..ListParams::default()
            }
            .into_query();
            assert_eq!(query.include_deleted, expected, "value {raw}");
        }

        assert!(!ListParams::default().into_query().include_deleted);
    }

    #[test]
    fn search_and_paging_are_carried_over() {
        let query = ListParams {
            q: Some("acme".to_owned()),
            ordering: Some("-email".to_owned()),
            limit: Some(10),
            offset: Some(20),
            ..ListParams::default()
        }
        .into_query();

        assert_eq!(query.search_term(), Some("acme"));
        assert_eq!(query.ordering.as_deref(), Some("-email"));
        assert_eq!(query.page_size(), 10);
        assert_eq!(query.page_offset(), 20);
    }

    #[test]
    fn import_delimiter_falls_back_to_configured_default() -> Result<(), AppError> {
        let empty = ImportParams::default();
        assert_eq!(empty.delimiter_or(CsvDelimiter::TAB)?, CsvDelimiter::TAB);

        let semicolon = ImportParams {
            delimiter: Some(";".to_owned()),
        };
        assert_eq!(semicolon.delimiter_or(CsvDelimiter::COMMA)?.as_byte(), b';');

        let invalid = ImportParams {
            delimiter: Some("ab".to_owned()),
        };
        assert!(matches!(
            invalid.delimiter_or(CsvDelimiter::COMMA),
            Err(AppError::Validation(_))
        ));
        Ok(())
    }

    #[test]
    fn category_filter_must_be_a_uuid() -> Result<(), AppError> {
        assert_eq!(ProductFilterParams::default().category_id()?, None);

        let malformed = ProductFilterParams {
            product_category: Some("food".to_owned()),
        };
        assert!(matches!(
            malformed.category_id(),
            Err(AppError::Validation(_))
        ));
        Ok(())
    }

    proptest! {
        #[test]
        fn other_include_deleted_values_keep_deleted_rows_hidden(raw in "[a-z0-9]{0,6}") {
            prop_assume!(raw != "1" && raw != "true");
            let query = ListParams {
                include_deleted: Some(raw),
                ..ListParams::default()
            }
            .into_query();
            prop_assert!(!query.include_deleted);
        }
    }
}

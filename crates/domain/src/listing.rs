use serde::{Deserialize, Serialize};

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Resolved ordering of a list query, limited to an allow-listed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    field: &'static str,
    direction: SortDirection,
}

impl Ordering {
    /// Creates an ordering on a known field.
    #[must_use]
    pub const fn new(field: &'static str, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Resolves `raw` (`field` or `-field`) against `allowed`.
    ///
    /// Missing or unknown fields fall back to `default`.
    #[must_use]
    pub fn resolve(raw: Option<&str>, allowed: &[&'static str], default: Self) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return default;
        };

        let (name, direction) = match raw.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (raw, SortDirection::Asc),
        };

        allowed
            .iter()
            .find(|field| **field == name)
            .map_or(default, |field| Self::new(field, direction))
    }

    /// Returns the field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the direction.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

use masterhub_domain::{Ordering, SortDirection};

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Filters shared by every master-data list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Case-insensitive substring search over the entity's search fields.
    pub search: Option<String>,
    /// Includes soft-deleted records when set.
    pub include_deleted: bool,
    /// Requested ordering (`field` or `-field`).
    pub ordering: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
    /// Number of records to skip.
    pub offset: Option<u32>,
}

impl ListQuery {
    /// Returns the trimmed search term, if any.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Returns the page size clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Returns the page offset.
    #[must_use]
    pub fn page_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Resolves the requested ordering against an allow-list.
    #[must_use]
    pub fn resolve_ordering(&self, allowed: &[&'static str], default: Ordering) -> Ordering {
        Ordering::resolve(self.ordering.as_deref(), allowed, default)
    }
}

/// One page of list results plus the total number of matching records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records on the page.
    pub items: Vec<T>,
    /// Total number of matching records.
    pub count: u64,
}

impl<T> Page<T> {
    /// Maps the items, keeping the count.
    pub fn map<U>(self, mapper: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(mapper).collect(),
            count: self.count,
        }
    }
}

/// Convenience for default orderings declared as constants.
#[must_use]
pub const fn ascending(field: &'static str) -> Ordering {
    Ordering::new(field, SortDirection::Asc)
}

/// Convenience for default orderings declared as constants.
#[must_use]
pub const fn descending(field: &'static str) -> Ordering {
    Ordering::new(field, SortDirection::Desc)
}

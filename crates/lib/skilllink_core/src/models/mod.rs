//! Domain models shared by the API layer and the stores.

pub mod auth;
pub mod mentorship;
pub mod review;
pub mod skill;

use serde::Serialize;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Upper bound on page size.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Pagination and search parameters for list queries.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
}

impl ListQuery {
    /// Build a query, clamping missing or zero values to the defaults.
    pub fn new(page: Option<u32>, limit: Option<u32>, search: Option<String>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            page,
            limit,
            search,
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, query: &ListQuery) -> Self {
        Self {
            items,
            total,
            page: query.page,
            pages: total.div_ceil(u64::from(query.limit)),
        }
    }

    /// Map the items, keeping the totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            pages: self.pages,
        }
    }
}

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Hard ceiling imposed by the GitHub search API on `per_page`
pub const MAX_PAGE_SIZE: u32 = 100;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Safety cap on pages fetched per search, so an inconsistent live index can't keep us looping.
///
/// Together with [DEFAULT_PAGE_SIZE] this caps a search at 1000 results.
pub const DEFAULT_MAX_PAGES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Search query text must not be empty")]
    EmptyText,
    #[error("Page size must be between 1 and 100, got {0}")]
    PageSizeOutOfRange(u32),
    #[error("Max pages must be at least 1")]
    ZeroMaxPages,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Updated,
    Created,
    Comments,
}

impl SortField {
    pub fn api_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Created => "created",
            Self::Comments => "comments",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    pub fn api_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_str())
    }
}

/// Validated search parameters.
///
/// Fields are private so the invariants (non-empty text, page size within `1..=100`, at least one page)
/// hold for every value in circulation. Build with [SearchQuery::new] and the `with_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    sort: SortField,
    order: Order,
    page_size: u32,
    max_pages: u32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Result<Self, QueryError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QueryError::EmptyText);
        }
        Ok(Self {
            text,
            sort: SortField::default(),
            order: Order::default(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, QueryError> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(QueryError::PageSizeOutOfRange(page_size));
        }
        self.page_size = page_size;
        Ok(self)
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Result<Self, QueryError> {
        if max_pages == 0 {
            return Err(QueryError::ZeroMaxPages);
        }
        self.max_pages = max_pages;
        Ok(self)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sort(&self) -> SortField {
        self.sort
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Request for a given 1-based page of this query
    pub fn page_request(&self, page: u32) -> PageRequest<'_> {
        PageRequest {
            text: &self.text,
            sort: self.sort,
            order: self.order,
            page_size: self.page_size,
            page,
        }
    }
}

/// Everything needed to fetch one page. Pages are 1-based, like the GitHub API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub text: &'a str,
    pub sort: SortField,
    pub order: Order,
    pub page_size: u32,
    pub page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let query = SearchQuery::new("involves:octocat").unwrap();
        assert_eq!(query.sort(), SortField::Updated);
        assert_eq!(query.order(), Order::Desc);
        assert_eq!(query.page_size(), 100);
        assert_eq!(query.max_pages(), 10);
    }

    #[test]
    fn rejects_blank_text() {
        assert_eq!(SearchQuery::new(""), Err(QueryError::EmptyText));
        assert_eq!(SearchQuery::new("   \t"), Err(QueryError::EmptyText));
    }

    #[test]
    fn page_size_bounds() {
        let query = SearchQuery::new("is:issue").unwrap();
        assert_eq!(
            query.clone().with_page_size(0),
            Err(QueryError::PageSizeOutOfRange(0))
        );
        assert_eq!(
            query.clone().with_page_size(101),
            Err(QueryError::PageSizeOutOfRange(101))
        );
        assert_eq!(query.clone().with_page_size(1).unwrap().page_size(), 1);
        assert_eq!(query.with_page_size(100).unwrap().page_size(), 100);
    }

    #[test]
    fn max_pages_must_be_positive() {
        let query = SearchQuery::new("is:pr").unwrap();
        assert_eq!(query.clone().with_max_pages(0), Err(QueryError::ZeroMaxPages));
        assert_eq!(query.with_max_pages(3).unwrap().max_pages(), 3);
    }

    #[test]
    fn page_request_carries_parameters() {
        let query = SearchQuery::new("repo:rust-lang/rust")
            .unwrap()
            .with_sort(SortField::Comments)
            .with_order(Order::Asc)
            .with_page_size(30)
            .unwrap();
        let request = query.page_request(4);
        assert_eq!(request.text, "repo:rust-lang/rust");
        assert_eq!(request.sort.api_str(), "comments");
        assert_eq!(request.order.api_str(), "asc");
        assert_eq!(request.page_size, 30);
        assert_eq!(request.page, 4);
    }
}

//! # Paginated search
//!
//! Types shared between the search aggregator and whatever API it pages through.
//!
//!  - [query]: validated search parameters ([SearchQuery]) and the per-page request derived from them.
//!  - [identity]: identity keys used for deduplicating results.
//!  - [aggregator]: the page fetch loop itself. See [aggregator::search].
//!
//! The aggregator never talks HTTP directly, anything implementing [SearchApi] can be paged through.
//! The GitHub implementation lives in [crate::github].

pub mod aggregator;
pub mod identity;
pub mod query;

use async_trait::async_trait;

pub use aggregator::{search, search_with_outcome, SearchOutcome, StopReason};
pub use identity::{IdentityKey, SearchItem};
pub use query::{Order, PageRequest, QueryError, SearchQuery, SortField};

/// One page of results, as returned by the remote API.
///
/// `total_count` is whatever the API advertised for this page. Live search indexes change while
/// being paged through, so it is only used as a hint for when to stop.
#[derive(Debug, Clone)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> PageResponse<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }
}

/// A remote API that can return search results one page at a time.
///
/// Implementations are expected to fail on transport, authentication and rate limit errors. Retrying is
/// also their job, the aggregator gives up on the first error.
#[async_trait]
pub trait SearchApi {
    type Item: SearchItem + Send;
    type Error: std::error::Error + Send;

    async fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<PageResponse<Self::Item>, Self::Error>;
}

#[async_trait]
impl<A> SearchApi for &A
where
    A: SearchApi + Sync + ?Sized,
{
    type Item = A::Item;
    type Error = A::Error;

    async fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<PageResponse<Self::Item>, Self::Error> {
        (**self).fetch_page(request).await
    }
}

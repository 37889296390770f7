use super::{identity::dedup_by_identity, SearchApi, SearchQuery};

/// Why pagination stopped. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Accumulated at least as many items as the API advertised
    TotalReached,
    /// Hit the query's `max_pages` before reaching the advertised total
    PageLimit,
    /// The API returned an empty page before the advertised total was reached
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaginationState {
    Fetching { page: u32 },
    Done(StopReason),
}

/// Result of a single aggregation, together with how it went.
#[derive(Debug, Clone)]
pub struct SearchOutcome<T> {
    /// Deduplicated items, in the order they were first seen
    pub items: Vec<T>,
    /// Items received before deduplication
    pub raw_count: usize,
    /// Total advertised by the last page fetched
    pub total_count: u64,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
}

impl<T> SearchOutcome<T> {
    /// False whenever the advertised total wasn't reached. Results are best-effort either way.
    pub fn is_complete(&self) -> bool {
        self.raw_count as u64 >= self.total_count
    }
}

/// Fetch every page of `query`, up to its `max_pages`, and return the deduplicated items.
///
/// See [search_with_outcome].
pub async fn search<A: SearchApi>(api: A, query: &SearchQuery) -> Result<Vec<A::Item>, A::Error> {
    Ok(search_with_outcome(api, query).await?.items)
}

/// Fetch every page of `query` sequentially, up to its `max_pages`, then deduplicate by identity key.
///
/// Pagination stops, without error, once the accumulated item count reaches the `total_count` of the latest
/// page, once `max_pages` pages have been fetched, or when a page comes back empty. A short page is not the
/// end: GitHub returns those mid-search when it times out server-side. The advertised total is only a hint,
/// live search indexes change while being paged through.
///
/// Any error from `api` is returned as is, and whatever was accumulated until then is dropped.
pub async fn search_with_outcome<A: SearchApi>(
    api: A,
    query: &SearchQuery,
) -> Result<SearchOutcome<A::Item>, A::Error> {
    let mut accumulated = Vec::new();
    let mut total_count = 0;
    let mut pages_fetched = 0;
    let mut state = PaginationState::Fetching { page: 1 };

    let stop_reason = loop {
        let page = match state {
            PaginationState::Fetching { page } => page,
            PaginationState::Done(reason) => break reason,
        };

        let response = api.fetch_page(&query.page_request(page)).await?;
        pages_fetched += 1;
        total_count = response.total_count;
        let received = response.items.len();
        accumulated.extend(response.items);

        log::debug!(
            "Fetched page {page}: {received} items ({} of advertised {total_count})",
            accumulated.len()
        );

        state = if accumulated.len() as u64 >= total_count {
            PaginationState::Done(StopReason::TotalReached)
        } else if received == 0 {
            PaginationState::Done(StopReason::Exhausted)
        } else if page >= query.max_pages() {
            PaginationState::Done(StopReason::PageLimit)
        } else {
            PaginationState::Fetching { page: page + 1 }
        };
    };

    let raw_count = accumulated.len();
    let items = dedup_by_identity(accumulated);
    if items.len() < raw_count {
        log::debug!("Dropped {} duplicate items", raw_count - items.len());
    }

    Ok(SearchOutcome {
        items,
        raw_count,
        total_count,
        pages_fetched,
        stop_reason,
    })
}

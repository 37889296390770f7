use async_trait::async_trait;

use crate::search::{PageRequest, PageResponse, SearchApi};

/// Wraps a [SearchApi] and advances a progress bar by one for every page fetched.
///
/// The bar length is set to the expected page count when the first page arrives, as the total is unknown
/// before that.
pub struct ProgressSearchApi<A> {
    inner: A,
    bar: indicatif::ProgressBar,
    max_pages: u32,
}

impl<A> ProgressSearchApi<A> {
    pub fn new(inner: A, bar: indicatif::ProgressBar, max_pages: u32) -> Self {
        Self {
            inner,
            bar,
            max_pages,
        }
    }

    pub fn bar(&self) -> &indicatif::ProgressBar {
        &self.bar
    }
}

fn expected_pages(total_count: u64, page_size: u32, max_pages: u32) -> u64 {
    total_count
        .div_ceil(page_size.max(1) as u64)
        .min(max_pages as u64)
        .max(1)
}

#[async_trait]
impl<A> SearchApi for ProgressSearchApi<A>
where
    A: SearchApi + Sync,
{
    type Item = A::Item;
    type Error = A::Error;

    async fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<PageResponse<Self::Item>, Self::Error> {
        let response = self.inner.fetch_page(request).await?;
        if request.page == 1 {
            self.bar.set_length(expected_pages(
                response.total_count,
                request.page_size,
                self.max_pages,
            ));
        }
        self.bar.inc(1);
        Ok(response)
    }
}

use crate::core::accumulator::BestPriceAccumulator;
use crate::core::shape::{parse_listings_page, ParsedPage};
use crate::domain::model::PagingDescriptor;
use crate::domain::ports::{ListingsSource, PageRequest};
use crate::utils::error::{ResolveError, ResolveFailure, Stage};
use tokio_util::sync::CancellationToken;

/// Walks every listings page of one product and folds each into an accumulator.
///
/// The first page is always requested without `offset`/`limit`. When its
/// paging descriptor reports `total > 0` and `limit > 0`, the following pages
/// are requested at `offset + limit`, `offset + 2 * limit`, ... while the
/// offset stays below `total`. Pages are fetched one at a time since each
/// request depends on the first page's descriptor.
pub struct ListingsFetcher<'a, S: ListingsSource + ?Sized> {
    source: &'a S,
    product_id: &'a str,
}

impl<'a, S: ListingsSource + ?Sized> ListingsFetcher<'a, S> {
    pub fn new(source: &'a S, product_id: &'a str) -> Self {
        Self { source, product_id }
    }

    /// Returns the number of pages fetched. Any failure aborts the walk; the
    /// caller must discard whatever was folded so far.
    pub async fn fetch_into(
        &self,
        acc: &mut BestPriceAccumulator,
        cancel: &CancellationToken,
    ) -> Result<usize, ResolveError> {
        let first = self.fetch_page(None, cancel).await?;
        acc.fold_page(&first.listings);
        let mut pages = 1;

        let Some(paging) = first.paging.filter(PagingDescriptor::has_more_pages) else {
            return Ok(pages);
        };

        tracing::debug!(
            "Paged listings for {}: total={}, offset={}, limit={}",
            self.product_id,
            paging.total,
            paging.offset,
            paging.limit
        );

        let mut offset = paging.offset.saturating_add(paging.limit);
        while offset < paging.total {
            let request = PageRequest {
                offset,
                limit: paging.limit,
            };
            let page = self.fetch_page(Some(request), cancel).await?;
            acc.fold_page(&page.listings);
            pages += 1;
            offset = offset.saturating_add(paging.limit);
        }

        Ok(pages)
    }

    async fn fetch_page(
        &self,
        page: Option<PageRequest>,
        cancel: &CancellationToken,
    ) -> Result<ParsedPage, ResolveError> {
        let stage = page.map_or(Stage::FirstPage, |p| Stage::NextPage { offset: p.offset });

        if cancel.is_cancelled() {
            return Err(ResolveError::new(self.product_id, stage, ResolveFailure::Cancelled));
        }

        let body = self
            .source
            .fetch_listings_page(self.product_id, page, cancel)
            .await
            .map_err(|e| ResolveError::new(self.product_id, stage, e))?;

        parse_listings_page(&body).map_err(|e| ResolveError::new(self.product_id, stage, e))
    }
}

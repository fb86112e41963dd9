use crate::utils::error::FetchError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Offset/limit pair for every listings page after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

/// Network boundary of the resolver. Implementations return raw bodies and
/// must abort with [`FetchError::Cancelled`] once `cancel` fires.
#[async_trait]
pub trait ListingsSource: Send + Sync {
    /// `GET /products/{product_id}/items`, with `offset`/`limit` when `page` is set.
    async fn fetch_listings_page(
        &self,
        product_id: &str,
        page: Option<PageRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError>;

    /// `GET /items/{listing_id}`.
    async fn fetch_listing(
        &self,
        listing_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError>;
}

use crate::adapters::http::MeliClient;
use crate::config::ResolverConfig;
use crate::core::accumulator::BestPriceAccumulator;
use crate::core::fetcher::ListingsFetcher;
use crate::core::validator::{ActiveListingValidator, Confirmation};
use crate::domain::model::ResolvedPrice;
use crate::domain::ports::ListingsSource;
use crate::utils::error::{ResolveError, ResolveFailure, Result, Stage};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

/// Resolves the cheapest active listing of a catalog product.
///
/// Holds no per-call state, so one resolver can serve any number of
/// concurrent resolutions.
pub struct PriceResolver<S: ListingsSource> {
    source: S,
    concurrent_requests: usize,
}

impl PriceResolver<MeliClient> {
    /// Builds an HTTP-backed resolver from a validated configuration.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let client = MeliClient::new(config)?;
        Ok(Self::new(client).with_concurrency(config.concurrent_requests))
    }
}

impl<S: ListingsSource> PriceResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
        }
    }

    /// Upper bound on resolutions in flight during [`resolve_many`](Self::resolve_many).
    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches all listings pages, picks the cheapest active listing and
    /// confirms it is still active.
    ///
    /// Nothing is retried. When the winner fails confirmation the whole
    /// resolution fails; no runner-up is tried.
    pub async fn resolve_best_price(
        &self,
        cancel: &CancellationToken,
        product_id: &str,
    ) -> std::result::Result<ResolvedPrice, ResolveError> {
        let span = tracing::info_span!("resolve_best_price", product_id = %product_id);
        self.resolve_inner(cancel, product_id).instrument(span).await
    }

    async fn resolve_inner(
        &self,
        cancel: &CancellationToken,
        product_id: &str,
    ) -> std::result::Result<ResolvedPrice, ResolveError> {
        let mut acc = BestPriceAccumulator::new();
        let pages = ListingsFetcher::new(&self.source, product_id)
            .fetch_into(&mut acc, cancel)
            .await?;

        tracing::debug!(
            "Folded {} pages: {} listings seen, {} skipped",
            pages,
            acc.listings_seen(),
            acc.listings_skipped()
        );

        let best = acc.into_best().ok_or_else(|| {
            ResolveError::new(product_id, Stage::Selection, ResolveFailure::NoActiveListing)
        })?;

        tracing::debug!(
            "Before validation: price={:.2}, listing={}",
            best.price,
            best.listing_id
        );

        let confirmation = ActiveListingValidator::new(&self.source)
            .confirm(&best, cancel)
            .await
            .map_err(|e| ResolveError::new(product_id, Stage::Validation, e))?;

        if let Confirmation::Unconfirmed { reason } = &confirmation {
            tracing::info!("Accepting unconfirmed listing {}: {}", best.listing_id, reason);
        }

        tracing::info!(
            "Resolved best price {:.2} from listing {}",
            best.price,
            best.listing_id
        );
        Ok(best)
    }

    /// Resolves several products with at most `concurrent_requests` in flight.
    ///
    /// Results come back in input order. One product failing does not affect
    /// the others.
    pub async fn resolve_many(
        &self,
        cancel: &CancellationToken,
        product_ids: &[String],
    ) -> Vec<(String, std::result::Result<ResolvedPrice, ResolveError>)> {
        stream::iter(product_ids.iter())
            .map(|product_id| async move {
                let result = self.resolve_best_price(cancel, product_id).await;
                if let Err(e) = &result {
                    tracing::error!("Failed to get best price for {}: {}", product_id, e);
                }
                (product_id.clone(), result)
            })
            .buffered(self.concurrent_requests)
            .collect()
            .await
    }
}

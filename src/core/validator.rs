use crate::core::shape::decode_listing;
use crate::domain::model::ResolvedPrice;
use crate::domain::ports::ListingsSource;
use crate::utils::error::{FetchError, ResolveFailure};
use tokio_util::sync::CancellationToken;

/// How the winning listing got through confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// The lookup reported `active`.
    Active,
    /// The lookup itself failed; the candidate is accepted unvalidated.
    Unconfirmed { reason: String },
    /// Candidate had no listing id to look up.
    Skipped,
}

/// Re-checks the winning listing with a single `GET /items/{id}`.
///
/// A lookup that reports any status other than `active` rejects the
/// candidate, including a `null` body, which carries no status. A lookup
/// that fails outright (transport, HTTP status, undecodable body) does not.
/// Cancellation always rejects.
pub struct ActiveListingValidator<'a, S: ListingsSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: ListingsSource + ?Sized> ActiveListingValidator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub async fn confirm(
        &self,
        candidate: &ResolvedPrice,
        cancel: &CancellationToken,
    ) -> Result<Confirmation, ResolveFailure> {
        if candidate.listing_id.is_empty() {
            return Ok(Confirmation::Skipped);
        }
        if cancel.is_cancelled() {
            return Err(ResolveFailure::Cancelled);
        }

        let body = match self.source.fetch_listing(&candidate.listing_id, cancel).await {
            Ok(body) => body,
            Err(FetchError::Cancelled) => return Err(ResolveFailure::Cancelled),
            Err(e) => {
                tracing::warn!(
                    "Could not confirm listing {}, accepting as-is: {}",
                    candidate.listing_id,
                    e
                );
                return Ok(Confirmation::Unconfirmed {
                    reason: e.to_string(),
                });
            }
        };

        let listing = match decode_listing(&body) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(
                    "Undecodable confirmation for listing {}, accepting as-is: {}",
                    candidate.listing_id,
                    e
                );
                return Ok(Confirmation::Unconfirmed {
                    reason: format!("json decode listing: {}", e),
                });
            }
        };

        if !listing.is_active() {
            tracing::debug!(
                "Listing {} is not active (status={}), rejecting",
                candidate.listing_id,
                listing.status
            );
            return Err(ResolveFailure::ValidationFailed {
                listing_id: candidate.listing_id.clone(),
                status: listing.status,
            });
        }

        tracing::debug!("Listing {} confirmed active", candidate.listing_id);
        Ok(Confirmation::Active)
    }
}

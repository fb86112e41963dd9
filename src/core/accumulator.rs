use crate::domain::model::{Listing, ResolvedPrice};

/// Running minimum over eligible listings, folded one page at a time.
#[derive(Debug, Default)]
pub struct BestPriceAccumulator {
    best: Option<ResolvedPrice>,
    pages_folded: usize,
    listings_seen: usize,
    listings_skipped: usize,
}

impl BestPriceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one page and returns the best candidate so far.
    ///
    /// Listings with a non-positive price or a status other than `active` are
    /// skipped. A listing replaces the current best only when strictly
    /// cheaper, so ties keep the first one seen.
    pub fn fold_page(&mut self, listings: &[Listing]) -> Option<&ResolvedPrice> {
        self.pages_folded += 1;

        for listing in listings {
            self.listings_seen += 1;

            if !listing.is_eligible() {
                self.listings_skipped += 1;
                tracing::debug!(
                    "Skipping listing {}: price={:.2}, status={}",
                    listing.id,
                    listing.price,
                    listing.status
                );
                continue;
            }

            let improves = self
                .best
                .as_ref()
                .map_or(true, |best| listing.price < best.price);

            if improves {
                tracing::debug!("New best price: {:.2} from listing {}", listing.price, listing.id);
                self.best = Some(ResolvedPrice::from(listing));
            }
        }

        self.best.as_ref()
    }

    pub fn best(&self) -> Option<&ResolvedPrice> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<ResolvedPrice> {
        self.best
    }

    pub fn pages_folded(&self) -> usize {
        self.pages_folded
    }

    pub fn listings_seen(&self) -> usize {
        self.listings_seen
    }

    pub fn listings_skipped(&self) -> usize {
        self.listings_skipped
    }
}

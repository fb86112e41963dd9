use serde::Serialize;

/// The only listing status eligible for pricing.
pub const ACTIVE_STATUS: &str = "active";

/// A sellable instance of a catalog product, as decoded from any listings shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    pub price: f64,
    pub status: String,
    pub title: String,
    pub permalink: String,
    pub condition: Option<String>,
    pub currency_id: Option<String>,
}

impl Listing {
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }

    /// Positive price and active status. NaN prices are never eligible.
    pub fn is_eligible(&self) -> bool {
        self.price > 0.0 && self.is_active()
    }
}

/// `{total, offset, limit}` triple from the paged listings shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingDescriptor {
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl PagingDescriptor {
    pub fn has_more_pages(&self) -> bool {
        self.total > 0 && self.limit > 0
    }
}

/// Winning listing of a resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPrice {
    pub price: f64,
    pub listing_id: String,
    pub title: String,
    /// May be empty when the winner came from the paged shape.
    pub permalink: String,
}

impl From<&Listing> for ResolvedPrice {
    fn from(listing: &Listing) -> Self {
        Self {
            price: listing.price,
            listing_id: listing.id.clone(),
            title: listing.title.clone(),
            permalink: listing.permalink.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: f64, status: &str) -> Listing {
        Listing {
            id: "MLB1".to_string(),
            price,
            status: status.to_string(),
            title: String::new(),
            permalink: String::new(),
            condition: None,
            currency_id: None,
        }
    }

    #[test]
    fn test_eligibility_requires_positive_price_and_active_status() {
        assert!(listing(10.0, "active").is_eligible());
        assert!(!listing(0.0, "active").is_eligible());
        assert!(!listing(-5.0, "active").is_eligible());
        assert!(!listing(f64::NAN, "active").is_eligible());
        assert!(!listing(10.0, "paused").is_eligible());
        assert!(!listing(10.0, "Active").is_eligible());
    }

    #[test]
    fn test_paging_descriptor_more_pages() {
        let paging = PagingDescriptor { total: 25, offset: 0, limit: 10 };
        assert!(paging.has_more_pages());
        assert!(!PagingDescriptor { total: 25, offset: 0, limit: 0 }.has_more_pages());
        assert!(!PagingDescriptor::default().has_more_pages());
    }
}

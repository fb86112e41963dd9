use crate::domain::model::{Listing, PagingDescriptor, ACTIVE_STATUS};
use crate::utils::error::ShapeError;
use serde::Deserialize;
use std::fmt;

/// The three listings body layouts the products endpoint is known to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{"items": [...]}`
    Wrapped,
    /// `[...]`
    Bare,
    /// `{"paging": {...}, "results": [...]}`
    Paged,
}

impl Shape {
    /// Detection order.
    pub const ALL: [Shape; 3] = [Shape::Wrapped, Shape::Bare, Shape::Paged];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Wrapped => "wrapped",
            Shape::Bare => "bare",
            Shape::Paged => "paged",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded listings page.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub shape: Shape,
    pub listings: Vec<Listing>,
    /// Only the paged shape carries one.
    pub paging: Option<PagingDescriptor>,
}

// Wire types. Nulls and missing keys decode to zero values instead of
// rejecting the whole page: a null array element becomes an empty listing,
// a null or negative paging number becomes 0.

#[derive(Debug, Default, Deserialize)]
struct WireItem {
    id: Option<String>,
    title: Option<String>,
    price: Option<f64>,
    status: Option<String>,
    permalink: Option<String>,
    condition: Option<String>,
    currency_id: Option<String>,
}

impl From<WireItem> for Listing {
    fn from(item: WireItem) -> Self {
        Listing {
            id: item.id.unwrap_or_default(),
            price: item.price.unwrap_or_default(),
            status: item.status.unwrap_or_default(),
            title: item.title.unwrap_or_default(),
            permalink: item.permalink.unwrap_or_default(),
            condition: item.condition,
            currency_id: item.currency_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WrappedBody {
    items: Option<Vec<Option<WireItem>>>,
}

#[derive(Debug, Deserialize)]
struct WirePaging {
    total: Option<i64>,
    offset: Option<i64>,
    limit: Option<i64>,
}

fn non_negative(value: Option<i64>) -> u64 {
    value.map_or(0, |v| v.max(0) as u64)
}

impl From<WirePaging> for PagingDescriptor {
    fn from(paging: WirePaging) -> Self {
        PagingDescriptor {
            total: non_negative(paging.total),
            offset: non_negative(paging.offset),
            limit: non_negative(paging.limit),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResult {
    item_id: Option<String>,
    price: Option<f64>,
    condition: Option<String>,
    currency_id: Option<String>,
    status: Option<String>,
}

impl From<WireResult> for Listing {
    fn from(result: WireResult) -> Self {
        Listing {
            id: result.item_id.unwrap_or_default(),
            price: result.price.unwrap_or_default(),
            // Paged results normally carry no status; the winner is re-checked
            // by the confirmation lookup.
            status: result.status.unwrap_or_else(|| ACTIVE_STATUS.to_string()),
            title: String::new(),
            permalink: String::new(),
            condition: result.condition,
            currency_id: result.currency_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PagedBody {
    paging: Option<WirePaging>,
    results: Option<Vec<Option<WireResult>>>,
}

/// Null elements become an empty, ineligible listing.
fn to_listings<T: Into<Listing>>(elements: Vec<Option<T>>) -> Vec<Listing> {
    elements
        .into_iter()
        .map(|element| match element {
            Some(element) => element.into(),
            None => Listing::from(WireItem::default()),
        })
        .collect()
}

/// Decodes `body` as the given shape. `None` when it does not decode or
/// yields no listings.
pub fn decode_as(shape: Shape, body: &[u8]) -> Option<ParsedPage> {
    match shape {
        Shape::Wrapped => {
            let wrapped: WrappedBody = serde_json::from_slice(body).ok()?;
            let items = wrapped.items.filter(|items| !items.is_empty())?;
            Some(ParsedPage {
                shape,
                listings: to_listings(items),
                paging: None,
            })
        }
        Shape::Bare => {
            let items: Vec<Option<WireItem>> = serde_json::from_slice(body).ok()?;
            if items.is_empty() {
                return None;
            }
            Some(ParsedPage {
                shape,
                listings: to_listings(items),
                paging: None,
            })
        }
        Shape::Paged => {
            let paged: PagedBody = serde_json::from_slice(body).ok()?;
            let results = paged.results.filter(|results| !results.is_empty())?;
            Some(ParsedPage {
                shape,
                listings: to_listings(results),
                paging: paged.paging.map(PagingDescriptor::from),
            })
        }
    }
}

/// Tries every [`Shape`] in [`Shape::ALL`] order and returns the first
/// non-empty decode.
pub fn parse_listings_page(body: &[u8]) -> Result<ParsedPage, ShapeError> {
    for shape in Shape::ALL {
        if let Some(page) = decode_as(shape, body) {
            tracing::debug!(
                "Decoded {} listings as {} shape (paging: {:?})",
                page.listings.len(),
                shape,
                page.paging
            );
            return Ok(page);
        }
    }
    Err(ShapeError::from_bytes(body))
}

/// Decodes the single-listing body returned by the confirmation lookup.
/// A `null` body decodes to an empty listing, which is not active.
pub fn decode_listing(body: &[u8]) -> Result<Listing, serde_json::Error> {
    serde_json::from_slice::<Option<WireItem>>(body).map(|item| item.unwrap_or_default().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_shape() {
        let body = br#"{"items": [
            {"id": "A", "price": 100, "status": "active", "title": "Phone", "permalink": "https://x/A"},
            {"id": "B", "price": 80.5, "status": "inactive"}
        ]}"#;

        let page = parse_listings_page(body).unwrap();

        assert_eq!(page.shape, Shape::Wrapped);
        assert_eq!(page.paging, None);
        assert_eq!(page.listings.len(), 2);
        assert_eq!(page.listings[0].id, "A");
        assert_eq!(page.listings[0].title, "Phone");
        assert_eq!(page.listings[0].permalink, "https://x/A");
        assert_eq!(page.listings[1].price, 80.5);
        assert_eq!(page.listings[1].title, "");
    }

    #[test]
    fn test_bare_shape() {
        let body = br#"[{"id": "A", "price": 10, "status": "active", "currency_id": "BRL"}]"#;

        let page = parse_listings_page(body).unwrap();

        assert_eq!(page.shape, Shape::Bare);
        assert_eq!(page.paging, None);
        assert_eq!(page.listings[0].currency_id.as_deref(), Some("BRL"));
    }

    #[test]
    fn test_paged_shape_passes_paging_through() {
        let body = br#"{
            "paging": {"total": 25, "offset": 0, "limit": 10},
            "results": [
                {"item_id": "MLB1", "price": 55.0, "condition": "new"},
                {"item_id": "MLB2", "price": 60.0, "condition": "used", "status": "paused"}
            ]
        }"#;

        let page = parse_listings_page(body).unwrap();

        assert_eq!(page.shape, Shape::Paged);
        assert_eq!(
            page.paging,
            Some(PagingDescriptor { total: 25, offset: 0, limit: 10 })
        );
        assert_eq!(page.listings[0].id, "MLB1");
        assert_eq!(page.listings[0].status, "active");
        assert_eq!(page.listings[0].condition.as_deref(), Some("new"));
        assert_eq!(page.listings[1].status, "paused");
        assert!(page.listings[1].permalink.is_empty());
    }

    #[test]
    fn test_paged_shape_without_paging_is_unpaged() {
        let body = br#"{"results": [{"item_id": "MLB1", "price": 5}]}"#;

        let page = parse_listings_page(body).unwrap();

        assert_eq!(page.shape, Shape::Paged);
        assert_eq!(page.paging, None);
    }

    #[test]
    fn test_empty_wrapper_falls_through_to_unknown() {
        let err = parse_listings_page(br#"{"items": []}"#).unwrap_err();
        assert_eq!(err.body, r#"{"items": []}"#);

        assert!(parse_listings_page(b"[]").is_err());
        assert!(parse_listings_page(br#"{"paging": {"total": 0}, "results": []}"#).is_err());
    }

    #[test]
    fn test_unknown_shape_keeps_raw_body() {
        let body = b"<html>rate limited</html>";

        let err = parse_listings_page(body).unwrap_err();

        assert_eq!(err.body, "<html>rate limited</html>");
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_wrapped_wins_over_paged_when_both_present() {
        let body = br#"{
            "items": [{"id": "W", "price": 1, "status": "active"}],
            "paging": {"total": 50, "offset": 0, "limit": 10},
            "results": [{"item_id": "P", "price": 2}]
        }"#;

        let page = parse_listings_page(body).unwrap();

        assert_eq!(page.shape, Shape::Wrapped);
        assert_eq!(page.paging, None);
        assert_eq!(page.listings[0].id, "W");
    }

    #[test]
    fn test_null_fields_decode_to_defaults() {
        let body = br#"[{"id": "A", "price": null, "status": null, "title": null}]"#;

        let page = parse_listings_page(body).unwrap();

        assert_eq!(page.listings[0].price, 0.0);
        assert_eq!(page.listings[0].status, "");
        assert!(!page.listings[0].is_eligible());
    }

    #[test]
    fn test_null_paging_numbers_decode_to_zero() {
        let body = br#"{"paging": {"total": null, "offset": 0, "limit": 10},
            "results": [{"item_id": "X", "price": 5}]}"#;

        let page = parse_listings_page(body).unwrap();

        assert_eq!(page.shape, Shape::Paged);
        assert_eq!(
            page.paging,
            Some(PagingDescriptor { total: 0, offset: 0, limit: 10 })
        );
        assert!(!page.paging.unwrap().has_more_pages());
        assert_eq!(page.listings[0].id, "X");
    }

    #[test]
    fn test_negative_paging_numbers_clamp_to_zero() {
        let body = br#"{"paging": {"total": 40, "offset": -5, "limit": -1},
            "results": [{"item_id": "X", "price": 5}]}"#;

        let page = parse_listings_page(body).unwrap();

        assert_eq!(
            page.paging,
            Some(PagingDescriptor { total: 40, offset: 0, limit: 0 })
        );
        assert!(!page.paging.unwrap().has_more_pages());
    }

    #[test]
    fn test_null_elements_become_ineligible_listings() {
        let wrapped = parse_listings_page(br#"{"items": [null, {"id": "A", "price": 5, "status": "active"}]}"#)
            .unwrap();
        assert_eq!(wrapped.shape, Shape::Wrapped);
        assert_eq!(wrapped.listings.len(), 2);
        assert!(!wrapped.listings[0].is_eligible());
        assert!(wrapped.listings[1].is_eligible());

        let bare = parse_listings_page(br#"[{"id": "A", "price": 5, "status": "active"}, null]"#).unwrap();
        assert_eq!(bare.shape, Shape::Bare);
        assert!(!bare.listings[1].is_eligible());

        let paged = parse_listings_page(br#"{"paging": null, "results": [null, {"item_id": "P", "price": 7}]}"#)
            .unwrap();
        assert_eq!(paged.shape, Shape::Paged);
        assert_eq!(paged.paging, None);
        assert!(!paged.listings[0].is_eligible());
        assert_eq!(paged.listings[1].id, "P");
    }

    #[test]
    fn test_decode_as_rejects_mismatched_shape() {
        let bare = br#"[{"id": "A", "price": 1, "status": "active"}]"#;
        assert!(decode_as(Shape::Wrapped, bare).is_none());
        assert!(decode_as(Shape::Paged, bare).is_none());
        assert!(decode_as(Shape::Bare, bare).is_some());
    }

    #[test]
    fn test_decode_listing() {
        let listing = decode_listing(br#"{"id": "A", "status": "paused", "price": 3}"#).unwrap();
        assert_eq!(listing.status, "paused");
        assert!(!listing.is_active());

        assert!(decode_listing(b"not json").is_err());

        let empty = decode_listing(b"null").unwrap();
        assert_eq!(empty.status, "");
        assert!(!empty.is_active());
    }
}

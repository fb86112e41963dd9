use crate::config::ResolverConfig;
use crate::domain::ports::{ListingsSource, PageRequest};
use crate::utils::error::{FetchError, PricerError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Mercado Livre listings client.
///
/// Every request carries the configured bearer token, `Accept` and
/// `Accept-Language` headers and is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct MeliClient {
    client: Client,
    base_url: Url,
}

impl MeliClient {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            PricerError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: config.base_url.clone(),
                reason: format!("Invalid URL format: {}", e),
            }
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PricerError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: config.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("accept_language", &config.accept_language)?,
        );

        match config.access_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                let mut auth = header_value("access_token", &format!("Bearer {}", token))?;
                auth.set_sensitive(true);
                headers.insert(AUTHORIZATION, auth);
            }
            None => tracing::warn!("No access token configured, requests will be unauthenticated"),
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `{base}/products/{product_id}/items[?offset=N&limit=M]`
    pub fn listings_url(&self, product_id: &str, page: Option<PageRequest>) -> Url {
        let mut url = self.endpoint(&["products", product_id, "items"]);
        if let Some(page) = page {
            url.query_pairs_mut()
                .append_pair("offset", &page.offset.to_string())
                .append_pair("limit", &page.limit.to_string());
        }
        url
    }

    /// `{base}/items/{listing_id}`
    pub fn listing_url(&self, listing_id: &str) -> Url {
        self.endpoint(&["items", listing_id])
    }

    async fn get_bytes(&self, url: Url, cancel: &CancellationToken) -> std::result::Result<Vec<u8>, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        tracing::debug!("GET {}", url);

        let request = async {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            tracing::debug!("Response status for {}: {}", url, status);

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(FetchError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok::<_, FetchError>(response.bytes().await?.to_vec())
        };

        tokio::select! {
            result = request => result,
            _ = cancel.cancelled() => {
                tracing::warn!("Request cancelled for {}", url);
                Err(FetchError::Cancelled)
            }
        }
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| PricerError::InvalidConfigValueError {
        field: field.to_string(),
        value: String::new(),
        reason: format!("Not a valid header value: {}", e),
    })
}

#[async_trait]
impl ListingsSource for MeliClient {
    async fn fetch_listings_page(
        &self,
        product_id: &str,
        page: Option<PageRequest>,
        cancel: &CancellationToken,
    ) -> std::result::Result<Vec<u8>, FetchError> {
        self.get_bytes(self.listings_url(product_id, page), cancel).await
    }

    async fn fetch_listing(
        &self,
        listing_id: &str,
        cancel: &CancellationToken,
    ) -> std::result::Result<Vec<u8>, FetchError> {
        self.get_bytes(self.listing_url(listing_id), cancel).await
    }
}

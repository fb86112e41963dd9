//! In-memory [`ListingsSource`] for unit tests.

use crate::domain::ports::{ListingsSource, PageRequest};
use crate::utils::error::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(String),
    Status(u16, String),
    Transport(String),
    /// Blocks until the cancellation token fires.
    Hang,
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    pages: HashMap<Option<u64>, Reply>,
    product_first_pages: HashMap<String, Reply>,
    listings: HashMap<String, Reply>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn first_page(self, body: &str) -> Self {
        self.first_page_reply(Reply::Body(body.to_string()))
    }

    pub(crate) fn first_page_reply(mut self, reply: Reply) -> Self {
        self.pages.insert(None, reply);
        self
    }

    /// First page for one product only; other products fall back to [`first_page`](Self::first_page).
    pub(crate) fn first_page_for(mut self, product_id: &str, body: &str) -> Self {
        self.product_first_pages
            .insert(product_id.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub(crate) fn page_at(self, offset: u64, body: &str) -> Self {
        self.page_reply_at(offset, Reply::Body(body.to_string()))
    }

    pub(crate) fn page_reply_at(mut self, offset: u64, reply: Reply) -> Self {
        self.pages.insert(Some(offset), reply);
        self
    }

    pub(crate) fn listing(self, id: &str, status: &str) -> Self {
        let body = format!(r#"{{"id": "{}", "status": "{}"}}"#, id, status);
        self.listing_reply(id, Reply::Body(body))
    }

    pub(crate) fn listing_reply(mut self, id: &str, reply: Reply) -> Self {
        self.listings.insert(id.to_string(), reply);
        self
    }

    /// Requests in arrival order: `page`, `page@10/10`, `item:A`.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(&self, entry: String) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(entry);
        }
    }

    async fn answer(reply: Option<Reply>, cancel: &CancellationToken) -> Result<Vec<u8>, FetchError> {
        match reply {
            Some(Reply::Body(body)) => Ok(body.into_bytes()),
            Some(Reply::Status(status, body)) => Err(FetchError::UnexpectedStatus { status, body }),
            Some(Reply::Transport(message)) => Err(FetchError::Transport(message.into())),
            Some(Reply::Hang) => {
                cancel.cancelled().await;
                Err(FetchError::Cancelled)
            }
            None => Err(FetchError::UnexpectedStatus {
                status: 404,
                body: "not found".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ListingsSource for ScriptedSource {
    async fn fetch_listings_page(
        &self,
        product_id: &str,
        page: Option<PageRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        match page {
            Some(p) => self.record(format!("page@{}/{}", p.offset, p.limit)),
            None => self.record("page".to_string()),
        }
        let reply = match page {
            None => self
                .product_first_pages
                .get(product_id)
                .or_else(|| self.pages.get(&None))
                .cloned(),
            Some(p) => self.pages.get(&Some(p.offset)).cloned(),
        };
        Self::answer(reply, cancel).await
    }

    async fn fetch_listing(
        &self,
        listing_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        self.record(format!("item:{}", listing_id));
        let reply = self.listings.get(listing_id).cloned();
        Self::answer(reply, cancel).await
    }
}

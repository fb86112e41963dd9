pub mod toml_config;

#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{PricerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.mercadolibre.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9";

/// Everything a resolver needs to talk to the listings API.
///
/// Built once and handed to [`PriceResolver::from_config`](crate::PriceResolver::from_config);
/// there is no process-wide client or token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub accept_language: String,
    pub concurrent_requests: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            concurrent_requests: crate::core::resolver::DEFAULT_CONCURRENT_REQUESTS,
        }
    }
}

impl ResolverConfig {
    /// Overrides fields from `MELI_BASE_URL`, `MELI_ACCESS_TOKEN`,
    /// `MELI_TIMEOUT_SECONDS` and `MELI_CONCURRENT_REQUESTS` when set.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("MELI_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(token) = lookup("MELI_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        if let Some(timeout) = lookup("MELI_TIMEOUT_SECONDS") {
            self.timeout_seconds = parse_number("MELI_TIMEOUT_SECONDS", &timeout)?;
        }
        if let Some(concurrent) = lookup("MELI_CONCURRENT_REQUESTS") {
            self.concurrent_requests = parse_number("MELI_CONCURRENT_REQUESTS", &concurrent)?;
        }
        Ok(self)
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| PricerError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: format!("{}", e),
        })
}

impl Validate for ResolverConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        validation::validate_non_empty_string("user_agent", &self.user_agent)?;
        Ok(())
    }
}

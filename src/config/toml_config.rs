use crate::config::ResolverConfig;
use crate::utils::error::{PricerError, Result};
use crate::utils::validation::Validate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk configuration:
///
/// ```toml
/// [api]
/// base_url = "https://api.mercadolibre.com"
/// access_token = "${MELI_ACCESS_TOKEN}"
/// timeout_seconds = 10
///
/// [resolver]
/// concurrent_requests = 5
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    pub resolver: Option<ResolverSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverSection {
    pub concurrent_requests: Option<usize>,
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PricerError::InvalidConfigValueError {
            field: "env_pattern".to_string(),
            value: String::new(),
            reason: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// Overrides `base` with every field set in the file.
    pub fn apply_to(&self, mut base: ResolverConfig) -> ResolverConfig {
        let api = &self.api;
        if let Some(base_url) = &api.base_url {
            base.base_url = base_url.clone();
        }
        if let Some(token) = api.access_token.as_ref().filter(|t| !is_unresolved(t)) {
            base.access_token = Some(token.clone());
        }
        if let Some(timeout) = api.timeout_seconds {
            base.timeout_seconds = timeout;
        }
        if let Some(user_agent) = &api.user_agent {
            base.user_agent = user_agent.clone();
        }
        if let Some(accept_language) = &api.accept_language {
            base.accept_language = accept_language.clone();
        }
        if let Some(concurrent) = self.resolver.as_ref().and_then(|r| r.concurrent_requests) {
            base.concurrent_requests = concurrent;
        }
        base
    }

    pub fn into_resolver_config(self) -> ResolverConfig {
        self.apply_to(ResolverConfig::default())
    }
}

/// A `${VAR}` placeholder left behind because the variable was not set.
fn is_unresolved(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_resolver_config().validate()
    }
}

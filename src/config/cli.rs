use crate::config::toml_config::TomlConfig;
use crate::config::ResolverConfig;
use crate::utils::error::{PricerError, Result};
use crate::utils::validation::{validate_product_id, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "meli-pricer")]
#[command(about = "Resolve the cheapest active listing of Mercado Livre catalog products")]
pub struct CliConfig {
    /// Catalog product ids, e.g. MLB123
    #[arg(required = true)]
    pub product_ids: Vec<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long, env = "MELI_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    #[arg(long, help = "Print results and logs as JSON lines")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Defaults, then the config file, then `MELI_*` variables, then flags.
    pub fn resolver_config(&self) -> Result<ResolverConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_resolver_config(),
            None => ResolverConfig::default(),
        }
        .with_env_overrides()?;

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(token) = &self.token {
            config.access_token = Some(token.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        if let Some(concurrent) = self.concurrent_requests {
            config.concurrent_requests = concurrent;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.product_ids.is_empty() {
            return Err(PricerError::MissingConfigError {
                field: "product_ids".to_string(),
            });
        }
        for product_id in &self.product_ids {
            validate_product_id("product_ids", product_id)?;
        }
        Ok(())
    }
}

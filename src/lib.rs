pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::http::MeliClient;
pub use config::ResolverConfig;
pub use core::resolver::PriceResolver;
pub use domain::model::{Listing, PagingDescriptor, ResolvedPrice};
pub use tokio_util::sync::CancellationToken;
pub use utils::error::{ErrorKind, PricerError, ResolveError, ResolveFailure, Result, Stage};

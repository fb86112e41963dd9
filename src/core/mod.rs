pub mod accumulator;
pub mod fetcher;
pub mod resolver;
pub mod shape;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{Listing, PagingDescriptor, ResolvedPrice};
pub use crate::domain::ports::{ListingsSource, PageRequest};

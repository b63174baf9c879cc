pub mod derive;
pub mod filter;
pub mod grouping;
pub mod metrics;
pub mod repository;
pub mod service;

pub use filter::View;
pub use repository::{Dataset, LoadError};

#[cfg(test)]
pub(crate) mod test_support;

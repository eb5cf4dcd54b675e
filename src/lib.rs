pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod extract;
pub mod index;
pub mod local;
pub mod model;
pub mod output;
pub mod progress;
pub mod router;

pub use router::{CancelFlag, CardData, CardDetail, CardQuery, CardRepository, DataSource};

#[cfg(test)]
mod error_test;
#[cfg(test)]
mod test_support;

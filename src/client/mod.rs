//! # Token Client module
//! Contains the protocol core and the blocking and async clients built on it

#[allow(clippy::module_inception)]
mod client;

/// Authority and tenant helpers
pub mod helpers;

mod async_client;
mod blocking_client;
mod request_builder;
mod response_processor;
mod token_client;

pub use async_client::AsyncClient;
pub use blocking_client::BlockingClient;
pub use client::{CacheSlot, ClientCore, ClientSnapshot};
pub use request_builder::{JWT_BEARER_ASSERTION, JWT_BEARER_GRANT};
pub use token_client::{AsyncTokenClient, TokenClient};

#[cfg(test)]
#[path = "../tests/client/token_client_tests.rs"]
mod token_client_tests;

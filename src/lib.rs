#![warn(missing_docs)]
//! # Identity Token Client
//!
//! Core of an OAuth2 / OpenID Connect confidential client for the Microsoft identity platform
//! (and ADFS). It builds token endpoint requests, turns the responses into access tokens and
//! keeps refresh and access tokens in a cache.
//!
//! ## Client
//!
//! ### New Instance
//! - [client::BlockingClient::new]
//! - [client::AsyncClient::new]
//!
//! ### Token requests
//! - [client::TokenClient::obtain_token_by_authorization_code]
//! - [client::TokenClient::obtain_token_by_jwt_assertion]
//! - [client::TokenClient::obtain_token_by_client_certificate]
//! - [client::TokenClient::obtain_token_by_client_secret]
//! - [client::TokenClient::obtain_token_by_refresh_token]
//! - [client::TokenClient::obtain_token_on_behalf_of]
//! - [client::TokenClient::obtain_token_on_behalf_of_by_refresh_token]
//!
//! Every one of them has an async twin on [client::AsyncTokenClient].
//!
//! ### Cache reads
//! - [client::TokenClient::get_cached_access_token]
//! - [client::TokenClient::get_cached_refresh_tokens]
//!
//! ### Snapshots
//! - [client::ClientCore::snapshot]
//! - [client::ClientCore::restore]
//!
//! ## Building blocks
//! - [claims::merge_claims_challenge_and_capabilities]
//! - [certificate::sign_client_assertion]
//! - [certificate::PemClientCertificate::from_pem]
//! - [cache::TokenCacheAdapter]
//!
//! ## Http Client
//! Requests go through [types::OidcHttpClient] or [types::OidcBlockingHttpClient]. With the
//! default `http_client` feature, `http_client::DefaultHttpClient` implements both on top of
//! reqwest.

pub mod cache;
pub mod certificate;
pub mod claims;
pub mod client;
pub mod helpers;
#[cfg(feature = "http_client")]
pub mod http_client;
pub mod types;

/// Re exports from the crate
pub mod re_exports {
    pub use josekit::{self};
    pub use serde_json::{self, json, Value};
    pub use url;
}

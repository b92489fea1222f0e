//! # Types Module
//! All the types, response, request, error etc are in this module

mod access_token_info;
mod cache_persistence_options;
mod client_core_options;
mod client_credential;
mod errors;
pub mod http_client;
mod token_request_options;

pub use access_token_info::AccessTokenInfo;
pub use cache_persistence_options::CachePersistenceOptions;
pub use client_core_options::{
    ClientCoreOptions, AUTHORITY_HOST_ENV, DISABLE_MULTITENANT_AUTH_ENV,
};
pub use client_credential::{AssertionProvider, ClientCredential};
pub use errors::{
    AuthenticationError, Error, ErrorWithResponse, OidcClientError, OidcReturnType, TypeError,
};
pub use http_client::{
    HttpMethod, HttpRequest, HttpResponse, OidcBlockingHttpClient, OidcHttpClient,
};
pub use token_request_options::TokenRequestOptions;

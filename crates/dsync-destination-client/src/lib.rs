mod client;
mod config;
pub mod error;
mod factory;
mod retry;
mod token;

pub use client::{
    DestinationApi, DestinationPage, PAGE_COUNT_HEADER, RemoteDestinationClient,
};
pub use config::{ClientCredentials, DestinationClientConfig, MtlsIdentity, RegionInstanceConfig};
pub use error::{DestinationClientError, Result};
pub use factory::{ClientFactory, ClientProvider, token_url_for_subdomain};

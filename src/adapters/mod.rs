// Adapters layer: concrete implementations for external systems (storage, http, browser).

#[cfg(feature = "browser")]
pub mod browser;
pub mod http;
pub mod storage;

pub use http::HttpFetcher;
pub use storage::LocalStorage;

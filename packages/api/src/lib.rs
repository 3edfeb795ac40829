//! HTTP client for the hosted auth and data service behind the SportCare dashboard.
//!
//! [`HostedService`] is the production implementation of
//! [`store::AuthProvider`] and [`store::DataService`].

mod cache;
mod client;
mod error;
mod query;
mod wire;

#[cfg(target_arch = "wasm32")]
pub use cache::LocalStorageCache;
pub use cache::{MemoryCache, SessionCache};
pub use client::HostedService;
pub use error::ServiceError;
pub use query::{parse_content_range, Order, Query};

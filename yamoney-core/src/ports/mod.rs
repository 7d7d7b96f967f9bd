//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod data_provider;
mod host;
mod transport;

pub use data_provider::DataAggregationProvider;
pub use host::{Host, NavigationInterceptor, RedirectOutcome, RedirectParams, WebView};
pub use transport::{HttpRequest, HttpResponse, HttpTransport};

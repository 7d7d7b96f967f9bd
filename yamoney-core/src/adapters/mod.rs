//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest for the HttpTransport port
//! - a scripted in-memory transport for tests
//! - a channel-driven WebView for hosts that report navigations
//! - the Yandex.Money client for DataAggregationProvider

pub mod channel_view;
pub mod mock_transport;
pub mod reqwest_transport;
pub mod yandex_money;

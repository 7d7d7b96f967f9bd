//! Yamoney Core - Yandex.Money integration for personal finance tooling
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Credential, account snapshot, operation records, errors
//! - **ports**: Trait definitions for external dependencies (HttpTransport, WebView, DataAggregationProvider)
//! - **services**: Sync orchestration and logging
//! - **adapters**: Concrete implementations (reqwest, Yandex.Money gate, channel web view)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::yandex_money::YandexMoneyClient;
use config::Config;
use ports::{Host, HttpTransport};
use services::SyncService;

// Re-export commonly used types at crate root
pub use config::GateConfig;
pub use domain::result::{is_auth_error, Error};
pub use domain::{AccountSnapshot, Credential, TransactionRecord};

/// Main context for Yandex.Money operations
///
/// Holds the loaded configuration, the gate client and the services
/// built on top of it.
pub struct YamoneyContext {
    pub config: Config,
    pub client: Arc<YandexMoneyClient>,
    pub sync_service: SyncService,
}

impl YamoneyContext {
    /// Create a new context from the settings in `app_dir`
    pub fn new(app_dir: &Path, host: Host, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let config = Config::load(app_dir)?;
        Self::from_config(config, host, transport)
    }

    /// Create a context from an already loaded configuration
    pub fn from_config(config: Config, host: Host, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        let gate = config
            .gate_config()
            .context("Yandex.Money is not configured, run `ym setup` first")?;

        let client = Arc::new(YandexMoneyClient::new(gate, transport, host));
        let sync_service = SyncService::new(client.clone());

        Ok(Self {
            config,
            client,
            sync_service,
        })
    }
}

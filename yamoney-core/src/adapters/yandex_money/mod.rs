//! Yandex.Money gate client
//!
//! Login through the host's web view, then account info and operation
//! history over the gate's form-encoded POST API.
//!
//! API Documentation: https://yandex.ru/dev/money/doc/dg/concepts/About.html

pub mod gate;
pub mod history;
pub mod login;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::GateConfig;
use crate::domain::result::Result;
use crate::domain::{AccountSnapshot, Credential, TransactionRecord};
use crate::ports::{DataAggregationProvider, Host, HttpTransport};

/// Provider name used in sync results and logs
pub const PROVIDER_NAME: &str = "yandex-money";

/// Yandex.Money client
///
/// Stateless apart from its injected configuration; clones share the
/// transport and host.
#[derive(Clone)]
pub struct YandexMoneyClient {
    config: GateConfig,
    transport: Arc<dyn HttpTransport>,
    host: Host,
}

impl YandexMoneyClient {
    pub fn new(config: GateConfig, transport: Arc<dyn HttpTransport>, host: Host) -> Self {
        Self {
            config,
            transport,
            host,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Run the interactive authorization
    pub async fn login(&self) -> Result<Credential> {
        login::login(self.transport.as_ref(), &self.config, &self.host).await
    }

    pub async fn fetch_account(&self, credential: &Credential) -> Result<AccountSnapshot> {
        history::fetch_account(self.transport.as_ref(), &self.config, credential).await
    }

    pub async fn fetch_transactions(
        &self,
        credential: &Credential,
        from: DateTime<Utc>,
        till: Option<DateTime<Utc>>,
    ) -> Result<Vec<TransactionRecord>> {
        history::fetch_transactions(self.transport.as_ref(), &self.config, credential, from, till)
            .await
    }
}

#[async_trait]
impl DataAggregationProvider for YandexMoneyClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn login(&self) -> Result<Credential> {
        YandexMoneyClient::login(self).await
    }

    async fn fetch_account(&self, credential: &Credential) -> Result<AccountSnapshot> {
        YandexMoneyClient::fetch_account(self, credential).await
    }

    async fn fetch_transactions(
        &self,
        credential: &Credential,
        from: DateTime<Utc>,
        till: Option<DateTime<Utc>>,
    ) -> Result<Vec<TransactionRecord>> {
        YandexMoneyClient::fetch_transactions(self, credential, from, till).await
    }
}

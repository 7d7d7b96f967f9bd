//! Data aggregation provider port
//!
//! Defines the interface for logging in to an external financial service and
//! fetching its account snapshot and operation history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::result::Result;
use crate::domain::{AccountSnapshot, Credential, TransactionRecord};

/// Data aggregation provider trait
///
/// The SyncService uses this trait to pull data without knowing the
/// specifics of the provider's API.
#[async_trait]
pub trait DataAggregationProvider: Send + Sync {
    /// Provider name (e.g., "yandex-money")
    fn name(&self) -> &str;

    /// Run the interactive authorization and return a fresh credential
    async fn login(&self) -> Result<Credential>;

    /// Fetch the account snapshot
    async fn fetch_account(&self, credential: &Credential) -> Result<AccountSnapshot>;

    /// Fetch every operation since `from`, up to `till` when given
    ///
    /// # Arguments
    /// * `from` - Start of the history window (inclusive)
    /// * `till` - End of the window; open-ended when `None`
    async fn fetch_transactions(
        &self,
        credential: &Credential,
        from: DateTime<Utc>,
        till: Option<DateTime<Utc>>,
    ) -> Result<Vec<TransactionRecord>>;
}

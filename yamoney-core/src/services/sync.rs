//! Sync service - pull the account snapshot and operation history

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, info_span, Instrument};

use crate::domain::result::{Error, Result};
use crate::domain::{AccountSnapshot, Credential, TransactionRecord};
use crate::ports::DataAggregationProvider;

/// Sync service: login, then account, then history
///
/// Nothing is retried; the first failure is returned as-is.
pub struct SyncService {
    provider: Arc<dyn DataAggregationProvider>,
}

impl SyncService {
    pub fn new(provider: Arc<dyn DataAggregationProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Log in through the host and sync the given window
    pub async fn sync(&self, from: DateTime<Utc>, till: Option<DateTime<Utc>>) -> Result<SyncResult> {
        let credential = self.provider.login().await?;
        self.sync_with_credential(&credential, from, till).await
    }

    /// Sync with a credential obtained earlier
    pub async fn sync_with_credential(
        &self,
        credential: &Credential,
        from: DateTime<Utc>,
        till: Option<DateTime<Utc>>,
    ) -> Result<SyncResult> {
        let span = info_span!("sync", provider = self.provider.name());

        async {
            let account = self.provider.fetch_account(credential).await?;
            let transactions = self
                .provider
                .fetch_transactions(credential, from, till)
                .await?;

            let transaction_stats = TransactionStats::from_records(&transactions);
            info!(
                discovered = transaction_stats.discovered,
                "sync complete"
            );

            Ok::<_, Error>(SyncResult {
                provider: self.provider.name().to_string(),
                start_date: from.to_rfc3339(),
                end_date: till.map(|t| t.to_rfc3339()),
                account,
                transactions,
                transaction_stats,
            })
        }
        .instrument(span)
        .await
    }
}

#[derive(Debug, Serialize)]
pub struct SyncResult {
    pub provider: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub account: AccountSnapshot,
    pub transactions: Vec<TransactionRecord>,
    pub transaction_stats: TransactionStats,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct TransactionStats {
    pub discovered: usize,
    pub inflow: Decimal,
    pub outflow: Decimal,
}

impl TransactionStats {
    /// Totals by direction; operations without an amount only count as discovered
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut stats = Self {
            discovered: records.len(),
            ..Self::default()
        };
        for amount in records.iter().filter_map(TransactionRecord::signed_amount) {
            if amount.is_sign_negative() {
                stats.outflow += amount.abs();
            } else {
                stats.inflow += amount;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubProvider {
        logins: AtomicUsize,
        reject_token: bool,
    }

    #[async_trait]
    impl DataAggregationProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn login(&self) -> Result<Credential> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            Ok(Credential::new("fresh"))
        }

        async fn fetch_account(&self, _credential: &Credential) -> Result<AccountSnapshot> {
            if self.reject_token {
                return Err(Error::unauthorized());
            }
            AccountSnapshot::from_json(json!({ "account": "41001", "balance": "12.50" }))
        }

        async fn fetch_transactions(
            &self,
            _credential: &Credential,
            _from: DateTime<Utc>,
            _till: Option<DateTime<Utc>>,
        ) -> Result<Vec<TransactionRecord>> {
            [
                json!({ "operation_id": "1", "direction": "in", "amount": 100 }),
                json!({ "operation_id": "2", "direction": "out", "amount": "30.25" }),
                json!({ "operation_id": "3", "direction": "out" }),
            ]
            .into_iter()
            .map(TransactionRecord::from_json)
            .collect()
        }
    }

    fn from() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_sync_logs_in_first() {
        let provider = Arc::new(StubProvider::default());
        let service = SyncService::new(provider.clone());

        let result = service.sync(from(), None).await.unwrap();

        assert_eq!(provider.logins.load(Ordering::SeqCst), 1);
        assert_eq!(result.provider, "stub");
        assert_eq!(result.account.account(), Some("41001"));
        assert_eq!(result.transactions.len(), 3);
        assert_eq!(
            result.transaction_stats,
            TransactionStats {
                discovered: 3,
                inflow: Decimal::new(100, 0),
                outflow: Decimal::new(3025, 2),
            }
        );
        assert!(result.end_date.is_none());
    }

    #[tokio::test]
    async fn test_sync_with_credential_skips_login() {
        let provider = Arc::new(StubProvider::default());
        let service = SyncService::new(provider.clone());

        let till = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let result = service
            .sync_with_credential(&Credential::new("saved"), from(), Some(till))
            .await
            .unwrap();

        assert_eq!(provider.logins.load(Ordering::SeqCst), 0);
        assert_eq!(result.end_date.as_deref(), Some("2024-03-31T00:00:00+00:00"));
    }

    #[tokio::test]
    async fn test_auth_failure_surfaces_unchanged() {
        let provider = Arc::new(StubProvider {
            reject_token: true,
            ..StubProvider::default()
        });
        let service = SyncService::new(provider);

        let err = service
            .sync_with_credential(&Credential::new("expired"), from(), None)
            .await
            .unwrap_err();
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_sync_result_serializes() {
        let result = SyncResult {
            provider: "stub".to_string(),
            start_date: "2024-03-01T00:00:00+00:00".to_string(),
            end_date: None,
            account: AccountSnapshot::from_json(json!({ "account": "1" })).unwrap(),
            transactions: vec![],
            transaction_stats: TransactionStats::default(),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["account"]["account"], "1");
        assert_eq!(value["transaction_stats"]["discovered"], 0);
        assert!(value.get("end_date").is_none());
    }
}

//! Account info and operation history

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use super::gate::{call_gate, GateRequest};
use crate::config::GateConfig;
use crate::domain::result::{Error, Result};
use crate::domain::{AccountSnapshot, Credential, TransactionRecord};
use crate::ports::HttpTransport;

/// Fetch the account snapshot
pub async fn fetch_account(
    transport: &dyn HttpTransport,
    config: &GateConfig,
    credential: &Credential,
) -> Result<AccountSnapshot> {
    let request = GateRequest::new(config.account_info_url()?).bearer(credential)?;
    let response = call_gate(transport, config, request, true).await?;

    let body = response
        .body
        .ok_or_else(|| Error::protocol("account-info returned an empty body"))?;
    AccountSnapshot::from_json(body)
}

/// Fetch the whole operation history between `from` and `till`.
///
/// Pages are requested until the gate stops sending `next_record`.
/// Operations are returned in the order the pages arrived.
pub async fn fetch_transactions(
    transport: &dyn HttpTransport,
    config: &GateConfig,
    credential: &Credential,
    from: DateTime<Utc>,
    till: Option<DateTime<Utc>>,
) -> Result<Vec<TransactionRecord>> {
    let mut transactions = Vec::new();
    let mut next_record: Option<String> = None;
    let mut page = 0usize;

    loop {
        let mut request = GateRequest::new(config.operation_history_url()?)
            .bearer(credential)?
            .field("from", iso_timestamp(&from));
        if let Some(till) = &till {
            request = request.field("till", iso_timestamp(till));
        }
        if let Some(cursor) = &next_record {
            request = request.field("start_record", cursor.clone());
        }

        let response = call_gate(transport, config, request, true).await?;
        let mut body = response
            .body
            .ok_or_else(|| Error::protocol("operation-history returned an empty body"))?;

        next_record = cursor(body.get("next_record"));
        let operations = match body.get_mut("operations").map(JsonValue::take) {
            Some(JsonValue::Array(operations)) => operations,
            _ => {
                return Err(Error::protocol(
                    "operation-history response has no operations list",
                ))
            }
        };

        page += 1;
        debug!(page, count = operations.len(), "operation history page");

        for operation in operations {
            transactions.push(TransactionRecord::from_json(operation)?);
        }

        if next_record.is_none() {
            break;
        }
    }

    info!(pages = page, operations = transactions.len(), "operation history fetched");
    Ok(transactions)
}

/// Pagination cursor; absent, null, false, 0 and "" all mean the last page
fn cursor(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// ISO-8601 with milliseconds and a `Z` suffix
fn iso_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_transport::MockHttpTransport;
    use chrono::TimeZone;
    use serde_json::json;

    fn config() -> GateConfig {
        GateConfig::new("client", "https://example.com/cb")
    }

    fn from() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_pagination_follows_next_record() {
        let transport = MockHttpTransport::new();
        transport
            .queue_json_response(
                200,
                &json!({ "operations": [{ "operation_id": "t1" }], "next_record": "X" }),
            )
            .queue_json_response(200, &json!({ "operations": [{ "operation_id": "t2" }] }));

        let credential = Credential::new("tok");
        let result = fetch_transactions(&transport, &config(), &credential, from(), None)
            .await
            .unwrap();

        let ids: Vec<_> = result.iter().map(|t| t.operation_id().unwrap()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);

        let requests = transport.get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].form_value("start_record"), None);
        assert_eq!(requests[1].form_value("start_record"), Some("X"));
        for request in &requests {
            assert_eq!(request.url.path(), "/api/operation-history");
            assert_eq!(request.headers.get("authorization").unwrap(), "Bearer tok");
        }
    }

    #[tokio::test]
    async fn test_till_omitted_without_to_date() {
        let transport = MockHttpTransport::new();
        transport.queue_json_response(200, &json!({ "operations": [] }));

        let credential = Credential::new("tok");
        let result = fetch_transactions(&transport, &config(), &credential, from(), None)
            .await
            .unwrap();
        assert!(result.is_empty());

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.form_value("from"), Some("2024-01-01T00:00:00.000Z"));
        assert_eq!(request.form_value("till"), None);
    }

    #[tokio::test]
    async fn test_till_sent_with_to_date() {
        let transport = MockHttpTransport::new();
        transport.queue_json_response(200, &json!({ "operations": [], "next_record": null }));

        let till = Utc.with_ymd_and_hms(2024, 2, 15, 12, 30, 0).unwrap();
        let credential = Credential::new("tok");
        fetch_transactions(&transport, &config(), &credential, from(), Some(till))
            .await
            .unwrap();

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.form_value("till"), Some("2024-02-15T12:30:00.000Z"));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_pages_concatenate_without_dedup() {
        let transport = MockHttpTransport::new();
        transport
            .queue_json_response(
                200,
                &json!({ "operations": [{ "operation_id": "a" }, { "operation_id": "b" }], "next_record": 2 }),
            )
            .queue_json_response(
                200,
                &json!({ "operations": [{ "operation_id": "b" }], "next_record": "" }),
            );

        let credential = Credential::new("tok");
        let result = fetch_transactions(&transport, &config(), &credential, from(), None)
            .await
            .unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(
            transport.get_last_request().unwrap().form_value("start_record"),
            Some("2")
        );
    }

    #[tokio::test]
    async fn test_history_unauthorized() {
        let transport = MockHttpTransport::new();
        transport.queue_empty_response(401);

        let credential = Credential::new("expired");
        let err = fetch_transactions(&transport, &config(), &credential, from(), None)
            .await
            .unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_history_without_operations() {
        let transport = MockHttpTransport::new();
        transport.queue_json_response(200, &json!({ "error": "illegal_param_from" }));

        let credential = Credential::new("tok");
        let err = fetch_transactions(&transport, &config(), &credential, from(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn test_fetch_account() {
        let transport = MockHttpTransport::new();
        transport.queue_json_response(
            200,
            &json!({ "account": "4100175017397", "balance": 100.5, "currency": "643" }),
        );

        let credential = Credential::new("tok");
        let account = fetch_account(&transport, &config(), &credential).await.unwrap();
        assert_eq!(account.account(), Some("4100175017397"));

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.url.path(), "/api/account-info");
        assert_eq!(request.headers.get("authorization").unwrap(), "Bearer tok");
        assert!(request.form.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_account_unauthorized() {
        let transport = MockHttpTransport::new();
        transport.queue_json_response(401, &json!({}));

        let credential = Credential::new("expired");
        let err = fetch_account(&transport, &config(), &credential).await.unwrap_err();
        assert!(crate::domain::result::is_auth_error(Some(&err)));
    }

    #[test]
    fn test_cursor_values() {
        assert_eq!(cursor(None), None);
        assert_eq!(cursor(Some(&json!(null))), None);
        assert_eq!(cursor(Some(&json!(false))), None);
        assert_eq!(cursor(Some(&json!(""))), None);
        assert_eq!(cursor(Some(&json!("30"))), Some("30".to_string()));
        assert_eq!(cursor(Some(&json!(30))), Some("30".to_string()));
    }
}

//! Operation history record
//!
//! One element of the gate's `operations` array, kept verbatim.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::account::json_decimal;
use super::result::{Error, Result};

/// A single operation from the history endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(Map<String, JsonValue>);

impl TransactionRecord {
    pub fn new(fields: Map<String, JsonValue>) -> Self {
        Self(fields)
    }

    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(fields) => Ok(Self(fields)),
            other => Err(Error::protocol(format!(
                "operation is not an object: {}",
                other
            ))),
        }
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.0.get("operation_id").and_then(JsonValue::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(JsonValue::as_str)
    }

    /// "in" for incoming, "out" for outgoing operations
    pub fn direction(&self) -> Option<&str> {
        self.0.get("direction").and_then(JsonValue::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(JsonValue::as_str)
    }

    /// Unsigned amount as reported by the gate
    pub fn amount(&self) -> Option<Decimal> {
        self.0.get("amount").and_then(json_decimal)
    }

    /// Amount with outgoing operations negated
    pub fn signed_amount(&self) -> Option<Decimal> {
        let amount = self.amount()?;
        match self.direction() {
            Some("out") => Some(-amount.abs()),
            _ => Some(amount),
        }
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.0
            .get("datetime")
            .and_then(JsonValue::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.0
    }

    pub fn into_json(self) -> JsonValue {
        JsonValue::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_outgoing_operation() {
        let tx = TransactionRecord::from_json(json!({
            "operation_id": "1234567",
            "status": "success",
            "datetime": "2019-03-10T12:32:20.000+03:00",
            "title": "Оплата услуг МТС",
            "direction": "out",
            "amount": 150.5,
            "type": "payment-shop"
        }))
        .unwrap();

        assert_eq!(tx.operation_id(), Some("1234567"));
        assert_eq!(tx.title(), Some("Оплата услуг МТС"));
        assert_eq!(tx.amount(), Some(Decimal::new(1505, 1)));
        assert_eq!(tx.signed_amount(), Some(Decimal::new(-1505, 1)));
        assert_eq!(
            tx.datetime(),
            Some(Utc.with_ymd_and_hms(2019, 3, 10, 9, 32, 20).unwrap())
        );
    }

    #[test]
    fn test_incoming_operation_keeps_sign() {
        let tx = TransactionRecord::from_json(json!({
            "direction": "in",
            "amount": "1000.00"
        }))
        .unwrap();
        assert_eq!(tx.signed_amount(), Some(Decimal::new(100000, 2)));
    }

    #[test]
    fn test_missing_fields() {
        let tx = TransactionRecord::from_json(json!({})).unwrap();
        assert_eq!(tx.amount(), None);
        assert_eq!(tx.signed_amount(), None);
        assert_eq!(tx.datetime(), None);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(TransactionRecord::from_json(json!("op")).is_err());
    }
}

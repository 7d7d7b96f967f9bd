//! Account snapshot domain model
//!
//! The gate's account-info response is kept exactly as returned. Accessors
//! only read well-known fields; nothing is validated or normalized in place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::result::{Error, Result};

/// Account-info response body, as returned by the gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountSnapshot(Map<String, JsonValue>);

impl AccountSnapshot {
    pub fn new(fields: Map<String, JsonValue>) -> Self {
        Self(fields)
    }

    /// Wrap a parsed response body; anything but a JSON object is rejected.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(fields) => Ok(Self(fields)),
            other => Err(Error::protocol(format!(
                "account-info body is not an object: {}",
                other
            ))),
        }
    }

    /// Wallet number
    pub fn account(&self) -> Option<&str> {
        self.0.get("account").and_then(JsonValue::as_str)
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.0.get("balance").and_then(json_decimal)
    }

    /// ISO 4217 numeric code as sent by the gate (e.g. "643")
    pub fn currency(&self) -> Option<&str> {
        self.0.get("currency").and_then(JsonValue::as_str)
    }

    /// Alphabetic currency code, falling back to the raw value for unknown codes
    pub fn currency_code(&self) -> Option<String> {
        self.currency().map(currency_code)
    }

    pub fn account_type(&self) -> Option<&str> {
        self.0.get("account_type").and_then(JsonValue::as_str)
    }

    pub fn account_status(&self) -> Option<&str> {
        self.0.get("account_status").and_then(JsonValue::as_str)
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

/// Map the numeric currency codes the gate uses to their alphabetic form
pub fn currency_code(numeric: &str) -> String {
    match numeric.trim() {
        "643" => "RUB".to_string(),
        "840" => "USD".to_string(),
        "978" => "EUR".to_string(),
        other => other.to_uppercase(),
    }
}

/// Read an amount that may arrive as a JSON number or a string
pub(crate) fn json_decimal(value: &JsonValue) -> Option<Decimal> {
    match value {
        JsonValue::Number(n) => n.to_string().parse::<Decimal>().ok(),
        JsonValue::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

//! HTTP transport port
//!
//! The gate caller builds requests and interprets responses; moving bytes
//! over the network is left to an implementation of [`HttpTransport`].

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value as JsonValue;
use url::Url;

use crate::domain::result::Result;

/// Outgoing request with a form-encoded body
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Form fields, in the order they are encoded
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    /// Look up a form field by name
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Encode the form fields as `application/x-www-form-urlencoded`
    pub fn encoded_form(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.form.iter())
            .finish()
    }
}

/// Parsed gate response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Parsed JSON body; `None` when the body was empty
    pub body: Option<JsonValue>,
}

/// HTTP transport interface (for dependency injection)
///
/// Implementations parse the response body as JSON. Network and parse
/// failures are returned as-is; status codes are never turned into errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

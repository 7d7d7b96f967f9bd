//! reqwest-based HTTP transport
//!
//! Sends form-encoded requests and parses JSON responses. Errors from the
//! network or the JSON parser are returned untouched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::domain::result::Result;
use crate::ports::{HttpRequest, HttpResponse, HttpTransport};

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Production HTTP transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let body = request.encoded_form();

        let response = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str::<JsonValue>(&text)?)
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

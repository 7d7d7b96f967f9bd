//! Gate caller
//!
//! Every request to the Yandex.Money API goes through [`call_gate`]: it adds
//! the default headers, form-encodes the body, logs the exchange with
//! credentials masked and turns a 401 into the temporary authorization error.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, HOST};
use reqwest::Method;
use tracing::{debug, warn};
use url::Url;

use crate::config::GateConfig;
use crate::domain::result::{Error, Result};
use crate::domain::Credential;
use crate::ports::{HttpRequest, HttpResponse, HttpTransport};
use crate::services::logging::LogRedaction;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A single gate call before defaults are applied
#[derive(Debug, Clone)]
pub struct GateRequest {
    pub url: Url,
    pub headers: HeaderMap,
    pub form: Vec<(String, String)>,
    pub redaction: LogRedaction,
}

impl GateRequest {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: HeaderMap::new(),
            form: Vec::new(),
            redaction: LogRedaction::default(),
        }
    }

    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }

    /// Authenticate with the credential's bearer token
    pub fn bearer(self, credential: &Credential) -> Result<Self> {
        let mut request = self.header(AUTHORIZATION, &credential.bearer())?;
        if let Some(value) = request.headers.get_mut(AUTHORIZATION) {
            value.set_sensitive(true);
        }
        Ok(request)
    }

    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.form.push((name.to_string(), value.into()));
        self
    }

    pub fn redaction(mut self, redaction: LogRedaction) -> Self {
        self.redaction = redaction;
        self
    }
}

/// Default headers with the caller's headers merged over them
pub fn merge_headers(config: &GateConfig, headers: &HeaderMap) -> Result<HeaderMap> {
    let mut merged = HeaderMap::new();
    merged.insert(HOST, HeaderValue::from_str(&config.host())?);
    merged.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

    for name in headers.keys() {
        merged.remove(name);
        for value in headers.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    Ok(merged)
}

/// Send a request to the gate.
///
/// With `handle_unauthorized` set, a 401 fails with the temporary
/// authorization error. Every other response, whatever its status, is
/// returned unchanged.
pub async fn call_gate(
    transport: &dyn HttpTransport,
    config: &GateConfig,
    request: GateRequest,
    handle_unauthorized: bool,
) -> Result<HttpResponse> {
    let GateRequest {
        url,
        headers,
        form,
        redaction,
    } = request;

    let http_request = HttpRequest {
        method: Method::POST,
        url,
        headers: merge_headers(config, &headers)?,
        form,
    };

    debug!(
        method = %http_request.method,
        url = %http_request.url,
        headers = ?redaction.request_headers(&http_request.headers),
        body = %redaction.request_form(&http_request.form),
        "gate request"
    );

    let url = http_request.url.clone();
    let response = transport.send(http_request).await?;

    debug!(
        url = %url,
        status = response.status,
        headers = ?redaction.response_headers(&response.headers),
        body = %redaction.response_body(response.body.as_ref()),
        "gate response"
    );

    if handle_unauthorized && response.status == 401 {
        warn!(url = %url, "gate rejected the access token");
        return Err(Error::unauthorized());
    }

    Ok(response)
}

//! Interactive OAuth login
//!
//! The authorization page is opened in the host's web view. Navigations are
//! watched until the browser reaches the configured redirect URI, then the
//! captured code is exchanged for an access token.
//!
//! Stages: `AwaitingRedirect -> CodeOrErrorCaptured -> TokenExchanged | Failed`.

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};
use url::Url;

use super::gate::{call_gate, GateRequest};
use crate::config::GateConfig;
use crate::domain::result::{Error, Result, LOGIN_FAILED_MESSAGE};
use crate::domain::Credential;
use crate::ports::{Host, HttpTransport, NavigationInterceptor, RedirectOutcome};
use crate::services::logging::LogRedaction;

/// Permissions requested from the user
pub const SCOPE: &str = "operation-history account-info";

/// Where the login flow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    AwaitingRedirect,
    CodeOrErrorCaptured,
    TokenExchanged,
    Failed,
}

fn transition(stage: &mut LoginStage, next: LoginStage) {
    debug!(from = ?*stage, to = ?next, "login stage");
    *stage = next;
}

/// Authorization page URL for the configured client
pub fn authorization_url(config: &GateConfig) -> Result<Url> {
    let mut url = config.authorize_url()?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("scope", SCOPE)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code");
    Ok(url)
}

fn strip_protocol(uri: &str) -> &str {
    for scheme in ["https://", "http://"] {
        let matches = uri
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme));
        if matches {
            return &uri[scheme.len()..];
        }
    }
    uri
}

/// Inspect one navigation of the web view.
///
/// Returns `None` until the navigated URL contains the redirect URI (the
/// scheme is ignored on both sides). Once it does, the query string after
/// the redirect URI decides the outcome: a non-empty `code` wins, otherwise
/// all parameters are handed back as the error.
pub fn intercept_redirect(redirect_uri: &str, navigated: &str) -> Option<RedirectOutcome> {
    let target = strip_protocol(redirect_uri);
    let start = navigated.find(target)?;

    let query = navigated.get(start + target.len() + 1..).unwrap_or("");
    let query = query.split('#').next().unwrap_or("");

    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }

    match params.get("code").filter(|code| !code.is_empty()) {
        Some(code) => Some(RedirectOutcome::Code(code.clone())),
        None => Some(RedirectOutcome::Error(params)),
    }
}

/// Turn the web view's outcome into an authorization code.
///
/// A missing error or `access_denied` means the user backed out and may try
/// again. Any other OAuth error is reported as a hard failure.
pub fn authorization_code(outcome: RedirectOutcome) -> Result<String> {
    let params = match outcome {
        RedirectOutcome::Code(code) => return Ok(code),
        RedirectOutcome::Error(params) => params,
    };

    match params.get("error").map(String::as_str).filter(|e| !e.is_empty()) {
        None | Some("access_denied") => Err(Error::temporary(LOGIN_FAILED_MESSAGE)),
        Some(error) => Err(Error::Authorization {
            error: error.to_string(),
            description: params.get("error_description").cloned(),
        }),
    }
}

/// Run the interactive login and exchange the code for an access token
pub async fn login(
    transport: &dyn HttpTransport,
    config: &GateConfig,
    host: &Host,
) -> Result<Credential> {
    let web_view = host.web_view().ok_or(Error::IncompatibleHost)?;

    let mut stage = LoginStage::AwaitingRedirect;
    let url = authorization_url(config)?;
    info!("opening authorization page");

    let redirect_uri = config.redirect_uri.clone();
    let interceptor: NavigationInterceptor =
        Box::new(move |navigated: &str| intercept_redirect(&redirect_uri, navigated));
    let outcome = web_view.open(url.as_str(), interceptor).await;

    let code = match outcome.and_then(authorization_code) {
        Ok(code) => {
            transition(&mut stage, LoginStage::CodeOrErrorCaptured);
            code
        }
        Err(e) => {
            transition(&mut stage, LoginStage::Failed);
            warn!(error = %e, "authorization was not granted");
            return Err(e);
        }
    };

    match exchange_code(transport, config, &code).await {
        Ok(credential) => {
            transition(&mut stage, LoginStage::TokenExchanged);
            info!("access token obtained");
            Ok(credential)
        }
        Err(e) => {
            transition(&mut stage, LoginStage::Failed);
            warn!(error = %e, "token exchange failed");
            Err(e)
        }
    }
}

async fn exchange_code(
    transport: &dyn HttpTransport,
    config: &GateConfig,
    code: &str,
) -> Result<Credential> {
    let request = GateRequest::new(config.token_url()?)
        .field("client_id", &config.client_id)
        .field("grant_type", "authorization_code")
        .field("redirect_uri", &config.redirect_uri)
        .field("code", code)
        .redaction(
            LogRedaction::default()
                .redact_request_body()
                .redact_response_fields(&["access_token"]),
        );

    // A 401 here is a failed exchange, not an expired session
    let response = call_gate(transport, config, request, false).await?;

    response
        .body
        .as_ref()
        .and_then(|body| body.get("access_token"))
        .and_then(JsonValue::as_str)
        .filter(|token| !token.is_empty())
        .map(Credential::new)
        .ok_or_else(|| Error::temporary(LOGIN_FAILED_MESSAGE))
}

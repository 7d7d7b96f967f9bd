//! Logging - tracing setup and privacy-safe request dumps
//!
//! Gate requests and responses are logged at `debug` level. Credentials
//! never reach the log: `Authorization` and `Set-Cookie` are always masked,
//! and each call can mask more (whole bodies or single response fields).

use reqwest::header::{HeaderMap, HeaderName, AUTHORIZATION, SET_COOKIE};
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

/// Placeholder written instead of a masked value
pub const REDACTED: &str = "<redacted>";

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 = warn, 1 = info, 2 = debug, 3+ = trace). Calling this twice is a no-op.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},reqwest=warn,hyper=warn", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .try_init();
}

/// How much of a body may be logged
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BodyRedaction {
    /// Log the body as-is
    #[default]
    Keep,
    /// Replace the whole body
    All,
    /// Mask the named top-level fields
    Fields(Vec<String>),
}

/// Per-call log sanitization policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRedaction {
    pub request_headers: Vec<HeaderName>,
    pub request_body: BodyRedaction,
    pub response_headers: Vec<HeaderName>,
    pub response_body: BodyRedaction,
}

impl Default for LogRedaction {
    fn default() -> Self {
        Self {
            request_headers: vec![AUTHORIZATION],
            request_body: BodyRedaction::Keep,
            response_headers: vec![SET_COOKIE],
            response_body: BodyRedaction::Keep,
        }
    }
}

impl LogRedaction {
    /// Mask the whole request body
    pub fn redact_request_body(mut self) -> Self {
        self.request_body = BodyRedaction::All;
        self
    }

    /// Mask the given top-level fields of the response body
    pub fn redact_response_fields(mut self, fields: &[&str]) -> Self {
        self.response_body = BodyRedaction::Fields(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn request_headers(&self, headers: &HeaderMap) -> Vec<(String, String)> {
        redact_headers(headers, &self.request_headers)
    }

    pub fn response_headers(&self, headers: &HeaderMap) -> Vec<(String, String)> {
        redact_headers(headers, &self.response_headers)
    }

    pub fn request_form(&self, form: &[(String, String)]) -> JsonValue {
        redact_form(form, &self.request_body)
    }

    pub fn response_body(&self, body: Option<&JsonValue>) -> JsonValue {
        match body {
            Some(body) => redact_json(body, &self.response_body),
            None => JsonValue::Null,
        }
    }
}

/// Render headers for logging, masking the listed names
pub fn redact_headers(headers: &HeaderMap, masked: &[HeaderName]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if masked.contains(name) {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

/// Render a form body for logging
pub fn redact_form(form: &[(String, String)], policy: &BodyRedaction) -> JsonValue {
    match policy {
        BodyRedaction::All => JsonValue::String(REDACTED.to_string()),
        BodyRedaction::Keep => form_to_json(form, &[]),
        BodyRedaction::Fields(fields) => form_to_json(form, fields),
    }
}

fn form_to_json(form: &[(String, String)], masked: &[String]) -> JsonValue {
    let map = form
        .iter()
        .map(|(key, value)| {
            let shown = if masked.iter().any(|m| m == key) {
                REDACTED.to_string()
            } else {
                value.clone()
            };
            (key.clone(), JsonValue::String(shown))
        })
        .collect();
    JsonValue::Object(map)
}

/// Render a JSON body for logging
pub fn redact_json(body: &JsonValue, policy: &BodyRedaction) -> JsonValue {
    match (policy, body) {
        (BodyRedaction::Keep, _) => body.clone(),
        (BodyRedaction::All, _) => JsonValue::String(REDACTED.to_string()),
        (BodyRedaction::Fields(fields), JsonValue::Object(map)) => {
            let mut masked = map.clone();
            for field in fields {
                if let Some(value) = masked.get_mut(field) {
                    *value = JsonValue::String(REDACTED.to_string());
                }
            }
            JsonValue::Object(masked)
        }
        (BodyRedaction::Fields(_), other) => other.clone(),
    }
}

/// In-memory log sink for asserting on what reaches the log
#[cfg(test)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        /// Debug-level subscriber writing into this buffer
        pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .with_writer(self.clone())
                .finish()
        }

        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}

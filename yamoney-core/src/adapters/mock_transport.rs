//! Scripted HTTP transport for testing
//!
//! Responses are served in the order they were queued; every request is
//! recorded so tests can assert on what was sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::ports::{HttpRequest, HttpResponse, HttpTransport};

/// Mock HTTP transport
#[derive(Default)]
pub struct MockHttpTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    request_history: Mutex<Vec<HttpRequest>>,
}

impl MockHttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to return
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
        self
    }

    /// Queue a JSON response
    pub fn queue_json_response<T: Serialize>(&self, status: u16, body: &T) -> &Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.queue_response(HttpResponse {
            status,
            headers,
            body: serde_json::to_value(body).ok(),
        })
    }

    /// Queue a response with an empty body
    pub fn queue_empty_response(&self, status: u16) -> &Self {
        self.queue_response(HttpResponse {
            status,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// Requests sent so far, oldest first
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        self.request_history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn get_last_request(&self) -> Option<HttpRequest> {
        self.get_requests().pop()
    }

    pub fn request_count(&self) -> usize {
        self.request_history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.request_history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| Error::Transport("no mock response available".to_string()))
    }
}

//! Channel-driven web view
//!
//! A [`WebView`] for hosts that observe browser navigations somewhere else
//! (an embedded browser widget, a callback listener, a test) and push each
//! navigated URL through a [`NavigationFeed`]. Dropping every feed handle
//! means the user closed the view. A view can be opened again after a
//! session resolves; whatever was still queued from the old session is
//! discarded.

use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::domain::result::Result;
use crate::ports::{NavigationInterceptor, RedirectOutcome, WebView};

/// Sending half: report navigations of the host's browser
#[derive(Debug, Clone)]
pub struct NavigationFeed {
    tx: mpsc::UnboundedSender<String>,
}

impl NavigationFeed {
    /// Report a navigation. Returns false once the view has gone away.
    pub fn navigate(&self, url: impl Into<String>) -> bool {
        self.tx.send(url.into()).is_ok()
    }

    /// Close the view from the user's side
    pub fn close(self) {}
}

/// Web view whose navigations arrive over a channel
#[derive(Debug)]
pub struct ChannelWebView {
    navigations: Mutex<mpsc::UnboundedReceiver<String>>,
    opened: StdMutex<Vec<String>>,
}

impl ChannelWebView {
    pub fn new() -> (Self, NavigationFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        let view = Self {
            navigations: Mutex::new(rx),
            opened: StdMutex::new(Vec::new()),
        };
        (view, NavigationFeed { tx })
    }

    /// URLs the view has been opened at, oldest first
    pub fn opened_urls(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl WebView for ChannelWebView {
    async fn open(
        &self,
        url: &str,
        mut interceptor: NavigationInterceptor,
    ) -> Result<RedirectOutcome> {
        // One interactive session at a time
        let mut navigations = self.navigations.lock().await;

        self.opened
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());

        while let Some(navigated) = navigations.recv().await {
            if let Some(outcome) = interceptor(&navigated) {
                // Navigations queued after the redirect belong to this session
                let mut stale = 0usize;
                while navigations.try_recv().is_ok() {
                    stale += 1;
                }
                if stale > 0 {
                    debug!(stale, "dropped navigations left over from the session");
                }
                return Ok(outcome);
            }
            debug!("navigation did not reach the redirect URI");
        }

        debug!("web view closed before the redirect");
        Ok(RedirectOutcome::closed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_matching_navigation_wins() {
        let (view, feed) = ChannelWebView::new();
        feed.navigate("https://money.yandex.ru/login");
        feed.navigate("https://example.com/cb?code=first");
        feed.navigate("https://example.com/cb?code=second");

        let interceptor: NavigationInterceptor = Box::new(|url: &str| {
            url.strip_prefix("https://example.com/cb?code=")
                .map(|code| RedirectOutcome::Code(code.to_string()))
        });
        let outcome = view.open("https://auth", interceptor).await.unwrap();

        assert_eq!(outcome, RedirectOutcome::Code("first".to_string()));
        assert_eq!(view.opened_urls(), vec!["https://auth".to_string()]);
    }

    #[tokio::test]
    async fn test_closed_view_reports_empty_error() {
        let (view, feed) = ChannelWebView::new();
        feed.navigate("https://money.yandex.ru/login");
        feed.close();

        let interceptor: NavigationInterceptor = Box::new(|_: &str| None);
        let outcome = view.open("https://auth", interceptor).await.unwrap();
        assert_eq!(outcome, RedirectOutcome::closed());
    }

    #[tokio::test]
    async fn test_reopened_view_ignores_previous_session() {
        let (view, feed) = ChannelWebView::new();
        feed.navigate("https://example.com/cb?code=first");
        feed.navigate("https://example.com/cb?code=stale");

        let code_of = || -> NavigationInterceptor {
            Box::new(|url: &str| {
                url.strip_prefix("https://example.com/cb?code=")
                    .map(|code| RedirectOutcome::Code(code.to_string()))
            })
        };

        let outcome = view.open("https://auth/1", code_of()).await.unwrap();
        assert_eq!(outcome, RedirectOutcome::Code("first".to_string()));

        feed.navigate("https://example.com/cb?code=second");
        let outcome = view.open("https://auth/2", code_of()).await.unwrap();
        assert_eq!(outcome, RedirectOutcome::Code("second".to_string()));
        assert_eq!(view.opened_urls().len(), 2);
    }
}

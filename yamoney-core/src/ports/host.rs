//! Host capability port
//!
//! The login flow needs an interactive view (an embedded browser) that it
//! can point at the authorization page and whose navigations it can watch.
//! Hosts that cannot provide one expose no [`WebView`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::result::Result;

/// Query parameters of the redirect when no code was granted
pub type RedirectParams = HashMap<String, String>;

/// Terminal result of an interactive authorization session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The redirect URI was reached with an authorization code
    Code(String),
    /// The redirect carried no code, or the view was closed (empty params)
    Error(RedirectParams),
}

impl RedirectOutcome {
    /// Outcome reported when the user closes the view before the redirect
    pub fn closed() -> Self {
        Self::Error(RedirectParams::new())
    }
}

/// Called with every URL the view navigates to.
///
/// Returning `Some` ends the session with that outcome; `None` lets the
/// navigation continue.
pub type NavigationInterceptor = Box<dyn FnMut(&str) -> Option<RedirectOutcome> + Send>;

/// Interactive web view provided by the host
#[async_trait]
pub trait WebView: Send + Sync {
    /// Open the view at `url` and resolve once the interceptor yields an
    /// outcome or the user closes the view.
    async fn open(&self, url: &str, interceptor: NavigationInterceptor) -> Result<RedirectOutcome>;
}

/// Capabilities of the application hosting the integration
#[derive(Clone, Default)]
pub struct Host {
    web_view: Option<Arc<dyn WebView>>,
}

impl Host {
    /// A host without any interactive capability
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_web_view(mut self, web_view: Arc<dyn WebView>) -> Self {
        self.web_view = Some(web_view);
        self
    }

    pub fn web_view(&self) -> Option<&Arc<dyn WebView>> {
        self.web_view.as_ref()
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("web_view", &self.web_view.is_some())
            .finish()
    }
}

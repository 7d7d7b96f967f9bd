//! Terminal stand-in for the host web view
//!
//! The authorization page is opened in the user's own browser; the user
//! pastes back the address the browser ended up on after consenting.

use async_trait::async_trait;
use colored::Colorize;
use dialoguer::Input;
use yamoney_core::domain::result::{Error, Result};
use yamoney_core::ports::{NavigationInterceptor, RedirectOutcome, WebView};

use crate::output;

#[derive(Debug, Default)]
pub struct PromptWebView;

impl PromptWebView {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WebView for PromptWebView {
    async fn open(
        &self,
        url: &str,
        mut interceptor: NavigationInterceptor,
    ) -> Result<RedirectOutcome> {
        eprintln!("Open this address in your browser and allow access:");
        eprintln!();
        eprintln!("  {}", url.bold());
        eprintln!();

        loop {
            let answer = tokio::task::spawn_blocking(|| {
                Input::<String>::new()
                    .with_prompt("Address after the redirect (empty to cancel)")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
            })
            .await
            .map_err(|e| Error::Transport(format!("prompt task failed: {}", e)))??;

            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(RedirectOutcome::closed());
            }
            if let Some(outcome) = interceptor(answer) {
                return Ok(outcome);
            }
            output::warning("That is not the registered redirect address, try again.");
        }
    }
}

//! CLI command implementations

pub mod account;
pub mod login;
pub mod setup;
pub mod sync;
pub mod transactions;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use yamoney_core::adapters::reqwest_transport::ReqwestTransport;
use yamoney_core::ports::Host;
use yamoney_core::{Credential, YamoneyContext};

use crate::output;
use crate::web_view::PromptWebView;

/// Default history window when `--from` is omitted
const DEFAULT_HISTORY_DAYS: i64 = 90;

/// Get the application directory from environment or default
pub fn get_app_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("YAMONEY_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".yamoney"))
        .context("Could not find home directory, set YAMONEY_DIR")
}

/// Get the Yandex.Money context
pub fn get_context() -> Result<YamoneyContext> {
    let app_dir = get_app_dir()?;

    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create yamoney directory: {:?}", app_dir))?;

    let transport = ReqwestTransport::new().context("Failed to build HTTP client")?;
    debug!(app_dir = %app_dir.display(), "loading yamoney context");
    YamoneyContext::new(&app_dir, host(), Arc::new(transport))
}

/// The interactive view is only offered on a terminal
fn host() -> Host {
    if atty::is(atty::Stream::Stdin) {
        Host::new().with_web_view(Arc::new(PromptWebView::new()))
    } else {
        Host::new()
    }
}

/// Use the given token, or sign in when there is none
pub async fn credential(ctx: &YamoneyContext, token: Option<String>) -> Result<Credential> {
    match token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => Ok(Credential::new(token)),
        None => {
            output::info("No access token given, signing in first.");
            Ok(ctx.client.login().await?)
        }
    }
}

/// History window from CLI dates; `to` covers its whole day
pub fn date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(DateTime<Utc>, Option<DateTime<Utc>>)> {
    let from = match from {
        Some(day) => day.and_time(chrono::NaiveTime::MIN).and_utc(),
        None => Utc::now() - Duration::days(DEFAULT_HISTORY_DAYS),
    };
    let till = match to {
        Some(day) => Some(
            day.succ_opt()
                .context("--to is out of range")?
                .and_time(chrono::NaiveTime::MIN)
                .and_utc(),
        ),
        None => None,
    };

    if let Some(till) = till {
        if till <= from {
            anyhow::bail!("--to must not be earlier than --from");
        }
    }
    Ok((from, till))
}

/// Spinner shown while waiting on the gate
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(StdDuration::from_millis(100));
    bar
}

/// True when the error chain holds a rejected access token
pub fn is_auth_failure(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<yamoney_core::Error>())
        .any(|cause| cause.is_auth_error())
}

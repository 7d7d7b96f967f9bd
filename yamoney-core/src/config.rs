//! Configuration management
//!
//! Settings live in `settings.json` inside the application directory:
//! ```json
//! {
//!   "yandexMoney": {
//!     "clientId": "...",
//!     "redirectUri": "https://example.com/yandex-money/callback",
//!     "baseUrl": "https://money.yandex.ru"
//!   }
//! }
//! ```
//! Keys the application does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::result::{Error, Result as DomainResult};

/// Default production gate
pub const DEFAULT_BASE_URL: &str = "https://money.yandex.ru";

/// Environment variable overriding the OAuth client id
pub const CLIENT_ID_ENV: &str = "YAMONEY_CLIENT_ID";
/// Environment variable overriding the OAuth redirect URI
pub const REDIRECT_URI_ENV: &str = "YAMONEY_REDIRECT_URI";
/// Environment variable overriding the gate base URL (staging or mock servers)
pub const BASE_URL_ENV: &str = "YAMONEY_BASE_URL";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    yandex_money: YandexMoneySettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YandexMoneySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Application configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub base_url: Option<String>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the application directory
    ///
    /// Values from `YAMONEY_CLIENT_ID`, `YAMONEY_REDIRECT_URI` and
    /// `YAMONEY_BASE_URL` take precedence over the settings file.
    pub fn load(app_dir: &Path) -> Result<Self> {
        let mut config = Self::load_file(app_dir)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from settings.json only
    pub fn load_file(app_dir: &Path) -> Result<Self> {
        let settings_path = app_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        Ok(Self {
            client_id: raw.yandex_money.client_id.clone(),
            redirect_uri: raw.yandex_money.redirect_uri.clone(),
            base_url: raw.yandex_money.base_url.clone(),
            _raw_settings: raw,
        })
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(client_id) = non_empty(CLIENT_ID_ENV) {
            self.client_id = Some(client_id);
        }
        if let Some(redirect_uri) = non_empty(REDIRECT_URI_ENV) {
            self.redirect_uri = Some(redirect_uri);
        }
        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            self.base_url = Some(base_url);
        }
    }

    /// Save config to the application directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        let settings_path = app_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self._raw_settings.clone()
        };

        settings.yandex_money.client_id = self.client_id.clone();
        settings.yandex_money.redirect_uri = self.redirect_uri.clone();
        settings.yandex_money.base_url = self.base_url.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Validate and freeze the gate configuration
    pub fn gate_config(&self) -> DomainResult<GateConfig> {
        let client_id = required(&self.client_id, "clientId")?;
        let redirect_uri = required(&self.redirect_uri, "redirectUri")?;

        let mut gate = GateConfig::new(client_id, redirect_uri);
        if let Some(base_url) = self.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            gate = gate.with_base_url(base_url)?;
        }
        Ok(gate)
    }
}

fn required(value: &Option<String>, name: &str) -> DomainResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::config(format!("yandexMoney.{} is not set", name)))
}

/// Immutable gate configuration injected into the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub client_id: String,
    pub redirect_uri: String,
    base_url: Url,
}

impl GateConfig {
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        }
    }

    /// Point the client at another gate (staging or a local mock server)
    pub fn with_base_url(mut self, base_url: &str) -> DomainResult<Self> {
        let url = Url::parse(base_url.trim_end_matches('/'))?;
        if url.host_str().is_none() {
            return Err(Error::config(format!("base URL has no host: {}", base_url)));
        }
        self.base_url = url;
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Value for the `Host` header: the base URL's authority
    pub fn host(&self) -> String {
        let host = self.base_url.host_str().unwrap_or_default();
        match self.base_url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    pub fn authorize_url(&self) -> DomainResult<Url> {
        self.endpoint("oauth/authorize")
    }

    pub fn token_url(&self) -> DomainResult<Url> {
        self.endpoint("oauth/token")
    }

    pub fn account_info_url(&self) -> DomainResult<Url> {
        self.endpoint("api/account-info")
    }

    pub fn operation_history_url(&self) -> DomainResult<Url> {
        self.endpoint("api/operation-history")
    }

    fn endpoint(&self, path: &str) -> DomainResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_settings_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_file(dir.path()).unwrap();
        assert!(config.client_id.is_none());
        assert!(matches!(config.gate_config(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_settings_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"yandexMoney": {"clientId": "abc", "redirectUri": "https://example.com/cb"}}"#,
        )
        .unwrap();

        let config = Config::load_file(dir.path()).unwrap();
        let gate = config.gate_config().unwrap();
        assert_eq!(gate.client_id, "abc");
        assert_eq!(gate.redirect_uri, "https://example.com/cb");
        assert_eq!(gate.host(), "money.yandex.ru");
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"yandexMoney": {"clientId": "file", "redirectUri": "https://example.com/cb"}}"#,
        )
        .unwrap();

        let mut config = Config::load_file(dir.path()).unwrap();
        config.apply_overrides(|key| match key {
            CLIENT_ID_ENV => Some("env".to_string()),
            BASE_URL_ENV => Some("http://127.0.0.1:8080".to_string()),
            REDIRECT_URI_ENV => Some("  ".to_string()),
            _ => None,
        });

        let gate = config.gate_config().unwrap();
        assert_eq!(gate.client_id, "env");
        assert_eq!(gate.redirect_uri, "https://example.com/cb");
        assert_eq!(gate.host(), "127.0.0.1:8080");
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"theme": "dark", "yandexMoney": {"clientId": "old", "extra": 1}}"#,
        )
        .unwrap();

        let mut config = Config::load_file(dir.path()).unwrap();
        config.client_id = Some("new".to_string());
        config.redirect_uri = Some("https://example.com/cb".to_string());
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["yandexMoney"]["clientId"], "new");
        assert_eq!(saved["yandexMoney"]["extra"], 1);
        assert!(saved["yandexMoney"].get("baseUrl").is_none());
    }

    #[test]
    fn test_endpoints() {
        let gate = GateConfig::new("id", "https://example.com/cb");
        assert_eq!(
            gate.token_url().unwrap().as_str(),
            "https://money.yandex.ru/oauth/token"
        );
        assert_eq!(
            gate.operation_history_url().unwrap().as_str(),
            "https://money.yandex.ru/api/operation-history"
        );

        let local = gate.with_base_url("http://localhost:9000/").unwrap();
        assert_eq!(
            local.account_info_url().unwrap().as_str(),
            "http://localhost:9000/api/account-info"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let gate = GateConfig::new("id", "https://example.com/cb");
        assert!(gate.clone().with_base_url("not a url").is_err());
        assert!(gate.with_base_url("mailto:someone@example.com").is_err());
    }
}

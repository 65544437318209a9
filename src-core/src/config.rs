//! Connection settings for the terminal front-end.
//!
//! Loaded from `<config dir>/punto-inicio/config.toml`, then overridden by
//! `PUNTO_INICIO_*` environment variables. The password may also live in the
//! OS keychain under the `punto-inicio` service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::error::ConfigError;

pub const KEYCHAIN_SERVICE: &str = "punto-inicio";

const ENV_URL: &str = "PUNTO_INICIO_URL";
const ENV_DB: &str = "PUNTO_INICIO_DB";
const ENV_LOGIN: &str = "PUNTO_INICIO_LOGIN";
const ENV_PASSWORD: &str = "PUNTO_INICIO_PASSWORD";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: Option<String>,
    pub database: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            database: None,
            login: None,
            password: None,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// `~/.config/punto-inicio/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("punto-inicio").join("config.toml"))
    }

    /// Load from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        info!("Loading config from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `PUNTO_INICIO_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_URL) {
            self.server_url = Some(url);
        }
        if let Some(db) = get(ENV_DB) {
            self.database = Some(db);
        }
        if let Some(login) = get(ENV_LOGIN) {
            self.login = Some(login);
        }
        if let Some(password) = get(ENV_PASSWORD) {
            self.password = Some(password);
        }
        self
    }

    pub fn server_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .server_url
            .as_deref()
            .ok_or(ConfigError::Missing("server_url"))?;
        Ok(Url::parse(raw)?)
    }

    pub fn database(&self) -> Result<&str, ConfigError> {
        self.database.as_deref().ok_or(ConfigError::Missing("database"))
    }

    pub fn login(&self) -> Result<&str, ConfigError> {
        self.login.as_deref().ok_or(ConfigError::Missing("login"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Password from config or environment, else from the OS keychain.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn resolve_password(&self) -> Result<String, ConfigError> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }

        let login = self.login()?;
        debug!("Looking up password for {} in keychain", login);
        let entry = keyring::Entry::new(KEYCHAIN_SERVICE, login)
            .map_err(|e| ConfigError::Keychain(e.to_string()))?;
        match entry.get_password() {
            Ok(password) => Ok(password),
            Err(keyring::Error::NoEntry) => Err(ConfigError::Missing("password")),
            Err(e) => Err(ConfigError::Keychain(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
server_url = "https://odoo.example.com"
database = "production"
login = "cashier@example.com"
timeout_secs = 10
"#,
        )
        .unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(
            config.server_url().unwrap().as_str(),
            "https://odoo.example.com/"
        );
        assert_eq!(config.database().unwrap(), "production");
        assert_eq!(config.login().unwrap(), "cashier@example.com");
        assert!(config.password.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let err = ClientConfig::from_toml("server_url = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "Got {:?}", err);
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let config = ClientConfig::from_toml(
            r#"
server_url = "https://file.example.com"
database = "file-db"
"#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            ("PUNTO_INICIO_DB", "env-db"),
            ("PUNTO_INICIO_PASSWORD", "s3cret"),
            ("PUNTO_INICIO_LOGIN", "  "),
        ]
        .into_iter()
        .collect();
        let config = config.with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server_url.as_deref(), Some("https://file.example.com"));
        assert_eq!(config.database().unwrap(), "env-db");
        assert_eq!(config.password.as_deref(), Some("s3cret"));
        assert!(config.login.is_none(), "Blank overrides should be ignored");
    }

    #[test]
    fn test_missing_values_are_reported() {
        let config = ClientConfig::default();
        assert!(matches!(
            config.server_url(),
            Err(ConfigError::Missing("server_url"))
        ));
        assert!(matches!(config.database(), Err(ConfigError::Missing("database"))));
    }

    #[test]
    fn test_configured_password_skips_keychain() {
        let config = ClientConfig {
            login: Some("cashier".to_string()),
            password: Some("from-config".to_string()),
            ..ClientConfig::default()
        };
        assert_eq!(config.resolve_password().unwrap(), "from-config");
    }
}

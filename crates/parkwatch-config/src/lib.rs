//! Shared configuration for parkwatch tools.
//!
//! TOML file + `PARKWATCH_*` environment overlay (via `figment`), and
//! validated translation into the transport and engine config types the
//! other crates consume. The CLI layers its own flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use parkwatch_api::{TlsMode, TransportConfig};
use parkwatch_core::EngineConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no feed endpoint configured: set `endpoint` in the config file or PARKWATCH_ENDPOINT")]
    NoEndpoint,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Top-level configuration shared by every parkwatch binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Feed base URL (e.g. `https://feed.example.net`). The single
    /// transport configuration surface.
    pub endpoint: Option<String>,

    /// Periodic sync cadence in seconds.
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept self-signed TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Optional feed API key, sent as `X-API-KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            sync_interval_secs: default_sync_interval(),
            timeout_secs: default_timeout(),
            insecure: false,
            api_key: None,
        }
    }
}

fn default_sync_interval() -> u64 {
    10
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Default config file location
    /// (e.g. `~/.config/parkwatch/config.toml` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "parkwatch", "parkwatch")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration: built-in defaults, then the TOML file (explicit
    /// path or the default location), then `PARKWATCH_*` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match path {
            Some(explicit) => figment = figment.merge(Toml::file_exact(explicit)),
            None => {
                if let Some(default) = Self::default_path() {
                    figment = figment.merge(Toml::file(default));
                }
            }
        }

        Ok(figment.merge(Env::prefixed("PARKWATCH_")).extract()?)
    }

    // ── Validation / translation ─────────────────────────────────────

    /// The validated feed endpoint URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self.endpoint.as_deref().ok_or(ConfigError::NoEndpoint)?;
        Url::parse(raw).map_err(|e| ConfigError::Validation {
            field: "endpoint".into(),
            reason: e.to_string(),
        })
    }

    /// Build the transport configuration for `FeedClient`.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: if self.insecure {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
            timeout: Duration::from_secs(self.timeout_secs),
            api_key: self.api_key.clone().map(SecretString::from),
        }
    }

    /// Build the engine configuration, validating the cadence.
    pub fn engine(&self) -> Result<EngineConfig, ConfigError> {
        if self.sync_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "sync_interval_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(EngineConfig {
            refresh_interval: Duration::from_secs(self.sync_interval_secs),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.sync_interval_secs, 10);
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.insecure);
        assert!(matches!(config.endpoint(), Err(ConfigError::NoEndpoint)));
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "endpoint = \"https://feed.example.net\"\nsync_interval_secs = 30"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://feed.example.net/"
        );
        assert_eq!(config.sync_interval_secs, 30);
        assert_eq!(config.timeout_secs, 30); // untouched default
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = Config {
            sync_interval_secs: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.engine(),
            Err(ConfigError::Validation { field, .. }) if field == "sync_interval_secs"
        ));
    }

    #[test]
    fn invalid_endpoint_is_named() {
        let config = Config {
            endpoint: Some("not a url".into()),
            ..Config::default()
        };
        assert!(matches!(
            config.endpoint(),
            Err(ConfigError::Validation { field, .. }) if field == "endpoint"
        ));
    }

    #[test]
    fn engine_interval_round_trips() {
        let config = Config {
            sync_interval_secs: 45,
            ..Config::default()
        };
        assert_eq!(
            config.engine().unwrap().refresh_interval,
            Duration::from_secs(45)
        );
    }
}

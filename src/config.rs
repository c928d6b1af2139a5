//! Configuration for the GitOps starter service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::{DOC_PATHS, ROUTES};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Prefix the API is mounted under behind a reverse proxy (default: /GitOps-Starter)
    #[serde(default = "default_root_path")]
    pub root_path: String,

    /// Address to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name reported by the health endpoint
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            host: default_host(),
            port: default_port(),
            service_name: default_service_name(),
        }
    }
}

impl Config {
    /// Load config from the default location (if present) and the environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from an explicit file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::load_from_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load config from an explicit file, then apply overrides from `lookup`
    pub fn load_from_with_env<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let mut config = Self::from_file(path)?;
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `ROOT_PATH`, `HOST`, `PORT` and `SERVICE_NAME` overrides.
    ///
    /// The lookup is injected so callers can use something other than the
    /// process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root_path) = lookup("ROOT_PATH") {
            self.root_path = root_path;
        }
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got {:?}", port)))?;
        }
        if let Some(service_name) = lookup("SERVICE_NAME") {
            self.service_name = service_name;
        }
        Ok(())
    }

    /// Serialize the config as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Default config file location
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gitops-starter").join("config.toml"))
    }

    /// Root path with a leading slash and no trailing slash.
    ///
    /// Returns `None` when the prefix is empty or `/`, i.e. nothing to mount.
    pub fn mount_prefix(&self) -> Option<String> {
        let trimmed = self.root_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(format!("/{}", trimmed))
        }
    }

    /// Reject root paths the router cannot mount.
    ///
    /// The prefixed mount must not overlap the bare routes or the docs, and
    /// must be a literal path.
    pub fn validate(&self) -> Result<()> {
        let Some(prefix) = self.mount_prefix() else {
            return Ok(());
        };

        if prefix.contains(['{', '}', '*']) {
            return Err(Error::Config(format!(
                "ROOT_PATH must be a literal path, got {:?}",
                self.root_path
            )));
        }

        let clash = reserved_paths().find(|reserved| {
            prefix == *reserved || prefix.starts_with(&format!("{}/", reserved))
        });
        if let Some(reserved) = clash {
            return Err(Error::Config(format!(
                "ROOT_PATH {:?} overlaps the {} route",
                self.root_path, reserved
            )));
        }

        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Paths served at the top level that a root path may not shadow
fn reserved_paths() -> impl Iterator<Item = &'static str> {
    ROUTES
        .iter()
        .map(|(_, path)| *path)
        .filter(|path| *path != "/")
        .map(|path| path.split("/{").next().unwrap_or(path))
        .chain(DOC_PATHS.iter().copied())
}

// Default value functions

fn default_root_path() -> String {
    "/GitOps-Starter".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_service_name() -> String {
    "fastapi-gitops-starter".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.root_path, "/GitOps-Starter");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.service_name, "fastapi-gitops-starter");
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("ROOT_PATH", "/proxy"), ("PORT", "9090")]))
            .unwrap();
        assert_eq!(config.root_path, "/proxy");
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_env_invalid_port() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_mount_prefix_normalization() {
        let mut config = Config::default();
        assert_eq!(config.mount_prefix().as_deref(), Some("/GitOps-Starter"));

        config.root_path = "GitOps-Starter/".into();
        assert_eq!(config.mount_prefix().as_deref(), Some("/GitOps-Starter"));

        config.root_path = "/".into();
        assert_eq!(config.mount_prefix(), None);

        config.root_path = String::new();
        assert_eq!(config.mount_prefix(), None);
    }

    #[test]
    fn test_partial_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = 3000\nroot_path = \"/starter\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.root_path, "/starter");
        assert_eq!(config.service_name, "fastapi-gitops-starter");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config {
            port: 8080,
            ..Config::default()
        };
        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();
        assert!(matches!(Config::from_file(&path), Err(Error::Toml(_))));
    }

    #[test]
    fn test_validate_default_root_path() {
        assert!(Config::default().validate().is_ok());
        let bare = Config {
            root_path: "/".into(),
            ..Config::default()
        };
        assert!(bare.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_colliding_root_path() {
        for root_path in ["/health", "health/", "/api/items", "/api/items/5", "/docs", "/docs/v1", "/openapi.json", "/redoc"] {
            let config = Config {
                root_path: root_path.into(),
                ..Config::default()
            };
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "{} should be rejected",
                root_path
            );
        }
    }

    #[test]
    fn test_validate_allows_non_colliding_root_path() {
        for root_path in ["/api", "/healthz", "/documents", "/team/starter"] {
            let config = Config {
                root_path: root_path.into(),
                ..Config::default()
            };
            assert!(config.validate().is_ok(), "{} should be accepted", root_path);
        }
    }

    #[test]
    fn test_validate_rejects_pattern_root_path() {
        for root_path in ["/{tenant}", "/files/{*rest}", "/a*b"] {
            let config = Config {
                root_path: root_path.into(),
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(Error::Config(_))));
        }
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = 3000\nroot_path = \"/starter\"\nhost = \"127.0.0.1\"\n").unwrap();

        let config =
            Config::load_from_with_env(&path, env(&[("PORT", "9000"), ("SERVICE_NAME", "orders")]))
                .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.service_name, "orders");
        assert_eq!(config.root_path, "/starter");
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_load_rejects_colliding_env_root_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = 3000\n").unwrap();

        let err = Config::load_from_with_env(&path, env(&[("ROOT_PATH", "/health")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}

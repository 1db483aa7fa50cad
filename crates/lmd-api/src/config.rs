//! # Application Configuration
//!
//! Env-first configuration with an optional YAML file. Environment
//! variables win over the file; the file wins over defaults.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `LMD_PORT` | HTTP listen port | `8080` |
//! | `LMD_PAGE_SIZE` | List page size | `6` |
//! | `LMD_CONFIG` | Path to a YAML config file | unset |
//!
//! Credentials can only come from the file. With no credentials configured
//! the server runs with authentication disabled (development mode) and
//! every request is treated as an admin session.

use std::path::Path;

use serde::Deserialize;

use lmd_core::Role;
use lmd_query::DEFAULT_PAGE_SIZE;

/// One sign-in credential.
///
/// Custom `Debug` redacts the password to prevent credential leakage in logs.
#[derive(Clone, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub role: Role,
    /// District the account is scoped to; `None` for headquarters staff.
    #[serde(default)]
    pub district: Option<String>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("district", &self.district)
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Records per list page.
    pub page_size: usize,
    /// Sign-in credentials. Empty disables authentication.
    pub credentials: Vec<Credential>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            page_size: DEFAULT_PAGE_SIZE,
            credentials: Vec::new(),
        }
    }
}

/// The YAML file shape. All fields optional; unset fields keep defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub port: Option<u16>,
    pub page_size: Option<usize>,
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

/// Error loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigFile {
    /// Load and parse a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file: ConfigFile =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        file.validate()?;
        Ok(file)
    }

    /// Validate cross-field rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(0) = self.page_size {
            return Err(ConfigError::Invalid("page_size must be >= 1".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for cred in &self.credentials {
            if cred.username.trim().is_empty() {
                return Err(ConfigError::Invalid("credential username is empty".into()));
            }
            if cred.password.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "credential {:?} has an empty password",
                    cred.username
                )));
            }
            if !seen.insert(cred.username.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate credential username {:?}",
                    cred.username
                )));
            }
        }
        Ok(())
    }

    /// Fold file values over the defaults.
    pub fn into_config(self) -> AppConfig {
        let defaults = AppConfig::default();
        AppConfig {
            port: self.port.unwrap_or(defaults.port),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            credentials: self.credentials,
        }
    }
}

impl AppConfig {
    /// Build configuration from the environment, loading `LMD_CONFIG` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("LMD_CONFIG") {
            Ok(path) => ConfigFile::load(Path::new(&path))?.into_config(),
            Err(_) => AppConfig::default(),
        };

        if let Some(port) = std::env::var("LMD_PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Some(size) = std::env::var("LMD_PAGE_SIZE")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            if size > 0 {
                config.page_size = size;
            }
        }

        Ok(config)
    }

    /// Whether sign-in is enforced.
    pub fn auth_enabled(&self) -> bool {
        !self.credentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.page_size, 6);
        assert!(!config.auth_enabled());
    }

    #[test]
    fn file_values_override_defaults() {
        let file: ConfigFile = serde_yaml::from_str(
            r#"
port: 3000
page_size: 10
credentials:
  - username: admin
    password: secret
    role: admin
"#,
        )
        .unwrap();
        file.validate().unwrap();
        let config = file.into_config();
        assert_eq!(config.port, 3000);
        assert_eq!(config.page_size, 10);
        assert!(config.auth_enabled());
        assert_eq!(config.credentials[0].role, Role::Admin);
    }

    #[test]
    fn zero_page_size_rejected() {
        let file: ConfigFile = serde_yaml::from_str("page_size: 0").unwrap();
        assert!(file.validate().is_err());
    }

    #[test]
    fn duplicate_usernames_rejected() {
        let file: ConfigFile = serde_yaml::from_str(
            r#"
credentials:
  - { username: a, password: x, role: officer }
  - { username: a, password: y, role: admin }
"#,
        )
        .unwrap();
        assert!(file.validate().is_err());
    }

    #[test]
    fn empty_password_rejected() {
        let file: ConfigFile = serde_yaml::from_str(
            r#"
credentials:
  - { username: a, password: "", role: officer }
"#,
        )
        .unwrap();
        assert!(file.validate().is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<ConfigFile, _> = serde_yaml::from_str("listen_port: 9999");
        assert!(result.is_err());
    }

    #[test]
    fn debug_redacts_passwords() {
        let cred = Credential {
            username: "admin".into(),
            password: "hunter2".into(),
            role: Role::Admin,
            district: None,
        };
        let rendered = format!("{cred:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lmd.yaml");
        std::fs::write(&path, "port: 9090\n").unwrap();
        let config = ConfigFile::load(&path).unwrap().into_config();
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(ConfigFile::load(Path::new("/no/such/lmd.yaml")).is_err());
    }
}

use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://contactmanagement.sqlite";
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/contacts";
pub const API_URL_ENV: &str = "CONTACTS_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid store location {0:?}")]
    InvalidStoreLocation(String),
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("cannot write config: {0}")]
    Write(#[from] std::io::Error),
    #[error("cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Where the SQLite store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

impl FromStr for StoreLocation {
    type Err = ConfigError;

    /// Accepts `sqlite::memory:`, `sqlite://<path>` or a bare path.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed == "sqlite::memory:" || trimmed == ":memory:" {
            return Ok(Self::Memory);
        }
        let path = trimmed.strip_prefix("sqlite://").unwrap_or(trimmed);
        if path.is_empty() || path.contains("://") {
            return Err(ConfigError::InvalidStoreLocation(raw.to_string()));
        }
        Ok(Self::File(PathBuf::from(path)))
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("sqlite::memory:"),
            Self::File(path) => write!(f, "sqlite://{}", path.display()),
        }
    }
}

/// Contact service settings. Each flag falls back to its environment variable,
/// then to the built-in default.
#[derive(Debug, Clone, Parser)]
#[command(name = "contact-server", version, about = "Contact management REST service")]
pub struct ServerConfig {
    #[arg(long, env = "CONTACTS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Store connection string: sqlite::memory:, sqlite://<path> or a path
    #[arg(long, env = "CONTACTS_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: StoreLocation,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// GTK client settings, persisted as TOML in the user's config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn config_path() -> Option<PathBuf> {
        let proj = ProjectDirs::from("com", "example", "ContactManager")?;
        Some(proj.config_dir().join("contact-manager.toml"))
    }

    /// Reads the config file if present; `CONTACTS_API_URL` wins over it.
    pub fn load() -> Self {
        let from_file = match Self::config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(cfg) => Some(cfg),
                Err(err) => {
                    log::warn!("ignoring client config: {err}");
                    None
                }
            },
            _ => None,
        };
        Self::resolve(from_file, std::env::var(API_URL_ENV).ok())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn resolve(from_file: Option<Self>, env_url: Option<String>) -> Self {
        let mut cfg = from_file.unwrap_or_default();
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            cfg.api_url = url;
        }
        cfg
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_store_locations() {
        assert_eq!("sqlite::memory:".parse::<StoreLocation>().unwrap(), StoreLocation::Memory);
        assert_eq!(
            "sqlite://data/contacts.sqlite".parse::<StoreLocation>().unwrap(),
            StoreLocation::File(PathBuf::from("data/contacts.sqlite"))
        );
        assert_eq!(
            "/var/lib/contacts.db".parse::<StoreLocation>().unwrap(),
            StoreLocation::File(PathBuf::from("/var/lib/contacts.db"))
        );
        assert!("mongodb://localhost:27017/x".parse::<StoreLocation>().is_err());
        assert!("".parse::<StoreLocation>().is_err());
    }

    #[test]
    fn server_defaults() {
        let cfg = ServerConfig::try_parse_from(["contact-server"]).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(
            cfg.database_url,
            StoreLocation::File(PathBuf::from("contactmanagement.sqlite"))
        );
    }

    #[test]
    fn server_flags_override_defaults() {
        let cfg = ServerConfig::try_parse_from([
            "contact-server",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.database_url, StoreLocation::Memory);
    }

    #[test]
    fn env_url_overrides_file() {
        let file = ClientConfig {
            api_url: "http://files:1/api/contacts".into(),
        };
        assert_eq!(ClientConfig::resolve(Some(file.clone()), None), file);
        assert_eq!(
            ClientConfig::resolve(Some(file), Some("http://env:2/api/contacts".into())).api_url,
            "http://env:2/api/contacts"
        );
        assert_eq!(ClientConfig::resolve(None, Some(" ".into())).api_url, DEFAULT_API_URL);
    }

    #[test]
    fn client_config_round_trips_through_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg").join("contact-manager.toml");
        let cfg = ClientConfig {
            api_url: "http://example.test/api/contacts".into(),
        };
        cfg.save_to(&path).unwrap();
        assert_eq!(ClientConfig::load_from(&path).unwrap(), cfg);

        fs::write(&path, "").unwrap();
        assert_eq!(ClientConfig::load_from(&path).unwrap(), ClientConfig::default());
    }
}

//! Environment-driven configuration.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `PHONEBOOK_DB_URI` | required | `memory:`, `file:<path>` or a bare path |
//! | `PORT` | `3001` | listen port |
//! | `PHONEBOOK_STATIC_DIR` | unset | prebuilt frontend bundle to serve |

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

pub const DB_URI_VAR: &str = "PHONEBOOK_DB_URI";
pub const PORT_VAR: &str = "PORT";
pub const STATIC_DIR_VAR: &str = "PHONEBOOK_STATIC_DIR";

const DEFAULT_PORT: &str = "3001";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where contacts are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store, lost on exit.
    Memory,
    /// JSON document file.
    File(PathBuf),
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err("store uri is empty".into());
        }
        if uri == "memory" || uri.starts_with("memory:") {
            return Ok(StoreBackend::Memory);
        }

        let path = uri
            .strip_prefix("file://")
            .or_else(|| uri.strip_prefix("file:"))
            .unwrap_or(uri);
        if path.is_empty() {
            return Err("file store uri has no path".into());
        }
        Ok(StoreBackend::File(PathBuf::from(path)))
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory:"),
            StoreBackend::File(path) => write!(f, "file:{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub store: StoreBackend,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let uri = lookup(DB_URI_VAR).ok_or(ConfigError::Missing(DB_URI_VAR))?;
        let store = parse(DB_URI_VAR, &uri)?;

        let port = try_load(&lookup, PORT_VAR, DEFAULT_PORT)?;

        let static_dir = lookup(STATIC_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port,
            store,
            static_dir,
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse(key, &value)
}

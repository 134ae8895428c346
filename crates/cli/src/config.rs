//! Configuration loading from registrar.toml.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Top-level configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Token settings.
    #[serde(default)]
    pub token: TokenConfig,
}

/// Where the request store lives.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Token issuance settings.
///
/// The signing secret never lives in the file; it comes from the
/// environment so the config can be committed safely.
#[derive(Debug, Deserialize)]
pub struct TokenConfig {
    /// Default lifetime for issued tokens, in days (1-7).
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("registrar.db")
}

fn default_ttl_days() -> i64 {
    auth::MAX_TTL_DAYS
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, Error> {
        toml::from_str(toml).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.database.path, PathBuf::from("registrar.db"));
        assert_eq!(config.token.ttl_days, 7);
    }

    #[test]
    fn parse_overrides() {
        let toml = r#"
[database]
path = "/var/lib/registrar/requests.db"

[token]
ttl_days = 1
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/registrar/requests.db")
        );
        assert_eq!(config.token.ttl_days, 1);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        assert!(matches!(
            Config::parse("database = 3"),
            Err(Error::Config(_))
        ));
    }
}

//! Runtime settings loaded from environment variables.
//!
//! `main` loads `.env` with `dotenvy` before calling [`Settings::from_env`], so every
//! value here may come from either the process environment or the `.env` file.

use crate::errors::{Error, Result};
use std::net::SocketAddr;

/// Default `SQLite` database, created on first start
pub const DEFAULT_DATABASE_URL: &str = "sqlite://teman_tani.sqlite?mode=rwc";
/// Default address the HTTP API listens on
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
/// Default location of the seed file
pub const DEFAULT_SEED_PATH: &str = "seed.toml";

/// Settings the service needs at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `SeaORM` connection URL (`DATABASE_URL`)
    pub database_url: String,
    /// Socket address for the HTTP API (`BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// Path of the TOML seed file (`SEED_PATH`)
    pub seed_path: String,
}

impl Settings {
    /// Reads settings from the environment, falling back to defaults for unset variables.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `BIND_ADDR` is not a valid socket address.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Used by [`Settings::from_env`] and tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e| Error::Config {
            message: format!("Invalid BIND_ADDR '{bind_raw}': {e}"),
        })?;
        let seed_path = lookup("SEED_PATH").unwrap_or_else(|| DEFAULT_SEED_PATH.to_string());

        Ok(Self {
            database_url,
            bind_addr,
            seed_path,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(settings.seed_path, DEFAULT_SEED_PATH);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("SEED_PATH", "/etc/tani/seed.toml"),
        ]);
        let settings = Settings::from_lookup(|k| vars.get(k).map(ToString::to_string)).unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.bind_addr.port(), 9000);
        assert_eq!(settings.seed_path, "/etc/tani/seed.toml");
    }

    #[test]
    fn test_invalid_bind_addr() {
        let result = Settings::from_lookup(|k| (k == "BIND_ADDR").then(|| "not-an-addr".into()));
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}

//! # s1s2-config
//!
//! Layered configuration loading for the S1S2 dashboard using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`S1S2_*` prefix, `__` as separator)
//! 2. Project-level `.s1s2/config.toml`
//! 3. User-level `~/.config/s1s2/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `S1S2_SERVER__PORT` -> `server.port`,
//! `S1S2_INGEST__STRICT_LABELS` -> `ingest.strict_labels`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use s1s2_config::S1s2Config;
//!
//! let config = S1s2Config::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

mod error;
mod ingest;
mod server;

pub use error::ConfigError;
pub use ingest::IngestConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct S1s2Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl S1s2Config {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT read `.env`; use [`Self::load_with_dotenv`] for that.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a source cannot be parsed or a value fails
    /// validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the current directory, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".s1s2/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("S1S2_").split("__"))
    }

    /// Reject values that extract cleanly but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.host".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_upload_bytes".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.server.session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.session_ttl_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("s1s2").join("config.toml"))
    }
}

//! Server configuration read from the environment.

use std::net::SocketAddr;

use catnote_core::defaults::{SERVER_HOST, SERVER_PORT};
use catnote_core::{Error, Result};

/// Process-level settings.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `HOST` | `0.0.0.0` | Bind address |
/// | `PORT` | `3000` | Bind port |
/// | `DATABASE_URL` | unset | PostgreSQL URL; unset keeps data in memory |
/// | `SEED_ON_STARTUP` | `true` | Insert the demo category at startup |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub seed_on_startup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: SERVER_HOST.to_string(),
            port: SERVER_PORT,
            database_url: None,
            seed_on_startup: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            seed_on_startup: lookup("SEED_ON_STARTUP")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.seed_on_startup),
        }
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address {}:{}: {}", self.host, self.port, e)))
    }
}

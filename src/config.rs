use crate::constants::{DEFAULT_IMPLICIT_TLS_PORT, DEFAULT_TIMEOUT_SECS};
use crate::error::FtpsError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for one [`SecureFtpClient`](crate::SecureFtpClient).
///
/// Deserializable so it can be loaded from a TOML file; every optional field
/// carries the same default the constructor uses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub initial_path: String,
    /// The underlying protocol defaults to passive transfers; this client
    /// defaults to active (PORT) unless told otherwise.
    #[serde(default)]
    pub passive_mode: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    DEFAULT_IMPLICIT_TLS_PORT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Settings for `server` with the protocol defaults: port 990, no
    /// initial path, active mode, 30-second timeout.
    pub fn new(username: &str, password: &str, server: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            server: server.to_string(),
            port: DEFAULT_IMPLICIT_TLS_PORT,
            initial_path: String::new(),
            passive_mode: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self, FtpsError> {
        let config_str = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&config_str)
            .map_err(|e| FtpsError::InvalidArgument(format!("bad config file {}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the constructor rules: username and server must be non-empty,
    /// port must be non-zero. A blank password is allowed.
    pub fn validate(&self) -> Result<(), FtpsError> {
        if self.username.is_empty() {
            return Err(FtpsError::InvalidArgument("FTP username is blank".into()));
        }
        if self.server.is_empty() {
            return Err(FtpsError::InvalidArgument("FTP server is blank".into()));
        }
        if self.port == 0 {
            return Err(FtpsError::InvalidArgument("FTP port is zero".into()));
        }
        Ok(())
    }

    /// Base URL of the remote directory: `ftps://{server}/{initial_path}`.
    pub fn base_url(&self) -> String {
        format!(
            "ftps://{}/{}",
            self.server,
            self.initial_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

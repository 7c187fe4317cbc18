//! Relay configuration parsed from environment variables.

use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_CLIENT_BUFFER: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid { var: &'static str, value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub client_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT, client_buffer: DEFAULT_CLIENT_BUFFER }
    }
}

impl RelayConfig {
    /// Build relay config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: listen port, default 3000
    /// - `RELAY_HOST`: bind address, default `0.0.0.0`
    /// - `RELAY_CLIENT_BUFFER`: per-peer outbound queue depth, default 256
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RelayConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("RELAY_HOST")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let client_buffer = parse_var(&lookup, "RELAY_CLIENT_BUFFER", DEFAULT_CLIENT_BUFFER)?;
        if client_buffer == 0 {
            return Err(ConfigError::Invalid {
                var: "RELAY_CLIENT_BUFFER",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self { host, port, client_buffer })
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse::<T>()
        .map_err(|e| ConfigError::Invalid { var, value: raw.clone(), reason: e.to_string() })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

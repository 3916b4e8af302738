//! Relay Configuration
//!
//! Upstream address and credential, read once at startup and shared
//! read-only with every handler.

use std::env;
use std::fmt;
use thiserror::Error;

/// Base URL of the upstream metrics API
pub const API_ADDRESS_VAR: &str = "WATCHTOWER_API_ADDRESS";
/// Value sent verbatim as the upstream `Authorization` header
pub const API_TOKEN_VAR: &str = "WATCHTOWER_API_TOKEN";

/// Port the listener binds on all interfaces
pub const LISTEN_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{0} is not valid unicode")]
    NotUnicode(&'static str),
}

/// Immutable relay configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_address: String,
    pub api_token: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Load configuration through an arbitrary lookup with `env::var`
    /// semantics.
    ///
    /// Unset and empty values are both treated as missing. Values that are
    /// not valid unicode are rejected rather than reported as unset. The
    /// address is checked before the token.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let required = |key: &'static str| match lookup(key) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) | Err(env::VarError::NotPresent) => Err(ConfigError::Missing(key)),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(key)),
        };

        let api_address = required(API_ADDRESS_VAR)?;
        let api_token = required(API_TOKEN_VAR)?;

        Ok(Self {
            api_address,
            api_token,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_address", &self.api_address)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::ffi::OsString;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, env::VarError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned().ok_or(env::VarError::NotPresent)
    }

    #[test]
    fn test_loads_both_values() {
        let config = Config::from_lookup(lookup_from(&[
            (API_ADDRESS_VAR, "http://watchtower:8080"),
            (API_TOKEN_VAR, "Bearer abc"),
        ]))
        .unwrap();

        assert_eq!(config.api_address, "http://watchtower:8080");
        assert_eq!(config.api_token, "Bearer abc");
    }

    #[test]
    fn test_missing_address_reported_first() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(API_ADDRESS_VAR));
        assert_eq!(err.to_string(), "WATCHTOWER_API_ADDRESS not set");
    }

    #[test]
    fn test_empty_token_is_missing() {
        let err = Config::from_lookup(lookup_from(&[
            (API_ADDRESS_VAR, "http://watchtower:8080"),
            (API_TOKEN_VAR, ""),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(API_TOKEN_VAR));
    }

    #[test]
    fn test_non_unicode_value_is_not_reported_as_unset() {
        let err = Config::from_lookup(|key| {
            if key == API_ADDRESS_VAR {
                Ok("http://watchtower:8080".to_string())
            } else {
                Err(env::VarError::NotUnicode(OsString::from("tok")))
            }
        })
        .unwrap_err();

        assert_eq!(err, ConfigError::NotUnicode(API_TOKEN_VAR));
        assert_eq!(err.to_string(), "WATCHTOWER_API_TOKEN is not valid unicode");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config {
            api_address: "http://watchtower:8080".to_string(),
            api_token: "super-secret".to_string(),
        };
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("http://watchtower:8080"));
        assert!(!rendered.contains("super-secret"));
    }
}

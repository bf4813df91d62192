//! Runtime settings read from `SHIPKIT_*` environment variables.

use std::time::Duration;

use crate::carriers::freight::FreightCredentials;
use crate::carriers::parcel::ParcelCredentials;
use crate::error::ConfigurationError;

mod env;

pub const HTTP_TIMEOUT_MS_ENV: &str = "SHIPKIT_HTTP_TIMEOUT_MS";
pub const USER_AGENT_ENV: &str = "SHIPKIT_USER_AGENT";
pub const FREIGHT_BASE_URL_ENV: &str = "SHIPKIT_FREIGHT_BASE_URL";
pub const FREIGHT_API_KEY_ENV: &str = "SHIPKIT_FREIGHT_API_KEY";
pub const PARCEL_BASE_URL_ENV: &str = "SHIPKIT_PARCEL_BASE_URL";
pub const PARCEL_CLIENT_ID_ENV: &str = "SHIPKIT_PARCEL_CLIENT_ID";
pub const PARCEL_CLIENT_SECRET_ENV: &str = "SHIPKIT_PARCEL_CLIENT_SECRET";

const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;
const MIN_HTTP_TIMEOUT_MS: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

impl TransportConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::resolve(
            env::read_env_u64(HTTP_TIMEOUT_MS_ENV),
            env::read_non_empty_env(USER_AGENT_ENV),
        )
    }

    fn resolve(timeout_ms: Option<u64>, user_agent: Option<String>) -> Self {
        let timeout_ms = timeout_ms
            .filter(|value| *value >= MIN_HTTP_TIMEOUT_MS)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_MS);
        Self {
            timeout: Duration::from_millis(timeout_ms),
            user_agent: user_agent
                .unwrap_or_else(|| format!("shipkit/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl FreightCredentials {
    /// Reads the base URL and API key; either one missing is an error naming
    /// the variable.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(env::read_non_empty_env)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigurationError> {
        Ok(Self::new(
            required(&lookup, FREIGHT_BASE_URL_ENV)?,
            required(&lookup, FREIGHT_API_KEY_ENV)?,
        ))
    }
}

impl ParcelCredentials {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(env::read_non_empty_env)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigurationError> {
        Ok(Self::new(
            required(&lookup, PARCEL_BASE_URL_ENV)?,
            required(&lookup, PARCEL_CLIENT_ID_ENV)?,
            required(&lookup, PARCEL_CLIENT_SECRET_ENV)?,
        ))
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigurationError> {
    lookup(name).ok_or(ConfigurationError::MissingAttribute { attribute: name })
}

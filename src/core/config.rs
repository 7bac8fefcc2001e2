// src/core/config.rs

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

lazy_static! {
    static ref ENV_PREFIX: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref FETCH_TIMEOUT_ENV: String = format!("{}_FETCH_TIMEOUT_SECS", ENV_PREFIX.as_str());
    pub static ref INSPECT_TIMEOUT_ENV: String = format!("{}_INSPECT_TIMEOUT_SECS", ENV_PREFIX.as_str());
    pub static ref TLS_PORT_ENV: String = format!("{}_TLS_PORT", ENV_PREFIX.as_str());
    pub static ref USER_AGENT_ENV: String = format!("{}_USER_AGENT", ENV_PREFIX.as_str());
    pub static ref DISCOUNT_THRESHOLD_ENV: String = format!("{}_DISCOUNT_THRESHOLD", ENV_PREFIX.as_str());
}

/// Process-wide engine settings. Never holds per-request data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound for the page fetch, connection included.
    #[serde(with = "secs")]
    pub fetch_timeout: Duration,
    /// Upper bound for the TLS handshake and certificate retrieval.
    #[serde(with = "secs")]
    pub inspect_timeout: Duration,
    pub tls_port: u16,
    pub user_agent: String,
    /// Discounts strictly above this percentage are reported.
    pub discount_threshold_pct: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(15),
            inspect_timeout: Duration::from_secs(10),
            tls_port: 443,
            user_agent: format!("Trustlens/{}", env!("CARGO_PKG_VERSION")),
            discount_threshold_pct: 90.0,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with any `TRUSTLENS_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = read_env::<u64>(&FETCH_TIMEOUT_ENV) {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = read_env::<u64>(&INSPECT_TIMEOUT_ENV) {
            config.inspect_timeout = Duration::from_secs(secs);
        }
        if let Some(port) = read_env::<u16>(&TLS_PORT_ENV) {
            config.tls_port = port;
        }
        if let Some(agent) = read_env::<String>(&USER_AGENT_ENV) {
            config.user_agent = agent;
        }
        if let Some(threshold) = read_env::<f64>(&DISCOUNT_THRESHOLD_ENV) {
            config.discount_threshold_pct = threshold;
        }
        debug!(?config, "Engine configuration loaded.");
        config
    }
}

fn read_env<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparsable configuration value.");
            None
        }
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

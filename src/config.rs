/*
 * Responsibility
 * - Load settings from the environment (.env supported via dotenvy)
 * - Validate them up front (missing signing keys fail startup)
 * - Signing keys are looked up here, never inside the verifier
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::services::signature::SigningKeys;

pub const CURRENT_SIGNING_KEY_ENV: &str = "QSTASH_CURRENT_SIGNING_KEY";
pub const NEXT_SIGNING_KEY_ENV: &str = "QSTASH_NEXT_SIGNING_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // current / next HMAC secrets issued by the dispatcher
    pub signing_keys: SigningKeys,
    pub clock_tolerance: Duration,

    // Absolute base URL this receiver is published under (e.g. https://hooks.example.com).
    // When unset the destination check is skipped.
    pub public_base_url: Option<Url>,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let current = required(&lookup, CURRENT_SIGNING_KEY_ENV)?;
        let next = required(&lookup, NEXT_SIGNING_KEY_ENV)?;
        let signing_keys = SigningKeys::new(current, next);

        let clock_tolerance = match lookup("QSTASH_CLOCK_TOLERANCE_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| i64::try_from(*secs).is_ok())
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("QSTASH_CLOCK_TOLERANCE_SECONDS"))?,
            None => Duration::ZERO,
        };

        let public_base_url = match lookup("PUBLIC_BASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(v) => Some(
                Url::parse(v.trim()).map_err(|_| ConfigError::Invalid("PUBLIC_BASE_URL"))?,
            ),
            None => None,
        };

        let max_body_bytes = lookup("MAX_BODY_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            signing_keys,
            clock_tolerance,
            public_base_url,
            max_body_bytes,
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_FLAG_SERVICE_URL: &str = "http://localhost:8080";
const DEFAULT_FLAG_NAMESPACE: &str = "default";
const DEFAULT_FLAG_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} missing, it is required")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub flag_service_url: String,
    pub flag_namespace: String,
    pub flag_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));
        let or_default =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let port = required("PORT")?
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: format!("must be a valid u16 number ({e})"),
            })?;

        let flag_timeout_ms = match lookup("FLAG_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "FLAG_TIMEOUT_MS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_FLAG_TIMEOUT_MS,
        };

        if flag_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "FLAG_TIMEOUT_MS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            host: or_default("HOST", DEFAULT_HOST),
            port,
            database_url: required("DATABASE_URL")?,
            flag_service_url: or_default("FLAG_SERVICE_URL", DEFAULT_FLAG_SERVICE_URL),
            flag_namespace: or_default("FLAG_NAMESPACE", DEFAULT_FLAG_NAMESPACE),
            flag_timeout: Duration::from_millis(flag_timeout_ms),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

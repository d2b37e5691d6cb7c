use std::str::FromStr;

use parish_core::payroll::PayrollRules;

use crate::auth::jwt::JwtConfig;

/// Errors raised while loading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub database_url: String,
    /// JWT signing configuration.
    pub jwt: JwtConfig,
    /// PAYE bands and NAPSA parameters applied to every payroll write.
    pub payroll: PayrollRules,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `DATABASE_URL`          | required                |
    /// | `JWT_SECRET`            | required                |
    /// | `JWT_EXPIRY_MINS`       | `60`                    |
    /// | `PAYROLL_NAPSA_RATE`    | `0.05`                  |
    /// | `PAYROLL_NAPSA_CEILING` | `1708.20`               |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30)?;
        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", 30)?;
        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig::from_env()?;

        let defaults = PayrollRules::default();
        let payroll = PayrollRules {
            napsa_rate: env_or("PAYROLL_NAPSA_RATE", defaults.napsa_rate)?,
            napsa_ceiling: env_or("PAYROLL_NAPSA_CEILING", defaults.napsa_ceiling)?,
            ..defaults
        };
        payroll.validate().map_err(|e| ConfigError::Invalid {
            name: "PAYROLL_*",
            reason: e.to_string(),
        })?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            jwt,
            payroll,
        })
    }
}

/// Read a required, non-empty variable.
pub(crate) fn required(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// Parse a variable, falling back to `default` when unset.
pub(crate) fn env_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

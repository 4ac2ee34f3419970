//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tracker_core::dashboard::DEFAULT_PAGE_SIZE;
use tracker_core::FinePolicy;

/// Admin web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Days per dashboard page.
    pub page_size: usize,
    /// Rule for counting unpaid fines.
    pub fine_policy: FinePolicy,
    /// Whether the status endpoint probes the database.
    pub check_database: bool,
    /// Deployment environment name, reported by the status endpoint.
    pub environment: String,
    /// Upper bound on handling a single request.
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ADMIN_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:tracker.db?mode=rwc` |
    /// | `DASHBOARD_PAGE_SIZE` | Days per dashboard page | `30` |
    /// | `FINE_POLICY` | `gated` or `immediate` | `gated` |
    /// | `STATUS_CHECK_DATABASE` | Probe the database on `/api/status` | `true` |
    /// | `APP_ENV` | Environment name | `development` |
    /// | `REQUEST_TIMEOUT_SECS` | Per-request timeout | `10` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("ADMIN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            lookup("SQLITE_PATH").unwrap_or_else(|| "sqlite:tracker.db?mode=rwc".to_string());

        let page_size = match lookup("DASHBOARD_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPageSize)?,
            None => DEFAULT_PAGE_SIZE,
        };

        let fine_policy = match lookup("FINE_POLICY") {
            Some(raw) => raw.parse().map_err(ConfigError::InvalidFinePolicy)?,
            None => FinePolicy::default(),
        };

        let check_database = match lookup("STATUS_CHECK_DATABASE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidFlag("STATUS_CHECK_DATABASE"))?,
            None => true,
        };

        let environment = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout)?,
            None => Duration::from_secs(10),
        };

        Ok(Self {
            addr,
            database_url,
            page_size,
            fine_policy,
            check_database,
            environment,
            request_timeout,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ADMIN_ADDR format")]
    InvalidAddr,

    #[error("DASHBOARD_PAGE_SIZE must be a positive integer")]
    InvalidPageSize,

    #[error("Invalid FINE_POLICY: {0}")]
    InvalidFinePolicy(String),

    #[error("{0} must be true or false")]
    InvalidFlag(&'static str),

    #[error("REQUEST_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:8788".parse().unwrap());
        assert_eq!(config.database_url, "sqlite:tracker.db?mode=rwc");
        assert_eq!(config.page_size, 30);
        assert_eq!(config.fine_policy, FinePolicy::Gated);
        assert!(config.check_database);
        assert_eq!(config.environment, "development");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ADMIN_ADDR", "0.0.0.0:9000"),
            ("DASHBOARD_PAGE_SIZE", "14"),
            ("FINE_POLICY", "immediate"),
            ("STATUS_CHECK_DATABASE", "off"),
            ("APP_ENV", "production"),
            ("REQUEST_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.page_size, 14);
        assert_eq!(config.fine_policy, FinePolicy::Immediate);
        assert!(!config.check_database);
        assert_eq!(config.environment, "production");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("ADMIN_ADDR", "nowhere")]),
            Err(ConfigError::InvalidAddr)
        ));
        assert!(matches!(
            load(&[("DASHBOARD_PAGE_SIZE", "0")]),
            Err(ConfigError::InvalidPageSize)
        ));
        assert!(matches!(
            load(&[("FINE_POLICY", "later")]),
            Err(ConfigError::InvalidFinePolicy(_))
        ));
        assert!(matches!(
            load(&[("STATUS_CHECK_DATABASE", "maybe")]),
            Err(ConfigError::InvalidFlag(_))
        ));
        assert!(matches!(
            load(&[("REQUEST_TIMEOUT_SECS", "-1")]),
            Err(ConfigError::InvalidTimeout)
        ));
    }
}

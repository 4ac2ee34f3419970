//! Application state shared across handlers.

use database::Database;
use tracker_core::dashboard::DEFAULT_PAGE_SIZE;
use tracker_core::FinePolicy;

use crate::config::Config;

/// Settings that shape responses.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Days per dashboard page.
    pub page_size: usize,
    /// Rule for counting unpaid fines.
    pub fine_policy: FinePolicy,
    /// Whether the status endpoint probes the database.
    pub check_database: bool,
    /// Deployment environment name.
    pub environment: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            fine_policy: FinePolicy::default(),
            check_database: true,
            environment: "development".to_string(),
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            fine_policy: config.fine_policy,
            check_database: config.check_database,
            environment: config.environment.clone(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Response settings.
    pub settings: Settings,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, settings: Settings) -> Self {
        Self { db, settings }
    }
}

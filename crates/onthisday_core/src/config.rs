//! Runtime configuration with platform defaults.
//!
//! Callers start from `OnThisDayConfig::default()` and override fields from
//! their own input (CLI flags, environment).

use crate::logging::default_log_level;
use crate::parse::DEFAULT_SEPARATOR;
use crate::repo::event_repo::StalePolicy;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "onthisday";
const DB_FILE_NAME: &str = "onthisday.db";

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "onthisday/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/onthisday/onthisday)"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnThisDayConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub holiday_separator: String,
    pub stale_policy: StalePolicy,
    pub api_url: String,
    pub user_agent: String,
}

impl Default for OnThisDayConfig {
    fn default() -> Self {
        let app_dir = app_data_dir();
        Self {
            db_path: app_dir.join("db").join(DB_FILE_NAME),
            log_dir: app_dir.join("logs"),
            log_level: default_log_level().to_string(),
            holiday_separator: DEFAULT_SEPARATOR.to_string(),
            stale_policy: StalePolicy::default(),
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Per-user data directory, falling back to the working directory.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

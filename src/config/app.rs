//! Process-level configuration for the dashboard.
//!
//! Where the settings file and the two databases live, and how logging is set
//! up, comes from `MONITOR_*` environment variables (a `.env` file is loaded by
//! the binary before this runs). Every variable has a default so a bare
//! checkout starts without any setup.

use std::path::PathBuf;

/// Default location of the JSON settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
/// Default location of the alert database
pub const DEFAULT_ALERTS_DB: &str = "data/alerts.db";
/// Default location of the contact database
pub const DEFAULT_CONTACTS_DB: &str = "data/contacts.db";

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Minimum level, as understood by `EnvFilter` (`"info"`, `"debug"`, ...)
    pub level: String,
    /// Directory receiving `app.log` and `errors.log`
    pub dir: PathBuf,
    /// Explicit request for console output
    pub console: bool,
}

impl LogConfig {
    /// Console output is on when requested, or whenever debug output is.
    #[must_use]
    pub fn console_enabled(&self) -> bool {
        self.console
            || self.level.eq_ignore_ascii_case("debug")
            || self.level.eq_ignore_ascii_case("trace")
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
            console: false,
        }
    }
}

/// Everything the binary needs to wire the stores together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Path of the JSON settings file
    pub config_path: PathBuf,
    /// Path of the alert database file
    pub alerts_db_path: PathBuf,
    /// Path of the contact database file
    pub contacts_db_path: PathBuf,
    /// Seed demo alerts into an empty alert store on startup
    pub seed_sample_alerts: bool,
    /// Where and how much to log
    pub log: LogConfig,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let path = |name: &str, default: &str| PathBuf::from(var(name).unwrap_or_else(|| default.to_string()));
        let flag = |name: &str, default: bool| {
            var(name).map_or(default, |v| {
                matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
            })
        };

        Self {
            config_path: path("MONITOR_CONFIG_PATH", DEFAULT_CONFIG_PATH),
            alerts_db_path: path("MONITOR_ALERTS_DB", DEFAULT_ALERTS_DB),
            contacts_db_path: path("MONITOR_CONTACTS_DB", DEFAULT_CONTACTS_DB),
            seed_sample_alerts: flag("MONITOR_SEED_SAMPLE_ALERTS", true),
            log: LogConfig {
                level: var("MONITOR_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                dir: path("MONITOR_LOG_DIR", "logs"),
                console: flag("MONITOR_LOG_CONSOLE", false),
            },
        }
    }
}

//! Unified error types for the monitor dashboard store.

use std::time::Duration;
use thiserror::Error;

/// Every failure the store can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// A typed setting was given a value it cannot hold
    #[error("Invalid value '{value}' for setting {section}.{key}")]
    InvalidSetting {
        /// Section of the rejected setting
        section: String,
        /// Key of the rejected setting
        key: String,
        /// The rejected value
        value: String,
    },

    /// The settings lock could not be acquired in time
    #[error("Could not acquire config lock within {timeout:?}")]
    LockTimeout {
        /// How long the caller waited
        timeout: Duration,
    },

    /// A stored alert timestamp could not be parsed
    #[error("Invalid timestamp '{value}' on alert {alert_id}")]
    InvalidTimestamp {
        /// Alert carrying the bad timestamp
        alert_id: String,
        /// The stored text
        value: String,
    },

    /// Failure reported by sea-orm or the SQLite driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure while reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings tree could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

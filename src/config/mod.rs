/// Process-level settings read from the environment
pub mod app;

/// `SQLite` connection and table management
pub mod database;

/// Typed views over the well-known settings sections
pub mod sections;

/// JSON settings store addressed by section and key
pub mod settings;

pub use app::{AppConfig, LogConfig};
pub use settings::{ConfigService, SettingsTree};

//! Typed views over the settings sections the dashboard pages edit.
//!
//! Values are read with the same defaults the pages show for an unset field,
//! so a fresh install and a hand-edited file with missing keys look alike.

use crate::config::ConfigService;
use crate::errors::{Error, Result};

const GENERAL: &str = "general";
const SYSTEM: &str = "system";
const DEVICES: &str = "devices";
const VERSIONS: &str = "versions";

/// Shown when a version has never been recorded
pub const UNKNOWN_VERSION: &str = "Unknown";

/// The `general` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneralSettings {
    /// Name of the monitored site, shown in the info banner
    pub location_name: String,
    /// Path of the external monitoring program
    pub monitor_program_path: String,
}

impl GeneralSettings {
    /// Reads the section.
    pub fn load(config: &ConfigService) -> Result<Self> {
        Ok(Self {
            location_name: config.get(GENERAL, "location_name", String::new())?,
            monitor_program_path: config.get(GENERAL, "monitor_program_path", String::new())?,
        })
    }

    /// Writes every field back.
    pub fn save(&self, config: &ConfigService) -> Result<()> {
        config.set(GENERAL, "location_name", self.location_name.as_str())?;
        config.set(GENERAL, "monitor_program_path", self.monitor_program_path.as_str())
    }
}

/// The `system` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemSettings {
    /// Whether the monitor program is restarted on a schedule
    pub enable_restart: bool,
    /// Minutes between scheduled restarts, empty when unset
    pub minutes_to_restart: String,
    /// Snooze after startup, kept equal to `minutes_to_restart`
    pub startup_snooze_time: String,
}

impl SystemSettings {
    /// Reads the section.
    pub fn load(config: &ConfigService) -> Result<Self> {
        Ok(Self {
            enable_restart: config.get(SYSTEM, "enable_restart", false)?,
            minutes_to_restart: config.get(SYSTEM, "minutes_to_restart", String::new())?,
            startup_snooze_time: config.get(SYSTEM, "startup_snooze_time", String::new())?,
        })
    }

    /// Turns scheduled restarts on or off.
    pub fn set_enable_restart(config: &ConfigService, enabled: bool) -> Result<()> {
        config.set(SYSTEM, "enable_restart", enabled)
    }

    /// Stores the restart interval, which doubles as the startup snooze time.
    ///
    /// `minutes` must be empty or parse as a number; anything else is rejected
    /// before the file is touched.
    pub fn set_restart_minutes(config: &ConfigService, minutes: &str) -> Result<()> {
        let minutes = minutes.trim();
        if !minutes.is_empty() && minutes.parse::<f64>().map_or(true, |m| !m.is_finite()) {
            return Err(Error::InvalidSetting {
                section: SYSTEM.to_string(),
                key: "minutes_to_restart".to_string(),
                value: minutes.to_string(),
            });
        }
        config.set(SYSTEM, "minutes_to_restart", minutes)?;
        config.set(SYSTEM, "startup_snooze_time", minutes)
    }
}

/// The `devices` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSettings {
    /// Consecutive relay failures before an alert
    pub relay_fail_threshold: String,
    /// Consecutive camera failures before an alert
    pub camera_fail_threshold: String,
    /// Minutes of camera history kept in the log
    pub camera_log_minutes: String,
}

impl DeviceSettings {
    /// Reads the section.
    pub fn load(config: &ConfigService) -> Result<Self> {
        Ok(Self {
            relay_fail_threshold: config.get(DEVICES, "relay_fail_threshold", String::new())?,
            camera_fail_threshold: config.get(DEVICES, "camera_fail_threshold", String::new())?,
            camera_log_minutes: config.get(DEVICES, "camera_log_minutes", String::new())?,
        })
    }

    /// Writes every field back.
    pub fn save(&self, config: &ConfigService) -> Result<()> {
        config.set(DEVICES, "relay_fail_threshold", self.relay_fail_threshold.as_str())?;
        config.set(DEVICES, "camera_fail_threshold", self.camera_fail_threshold.as_str())?;
        config.set(DEVICES, "camera_log_minutes", self.camera_log_minutes.as_str())
    }
}

/// The optional `versions` section shown in the info banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Version of the monitor program
    pub monitor_version: String,
    /// Version of the Ein Tzofia controller software
    pub ein_tzofia_version: String,
}

impl VersionInfo {
    /// Reads the section, reporting [`UNKNOWN_VERSION`] for anything missing.
    pub fn load(config: &ConfigService) -> Result<Self> {
        Ok(Self {
            monitor_version: config.get(VERSIONS, "monitor_version", UNKNOWN_VERSION.to_string())?,
            ein_tzofia_version: config.get(
                VERSIONS,
                "ein_tzofia_version",
                UNKNOWN_VERSION.to_string(),
            )?,
        })
    }
}

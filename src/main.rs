use chrono::Local;
use dotenvy::dotenv;
use monitor_dashboard::{
    config::{
        AppConfig, ConfigService,
        sections::{GeneralSettings, VersionInfo},
    },
    core::{AlertDatabase, ContactDatabase, seed_sample_alerts},
    errors::Result,
    logging,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Load .env before reading any MONITOR_* variable
    let dotenv_loaded = dotenv().is_ok();
    let app_config = AppConfig::from_env();

    // 2. Logging as early as possible
    logging::init_logging(&app_config.log)?;
    info!("=== Monitor dashboard starting ===");
    if !dotenv_loaded {
        info!("No .env file found, using process environment only");
    }

    // 3. One settings service for the whole process
    let config = Arc::new(ConfigService::open(&app_config.config_path));
    info!("Settings loaded from {:?}", config.path());

    // 4. Stores
    let alerts = AlertDatabase::open(&app_config.alerts_db_path)
        .await
        .inspect_err(|e| error!("Failed to open alert store: {}", e))?;
    let contacts = ContactDatabase::open(&app_config.contacts_db_path)
        .await
        .inspect_err(|e| error!("Failed to open contact store: {}", e))?;

    // 5. Demo alerts until the monitoring side writes real ones
    if app_config.seed_sample_alerts {
        if let Err(e) = seed_sample_alerts(&alerts, Local::now().naive_local()).await {
            warn!("Could not seed sample alerts: {}", e);
        }
    }

    // 6. Startup summary
    let general = GeneralSettings::load(&config)?;
    let versions = VersionInfo::load(&config)?;
    let active = alerts.get_active_alerts().await?;
    let emails = contacts.get_emails().await?;
    let phones = contacts.get_phones().await?;

    info!(
        "Location '{}', monitor {}, ein tzofia {}",
        general.location_name, versions.monitor_version, versions.ein_tzofia_version
    );
    info!(
        "{} active alerts, {} email and {} phone contacts",
        active.len(),
        emails.len(),
        phones.len()
    );
    for alert in &active {
        info!(
            "[{:?}] {} {} ({})",
            alert.alert_type, alert.id, alert.description, alert.timestamp
        );
    }

    info!("=== Monitor dashboard shutdown ===");
    Ok(())
}

//! Sample alerts for an empty alert store.
//!
//! Until the monitoring side writes real alerts, the dashboard fills an empty
//! store with a representative set so every alert type shows up on the page.

use crate::core::alert::{Alert, AlertDatabase, AlertType};
use crate::errors::Result;
use chrono::NaiveDateTime;
use rand::Rng;
use tracing::{info, instrument, warn};

/// Builds the sample set, all stamped with `now`.
///
/// Sprinkler descriptions are `<row letter><group> - <head>`, fan descriptions
/// `AY<group> - 1, 2, 3, 4`, camera descriptions the camera's IP address.
#[must_use]
pub fn generate_sample_alerts(now: NaiveDateTime) -> Vec<Alert> {
    let mut rng = rand::thread_rng();
    let mut alerts = Vec::with_capacity(9);

    for i in 0..3 {
        let letter = char::from(b'A' + rng.gen_range(0..26));
        let group = rng.gen_range(1..=5);
        let head = rng.gen_range(1..=4);
        alerts.push(Alert::new(
            format!("sprinkler_{i}"),
            AlertType::Sprinkler,
            format!("{letter}{group} - {head}"),
            now,
        ));
    }

    for i in 0..2 {
        let group = rng.gen_range(1..=5);
        alerts.push(Alert::new(
            format!("fan_{i}"),
            AlertType::Fan,
            format!("AY{group} - 1, 2, 3, 4"),
            now,
        ));
    }

    for i in 0..3 {
        alerts.push(Alert::new(
            format!("camera_{i}"),
            AlertType::Camera,
            format!("192.168.1.{}", 202 + i),
            now,
        ));
    }

    alerts.push(Alert::new("software_1", AlertType::Software, "error", now));
    alerts
}

/// Seeds the sample set when the store has no active alerts.
///
/// Returns how many alerts were written; zero when the store already had
/// active alerts.
#[instrument(skip(store))]
pub async fn seed_sample_alerts(store: &AlertDatabase, now: NaiveDateTime) -> Result<usize> {
    if !store.get_active_alerts().await?.is_empty() {
        return Ok(0);
    }

    let mut written = 0;
    for alert in generate_sample_alerts(now) {
        if store.add_alert(&alert).await {
            written += 1;
        } else {
            warn!("Sample alert {} was not stored", alert.id);
        }
    }
    info!("Seeded {} sample alerts", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, temp_alert_store};

    #[test]
    fn test_sample_set_covers_every_type() {
        let alerts = generate_sample_alerts(at(12, 0, 0));

        assert_eq!(alerts.len(), 9);
        let count = |t: AlertType| alerts.iter().filter(|a| a.alert_type == t).count();
        assert_eq!(count(AlertType::Sprinkler), 3);
        assert_eq!(count(AlertType::Fan), 2);
        assert_eq!(count(AlertType::Camera), 3);
        assert_eq!(count(AlertType::Software), 1);
        assert!(alerts.iter().all(|a| !a.resolved && a.timestamp == at(12, 0, 0)));
    }

    #[test]
    fn test_sample_descriptions() {
        let alerts = generate_sample_alerts(at(12, 0, 0));

        for alert in alerts.iter().filter(|a| a.alert_type == AlertType::Sprinkler) {
            let (zone, head) = alert.description.split_once(" - ").unwrap_or_default();
            let mut chars = zone.chars();
            assert!(chars.next().is_some_and(|c| c.is_ascii_uppercase()));
            assert!(chars.as_str().parse::<u8>().is_ok_and(|g| (1..=5).contains(&g)));
            assert!(head.parse::<u8>().is_ok_and(|h| (1..=4).contains(&h)));
        }
        for alert in alerts.iter().filter(|a| a.alert_type == AlertType::Fan) {
            assert!(alert.description.starts_with("AY"));
            assert!(alert.description.ends_with(" - 1, 2, 3, 4"));
        }
        let cameras: Vec<&str> = alerts
            .iter()
            .filter(|a| a.alert_type == AlertType::Camera)
            .map(|a| a.description.as_str())
            .collect();
        assert_eq!(cameras, ["192.168.1.202", "192.168.1.203", "192.168.1.204"]);
    }

    #[tokio::test]
    async fn test_seed_only_into_empty_store() -> Result<()> {
        let (_dir, store) = temp_alert_store().await?;

        assert_eq!(seed_sample_alerts(&store, at(12, 0, 0)).await?, 9);
        assert_eq!(seed_sample_alerts(&store, at(13, 0, 0)).await?, 0);
        assert_eq!(store.get_active_alerts().await?.len(), 9);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_skips_store_with_active_alert() -> Result<()> {
        let (_dir, store) = temp_alert_store().await?;
        assert!(
            store
                .add_alert(&Alert::new("real", AlertType::Camera, "10.0.0.9", at(8, 0, 0)))
                .await
        );

        assert_eq!(seed_sample_alerts(&store, at(12, 0, 0)).await?, 0);
        assert_eq!(store.get_all_alerts().await?.len(), 1);
        Ok(())
    }
}

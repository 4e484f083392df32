//! Alert store - persistent list of alerts raised by the monitored site.
//!
//! Alerts are keyed by a producer-assigned id. Adding an alert whose id already
//! exists replaces the stored row and makes it active again. Resolving is the
//! only state change and it is one-way: resolved alerts stay in the table but
//! drop out of the active view.

use crate::{
    config::database::{close_connection, connect, create_alert_tables, ensure_parent_dir, sqlite_url},
    entities::{Alert as AlertEntity, alert},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::{
    QueryOrder, Set,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

pub use crate::entities::AlertType;

/// Storage format of alert timestamps. Fixed width keeps text order equal to
/// time order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One alert as shown on the alerts page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Producer-assigned identifier, unique in the store
    pub id: String,
    /// Which kind of device raised it
    pub alert_type: AlertType,
    /// Location or address of the failing device
    pub description: String,
    /// Local wall-clock time the alert was raised
    pub timestamp: NaiveDateTime,
    /// Set once by `resolve_alert`, cleared when the alert is raised again
    pub resolved: bool,
}

impl Alert {
    /// A new, unresolved alert.
    pub fn new(
        id: impl Into<String>,
        alert_type: AlertType,
        description: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            alert_type,
            description: description.into(),
            timestamp,
            resolved: false,
        }
    }
}

impl TryFrom<alert::Model> for Alert {
    type Error = Error;

    fn try_from(model: alert::Model) -> Result<Self> {
        let timestamp = model
            .timestamp
            .parse::<NaiveDateTime>()
            .map_err(|_| Error::InvalidTimestamp {
                alert_id: model.id.clone(),
                value: model.timestamp.clone(),
            })?;
        Ok(Self {
            id: model.id,
            alert_type: model.alert_type,
            description: model.description,
            timestamp,
            resolved: model.resolved,
        })
    }
}

/// Which rows a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertFilter {
    /// Unresolved alerts only
    Active,
    /// Everything, resolved or not
    All,
}

/// Inserts `alert`, replacing any stored alert with the same id.
///
/// The replacement always comes back unresolved, whatever `alert.resolved` says.
pub async fn upsert_alert<C>(db: &C, alert: &Alert) -> Result<()>
where
    C: ConnectionTrait,
{
    let row = alert::ActiveModel {
        id: Set(alert.id.clone()),
        alert_type: Set(alert.alert_type),
        description: Set(alert.description.clone()),
        timestamp: Set(alert.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        resolved: Set(false),
    };

    AlertEntity::insert(row)
        .on_conflict(
            OnConflict::column(alert::Column::Id)
                .update_columns([
                    alert::Column::AlertType,
                    alert::Column::Description,
                    alert::Column::Timestamp,
                    alert::Column::Resolved,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Lists alerts newest first.
pub async fn find_alerts<C>(db: &C, filter: AlertFilter) -> Result<Vec<Alert>>
where
    C: ConnectionTrait,
{
    let mut query = AlertEntity::find();
    if filter == AlertFilter::Active {
        query = query.filter(alert::Column::Resolved.eq(false));
    }

    query
        .order_by_desc(alert::Column::Timestamp)
        .all(db)
        .await?
        .into_iter()
        .map(Alert::try_from)
        .collect()
}

/// Marks the alert resolved. Returns `false` when no alert has that id.
pub async fn mark_resolved<C>(db: &C, alert_id: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = AlertEntity::update_many()
        .col_expr(alert::Column::Resolved, Expr::value(true))
        .filter(alert::Column::Id.eq(alert_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// File-backed alert store.
///
/// Each call opens its own connection and closes it before returning; the
/// store keeps no handle between calls.
#[derive(Debug, Clone)]
pub struct AlertDatabase {
    path: PathBuf,
    url: String,
}

impl AlertDatabase {
    /// Opens the store at `path`, creating the directory, file and table as needed.
    #[instrument]
    pub async fn open<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path)?;
        let store = Self {
            url: sqlite_url(&path),
            path,
        };

        let db = connect(&store.url).await?;
        let created = create_alert_tables(&db).await;
        close_connection(db).await;
        created?;

        info!("Alert store ready at {:?}", store.path);
        Ok(store)
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds or replaces an alert. Storage errors are logged and reported as `false`.
    #[instrument(skip(self, alert), fields(alert_id = %alert.id))]
    pub async fn add_alert(&self, alert: &Alert) -> bool {
        let outcome = match connect(&self.url).await {
            Ok(db) => {
                let outcome = upsert_alert(&db, alert).await;
                close_connection(db).await;
                outcome
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                debug!("Stored {:?} alert {}", alert.alert_type, alert.id);
                true
            }
            Err(e) => {
                error!("Failed to add alert {}: {}", alert.id, e);
                false
            }
        }
    }

    /// Unresolved alerts, newest first.
    pub async fn get_active_alerts(&self) -> Result<Vec<Alert>> {
        self.list(AlertFilter::Active).await
    }

    /// Every alert including resolved ones, newest first.
    pub async fn get_all_alerts(&self) -> Result<Vec<Alert>> {
        self.list(AlertFilter::All).await
    }

    async fn list(&self, filter: AlertFilter) -> Result<Vec<Alert>> {
        let db = connect(&self.url).await?;
        let alerts = find_alerts(&db, filter).await;
        close_connection(db).await;
        alerts
    }

    /// Resolves the alert with `alert_id`.
    ///
    /// Returns `false` when nothing matched or the update failed.
    #[instrument(skip(self))]
    pub async fn resolve_alert(&self, alert_id: &str) -> bool {
        let outcome = match connect(&self.url).await {
            Ok(db) => {
                let outcome = mark_resolved(&db, alert_id).await;
                close_connection(db).await;
                outcome
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(true) => {
                info!("Resolved alert {}", alert_id);
                true
            }
            Ok(false) => {
                debug!("No alert with id {} to resolve", alert_id);
                false
            }
            Err(e) => {
                error!("Failed to resolve alert {}: {}", alert_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        at, init_test_tracing, replace_dir_with_file, setup_alert_db, temp_alert_store,
    };

    #[tokio::test]
    async fn test_upsert_and_find() -> Result<()> {
        let db = setup_alert_db().await?;
        let alert = Alert::new("s1", AlertType::Sprinkler, "A1 - 1", at(8, 0, 0));

        upsert_alert(&db, &alert).await?;

        let active = find_alerts(&db, AlertFilter::Active).await?;
        assert_eq!(active, vec![alert]);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_reactivates() -> Result<()> {
        let db = setup_alert_db().await?;
        upsert_alert(&db, &Alert::new("dup", AlertType::Fan, "Original", at(8, 0, 0))).await?;
        assert!(mark_resolved(&db, "dup").await?);

        let replacement = Alert::new("dup", AlertType::Camera, "Updated", at(9, 30, 0));
        upsert_alert(&db, &replacement).await?;

        let all = find_alerts(&db, AlertFilter::All).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].alert_type, AlertType::Camera);
        assert_eq!(all[0].description, "Updated");
        assert_eq!(all[0].timestamp, at(9, 30, 0));
        assert!(!all[0].resolved);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_ignores_resolved_flag_on_input() -> Result<()> {
        let db = setup_alert_db().await?;
        let mut alert = Alert::new("sw", AlertType::Software, "error", at(7, 0, 0));
        alert.resolved = true;

        upsert_alert(&db, &alert).await?;

        assert_eq!(find_alerts(&db, AlertFilter::Active).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_orders_newest_first() -> Result<()> {
        let db = setup_alert_db().await?;
        upsert_alert(&db, &Alert::new("old", AlertType::Fan, "AY1", at(6, 0, 0))).await?;
        upsert_alert(&db, &Alert::new("new", AlertType::Fan, "AY2", at(18, 0, 0))).await?;
        upsert_alert(&db, &Alert::new("mid", AlertType::Fan, "AY3", at(12, 0, 0))).await?;

        let ids: Vec<String> = find_alerts(&db, AlertFilter::All)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, ["new", "mid", "old"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_subsecond_timestamps_order_correctly() -> Result<()> {
        let db = setup_alert_db().await?;
        let whole = at(10, 0, 0);
        let later = whole + chrono::Duration::microseconds(250);
        upsert_alert(&db, &Alert::new("later", AlertType::Camera, "192.168.1.203", later)).await?;
        upsert_alert(&db, &Alert::new("whole", AlertType::Camera, "192.168.1.202", whole)).await?;

        let alerts = find_alerts(&db, AlertFilter::All).await?;
        assert_eq!(alerts[0].id, "later");
        assert_eq!(alerts[0].timestamp, later);
        assert_eq!(alerts[1].timestamp, whole);
        Ok(())
    }

    #[tokio::test]
    async fn test_active_excludes_resolved_and_all_is_superset() -> Result<()> {
        let db = setup_alert_db().await?;
        upsert_alert(&db, &Alert::new("a", AlertType::Sprinkler, "B2 - 3", at(8, 0, 0))).await?;
        upsert_alert(&db, &Alert::new("b", AlertType::Fan, "AY4 - 1, 2, 3, 4", at(9, 0, 0))).await?;
        mark_resolved(&db, "a").await?;

        let active = find_alerts(&db, AlertFilter::Active).await?;
        let all = find_alerts(&db, AlertFilter::All).await?;

        assert!(active.iter().all(|a| !a.resolved));
        assert!(active.iter().all(|a| all.contains(a)));
        assert_eq!(active.len(), 1);
        assert_eq!(all.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_resolved_missing_id_changes_nothing() -> Result<()> {
        let db = setup_alert_db().await?;
        upsert_alert(&db, &Alert::new("keep", AlertType::Camera, "192.168.1.204", at(8, 0, 0))).await?;
        let before = find_alerts(&db, AlertFilter::All).await?;

        assert!(!mark_resolved(&db, "missing").await?);
        assert_eq!(find_alerts(&db, AlertFilter::All).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_stored_timestamp_is_reported() -> Result<()> {
        let db = setup_alert_db().await?;
        alert::ActiveModel {
            id: Set("broken".to_string()),
            alert_type: Set(AlertType::Software),
            description: Set("error".to_string()),
            timestamp: Set("yesterday".to_string()),
            resolved: Set(false),
        }
        .insert(&db)
        .await?;

        let result = find_alerts(&db, AlertFilter::All).await;
        assert!(matches!(result, Err(Error::InvalidTimestamp { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_store_lifecycle_scenario() -> Result<()> {
        init_test_tracing();
        let (_dir, store) = temp_alert_store().await?;
        assert!(store.get_active_alerts().await?.is_empty());

        let alert = Alert::new("s1", AlertType::Sprinkler, "A1-1", at(14, 15, 0));
        assert!(store.add_alert(&alert).await);
        assert_eq!(store.get_active_alerts().await?, vec![alert.clone()]);

        assert!(store.resolve_alert("s1").await);
        assert!(store.get_active_alerts().await?.is_empty());

        let all = store.get_all_alerts().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "s1");
        assert!(all[0].resolved);
        Ok(())
    }

    #[tokio::test]
    async fn test_store_resolve_unknown_id_returns_false() -> Result<()> {
        let (_dir, store) = temp_alert_store().await?;

        assert!(!store.resolve_alert("nonexistent_id").await);
        Ok(())
    }

    #[tokio::test]
    async fn test_store_storage_failure_reports_false() -> Result<()> {
        init_test_tracing();
        let (_dir, store) = temp_alert_store().await?;
        let alert = Alert::new("s1", AlertType::Sprinkler, "A1 - 1", at(8, 0, 0));
        assert!(store.add_alert(&alert).await);

        replace_dir_with_file(store.path())?;

        assert!(!store.add_alert(&alert).await);
        assert!(!store.resolve_alert("s1").await);
        assert!(store.get_active_alerts().await.is_err());
        assert!(store.get_all_alerts().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_store_persists_across_reopen() -> Result<()> {
        let (dir, store) = temp_alert_store().await?;
        assert!(
            store
                .add_alert(&Alert::new("cam", AlertType::Camera, "192.168.1.202", at(8, 0, 0)))
                .await
        );

        let reopened = AlertDatabase::open(store.path()).await?;
        assert_eq!(reopened.get_all_alerts().await?.len(), 1);
        drop(dir);
        Ok(())
    }

    #[tokio::test]
    async fn test_open_creates_missing_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data").join("alerts.db");

        let store = AlertDatabase::open(&path).await?;

        assert!(path.exists());
        assert!(store.get_all_alerts().await?.is_empty());
        Ok(())
    }

    #[test]
    fn test_timestamp_text_format() {
        let stamp = at(9, 5, 7) + chrono::Duration::microseconds(42);
        assert_eq!(
            stamp.format(TIMESTAMP_FORMAT).to_string(),
            "2025-03-14T09:05:07.000042"
        );
        assert_eq!(
            "2025-03-14T09:05:07".parse::<NaiveDateTime>().unwrap(),
            at(9, 5, 7)
        );
    }
}

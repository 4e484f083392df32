//! Shared test utilities for the dashboard stores.
//!
//! Query-level tests run against an in-memory `SQLite` database; store-level
//! tests need a real file because every store call opens its own connection.

use crate::{
    config::database::{create_alert_tables, create_contact_tables},
    core::{AlertDatabase, ContactDatabase},
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes tracing output to the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A fixed test day at the given time of day.
#[must_use]
pub fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .unwrap_or_default()
}

/// In-memory database with the `alerts` table.
pub async fn setup_alert_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_alert_tables(&db).await?;
    Ok(db)
}

/// In-memory database with the `emails` and `phones` tables.
pub async fn setup_contact_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    create_contact_tables(&db).await?;
    Ok(db)
}

/// A file-backed alert store in a fresh temporary directory.
///
/// Keep the returned directory alive for as long as the store is used.
pub async fn temp_alert_store() -> Result<(tempfile::TempDir, AlertDatabase)> {
    let dir = tempfile::tempdir()?;
    let store = AlertDatabase::open(dir.path().join("data").join("alerts.db")).await?;
    Ok((dir, store))
}

/// A file-backed contact store in a fresh temporary directory.
pub async fn temp_contact_store() -> Result<(tempfile::TempDir, ContactDatabase)> {
    let dir = tempfile::tempdir()?;
    let store = ContactDatabase::open(dir.path().join("data").join("contacts.db")).await?;
    Ok((dir, store))
}

/// Replaces the directory holding `db_path` with a regular file, so every
/// later connection to the database fails.
pub fn replace_dir_with_file(db_path: &std::path::Path) -> Result<()> {
    if let Some(dir) = db_path.parent() {
        std::fs::remove_dir_all(dir)?;
        std::fs::write(dir, b"not a directory")?;
    }
    Ok(())
}

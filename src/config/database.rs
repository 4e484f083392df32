//! Database configuration module for the dashboard stores.
//!
//! Each store owns one `SQLite` file. Connections are opened per operation and
//! closed again afterwards, so this module only deals with turning a file path
//! into a connection URL, making sure the file's directory exists, and creating
//! the tables from the entity definitions with `SeaORM`'s schema generation.

use crate::entities::{Alert, Email, Phone};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, warn};

/// Builds the `sqlx` connection URL for a database file.
///
/// `mode=rwc` makes the driver create the file on first use.
#[must_use]
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

/// Creates the directory holding `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Opens a new connection to the database at `url`.
pub async fn connect(url: &str) -> Result<DatabaseConnection> {
    debug!("Opening database connection to {}", url);
    Database::connect(url).await.map_err(Into::into)
}

/// Closes a per-operation connection. Failures are logged, not returned,
/// since the operation itself has already completed.
pub async fn close_connection(db: DatabaseConnection) {
    if let Err(e) = db.close().await {
        warn!("Failed to close database connection: {}", e);
    }
}

async fn create_table_for<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

/// Creates the `alerts` table if it does not exist.
pub async fn create_alert_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    create_table_for(db, Alert).await
}

/// Creates the `emails` and `phones` tables if they do not exist.
pub async fn create_contact_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    create_table_for(db, Email).await?;
    create_table_for(db, Phone).await
}

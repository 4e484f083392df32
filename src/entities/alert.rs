//! Alert entity - One row per alert raised by the monitored site.
//!
//! The id is supplied by the producer of the alert, so re-raising the same alert
//! replaces the existing row instead of adding a new one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of device or subsystem an alert refers to
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Sprinkler head failure
    #[sea_orm(string_value = "sprinkler")]
    Sprinkler,
    /// Ventilation fan failure
    #[sea_orm(string_value = "fan")]
    Fan,
    /// Camera unreachable
    #[sea_orm(string_value = "camera")]
    Camera,
    /// Monitoring software error
    #[sea_orm(string_value = "software")]
    Software,
}

/// Alert database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    /// Producer-assigned identifier (e.g. `"camera_2"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Stored as lowercase text
    pub alert_type: AlertType,
    /// Location or address of the failing device
    pub description: String,
    /// ISO-8601 text, fixed width so that text order is time order
    pub timestamp: String,
    /// Resolved alerts stay in the table but leave the active view
    pub resolved: bool,
}

/// Alerts have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

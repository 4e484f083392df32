//! Email contact entity - addresses notified when alerts are raised.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Email contact database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "emails")]
pub struct Model {
    /// Database-assigned row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The address, unique across the table
    #[sea_orm(unique)]
    pub email: String,
}

/// Emails have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

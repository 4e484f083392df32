//! Phone contact entity - numbers notified when alerts are raised.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Phone contact database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "phones")]
pub struct Model {
    /// Database-assigned row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The number as entered, unique across the table
    #[sea_orm(unique)]
    pub phone: String,
}

/// Phones have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Partner entity - A client organization that submits product requests.
//!
//! Partners are keyed by their name. The partner type is stored as a free-form
//! label so that custom "other" types survive a round trip.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    /// Unique partner name, doubles as the primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Stored partner type label (e.g. `"Wholesale"` or a custom label)
    pub partner_type: String,
    /// Full name of the partner's director
    pub director: String,
    /// Contact e-mail address
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Legal address
    pub address: String,
    /// 10-digit taxpayer identification number
    pub tax_id: String,
    /// Partner rating, never negative
    pub rating: i32,
    /// When the partner was created
    pub created_at: DateTime,
    /// When the partner was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Partner and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One partner has many request lines
    #[sea_orm(has_many = "super::request_line::Entity")]
    RequestLines,
}

impl Related<super::request_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

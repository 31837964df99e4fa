//! Request line entity - One (partner, product, quantity) association.
//!
//! At most one line exists per (partner, product) pair; the save path
//! replaces a partner's whole line set inside a single transaction.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Request line database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "request_lines")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the requesting partner
    pub partner_name: String,
    /// Name of the requested product
    pub product_name: String,
    /// Requested quantity, at least 1
    pub quantity: i32,
}

/// Defines relationships between `RequestLine` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerName",
        to = "super::partner::Column::Name"
    )]
    Partner,
    /// Each line references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductName",
        to = "super::product::Column::Name"
    )]
    Product,
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Product entity - Read-only catalog items partners can request.
//!
//! Each product carries the minimum cost charged to a partner and belongs to a
//! product type, which in turn selects the material defect surcharge.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique product name (e.g., "Bolt M8")
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    /// Minimum unit cost for a partner, before any defect surcharge
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub min_partner_cost: Decimal,
    /// Product type this product belongs to
    pub product_type: String,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one product type
    #[sea_orm(
        belongs_to = "super::product_type::Entity",
        from = "Column::ProductType",
        to = "super::product_type::Column::ProductType"
    )]
    ProductType,
    /// One product appears in many request lines
    #[sea_orm(has_many = "super::request_line::Entity")]
    RequestLines,
}

impl Related<super::product_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductType.def()
    }
}

impl Related<super::request_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

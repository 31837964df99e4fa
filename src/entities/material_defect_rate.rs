//! Material defect rate entity - Per-material surcharge percentage.
//!
//! Rows are optional: a product type without a row carries no surcharge.
//! `material_type` matches `product_types.product_type` by value only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Material defect rate database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "material_defect_rates")]
pub struct Model {
    /// Material type this rate applies to
    #[sea_orm(primary_key, auto_increment = false)]
    pub material_type: String,
    /// Surcharge in percent (5 means +5%)
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub defect_percent: Decimal,
}

/// `MaterialDefectRate` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

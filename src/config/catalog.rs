//! Catalog seed configuration.
//!
//! The product catalog is read-only for the application. Its contents are
//! declared in the `[catalog]` section of config.toml and inserted into the
//! store on startup when missing.

use rust_decimal::Decimal;
use serde::Deserialize;

/// The `[catalog]` section of config.toml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Product type names
    #[serde(default)]
    pub product_types: Vec<String>,
    /// Per-material surcharge rates
    #[serde(default)]
    pub defect_rates: Vec<DefectRateConfig>,
    /// Catalog products
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// Configuration for a single material defect rate
#[derive(Debug, Deserialize, Clone)]
pub struct DefectRateConfig {
    /// Material type, matches a product type name
    pub material_type: String,
    /// Surcharge in percent
    pub defect_percent: Decimal,
}

/// Configuration for a single catalog product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Unique product name
    pub name: String,
    /// Minimum unit cost for a partner
    pub min_partner_cost: Decimal,
    /// Product type the product belongs to
    pub product_type: String,
}

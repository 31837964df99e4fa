//! Catalog business logic - Products, product types and defect rates.
//!
//! The catalog is read-only for the application. It is seeded from
//! configuration on startup and read back into a [`Catalog`] snapshot for
//! pricing.

use crate::{
    config::catalog::CatalogConfig,
    core::pricing::{Catalog, ProductPrice, adjusted_unit_cost},
    entities::{
        MaterialDefectRate, Product, ProductType, material_defect_rate, product, product_type,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// A catalog product with its surcharge-adjusted unit cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// The stored product
    pub product: product::Model,
    /// Applied defect surcharge in percent
    pub defect_percent: Decimal,
    /// Unit cost after surcharge
    pub adjusted_unit_cost: Decimal,
}

/// Retrieves all products, ordered alphabetically by name.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its name.
pub async fn get_product_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find_by_id(name.trim())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists products together with their surcharge and adjusted unit cost.
pub async fn list_catalog_entries(db: &DatabaseConnection) -> Result<Vec<CatalogEntry>> {
    let products = list_products(db).await?;
    let rates = load_defect_rates(db).await?;
    products
        .into_iter()
        .map(|product| -> Result<CatalogEntry> {
            let defect_percent = rates
                .get(&product.product_type)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let adjusted = adjusted_unit_cost(product.min_partner_cost, defect_percent)
                .ok_or_else(|| Error::CostOverflow {
                    product: product.name.clone(),
                })?;
            Ok(CatalogEntry {
                adjusted_unit_cost: adjusted,
                defect_percent,
                product,
            })
        })
        .collect()
}

async fn load_product_prices(db: &DatabaseConnection) -> Result<HashMap<String, ProductPrice>> {
    let products = Product::find().all(db).await?;
    Ok(products
        .into_iter()
        .map(|p| {
            (
                p.name,
                ProductPrice {
                    min_partner_cost: p.min_partner_cost,
                    product_type: p.product_type,
                },
            )
        })
        .collect())
}

async fn load_defect_rates(db: &DatabaseConnection) -> Result<HashMap<String, Decimal>> {
    let rates = MaterialDefectRate::find().all(db).await?;
    Ok(rates
        .into_iter()
        .map(|r| (r.material_type, r.defect_percent))
        .collect())
}

/// Loads the defect-aware pricing catalog.
///
/// # Errors
/// Returns an error if either the products or the defect rates cannot be read.
pub async fn load_catalog(db: &DatabaseConnection) -> Result<Catalog> {
    let products = load_product_prices(db).await?;
    let rates = load_defect_rates(db).await?;
    debug!(
        "Loaded catalog with {} products and {} defect rates.",
        products.len(),
        rates.len()
    );
    Ok(Catalog::new(products, rates))
}

/// Loads a catalog that prices at base cost, without defect rates.
pub async fn load_base_catalog(db: &DatabaseConnection) -> Result<Catalog> {
    Ok(Catalog::base_only(load_product_prices(db).await?))
}

/// Digits and decimal places of the `products.min_partner_cost` column.
pub const COST_PRECISION: (u32, u32) = (12, 2);
/// Digits and decimal places of the `material_defect_rates.defect_percent` column.
pub const RATE_PRECISION: (u32, u32) = (6, 2);

/// Whether `value` fits a `DECIMAL(precision, scale)` column without rounding.
#[must_use]
pub fn fits_precision(value: Decimal, (precision, scale): (u32, u32)) -> bool {
    let value = value.normalize();
    let integer_digits = precision.saturating_sub(scale);
    value.scale() <= scale
        && 10_i64
            .checked_pow(integer_digits)
            .is_some_and(|limit| value.abs() < Decimal::from(limit))
}

/// Inserts the configured catalog rows that are not in the store yet.
///
/// Existing rows are left untouched, so running this on every startup is
/// safe. Everything is inserted in one transaction. Returns the number of
/// rows inserted.
///
/// # Errors
/// Returns `Error::Config` for negative costs or rates and for values that do
/// not fit their column.
#[instrument(skip(db, config))]
pub async fn seed_catalog(db: &DatabaseConnection, config: &CatalogConfig) -> Result<usize> {
    info!(
        "Seeding catalog: {} product types, {} defect rates, {} products from configuration.",
        config.product_types.len(),
        config.defect_rates.len(),
        config.products.len()
    );
    let txn = db.begin().await?;
    let mut inserted = 0;

    let mut type_names: Vec<&str> = config.product_types.iter().map(String::as_str).collect();
    type_names.extend(config.products.iter().map(|p| p.product_type.as_str()));
    for type_name in type_names {
        if ProductType::find_by_id(type_name).one(&txn).await?.is_some() {
            continue;
        }
        product_type::ActiveModel {
            product_type: Set(type_name.to_string()),
        }
        .insert(&txn)
        .await?;
        inserted += 1;
    }

    for rate in &config.defect_rates {
        if rate.defect_percent < Decimal::ZERO {
            return Err(Error::Config {
                message: format!(
                    "Defect rate for '{}' cannot be negative",
                    rate.material_type
                ),
            });
        }
        if !fits_precision(rate.defect_percent, RATE_PRECISION) {
            return Err(Error::Config {
                message: format!(
                    "Defect rate for '{}' does not fit DECIMAL{:?}",
                    rate.material_type, RATE_PRECISION
                ),
            });
        }
        if MaterialDefectRate::find_by_id(rate.material_type.as_str())
            .one(&txn)
            .await?
            .is_some()
        {
            warn!(
                "Defect rate for '{}' already exists. Skipping.",
                rate.material_type
            );
            continue;
        }
        material_defect_rate::ActiveModel {
            material_type: Set(rate.material_type.clone()),
            defect_percent: Set(rate.defect_percent),
        }
        .insert(&txn)
        .await?;
        inserted += 1;
    }

    for item in &config.products {
        if item.min_partner_cost < Decimal::ZERO {
            return Err(Error::Config {
                message: format!("Cost of product '{}' cannot be negative", item.name),
            });
        }
        if !fits_precision(item.min_partner_cost, COST_PRECISION) {
            return Err(Error::Config {
                message: format!(
                    "Cost of product '{}' does not fit DECIMAL{:?}",
                    item.name, COST_PRECISION
                ),
            });
        }
        if Product::find_by_id(item.name.as_str())
            .one(&txn)
            .await?
            .is_some()
        {
            debug!("Product '{}' already exists. Skipping.", item.name);
            continue;
        }
        product::ActiveModel {
            name: Set(item.name.clone()),
            min_partner_cost: Set(item.min_partner_cost),
            product_type: Set(item.product_type.clone()),
        }
        .insert(&txn)
        .await?;
        inserted += 1;
    }

    txn.commit().await?;
    info!("Catalog seeding inserted {} rows.", inserted);
    Ok(inserted)
}

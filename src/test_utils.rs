//! Shared test utilities.
//!
//! This module provides helpers for setting up in-memory test databases with a
//! small catalog and for creating partners with sensible defaults.

use crate::{
    config::catalog::{CatalogConfig, DefectRateConfig, ProductConfig},
    core::{
        catalog::seed_catalog,
        partner::{PartnerDraft, PartnerType},
        policy::MutabilityPolicy,
        request::{RequestLines, SaveRequestArgs, SaveTarget, save_request},
        validation::RequiredFields,
    },
    entities::partner,
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The catalog used throughout the tests.
///
/// * Bolt: 10.00, Steel
/// * Nut: 0.20, Steel
/// * Plank: 3.50, Wood
/// * Steel carries a 5% defect surcharge, Wood none
pub fn test_catalog_config() -> CatalogConfig {
    CatalogConfig {
        product_types: vec!["Steel".to_string(), "Wood".to_string()],
        defect_rates: vec![DefectRateConfig {
            material_type: "Steel".to_string(),
            defect_percent: Decimal::new(5, 0),
        }],
        products: vec![
            ProductConfig {
                name: "Bolt".to_string(),
                min_partner_cost: Decimal::new(1000, 2),
                product_type: "Steel".to_string(),
            },
            ProductConfig {
                name: "Nut".to_string(),
                min_partner_cost: Decimal::new(20, 2),
                product_type: "Steel".to_string(),
            },
            ProductConfig {
                name: "Plank".to_string(),
                min_partner_cost: Decimal::new(350, 2),
                product_type: "Wood".to_string(),
            },
        ],
    }
}

/// In-memory database seeded with [`test_catalog_config`].
pub async fn setup_with_catalog() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    seed_catalog(&db, &test_catalog_config()).await?;
    Ok(db)
}

/// A valid wholesale partner draft.
pub fn sample_draft(name: &str) -> PartnerDraft {
    PartnerDraft {
        name: name.to_string(),
        partner_type: PartnerType::Wholesale,
        director: "Ivanov Ivan".to_string(),
        email: "info@romashka.example".to_string(),
        phone: "+7 900 000 00 00".to_string(),
        address: "Moscow, Lenina 1".to_string(),
        tax_id: "1234567890".to_string(),
        rating: 100,
    }
}

/// Saves `draft` as a new partner with the given lines.
pub async fn create_partner_from_draft(
    db: &DatabaseConnection,
    draft: &PartnerDraft,
    items: &[(&str, u32)],
) -> Result<partner::Model> {
    let mut lines = RequestLines::new();
    for (product, quantity) in items {
        lines.add(*product, *quantity)?;
    }
    save_request(
        db,
        SaveRequestArgs {
            target: &SaveTarget::New,
            draft,
            lines: &lines,
            required: &RequiredFields::all(),
            policy: &MutabilityPolicy::default(),
        },
    )
    .await
}

/// Saves a [`sample_draft`] partner with the given lines.
pub async fn create_test_partner(
    db: &DatabaseConnection,
    name: &str,
    items: &[(&str, u32)],
) -> Result<partner::Model> {
    create_partner_from_draft(db, &sample_draft(name), items).await
}

/// Inserts a partner row without any request lines.
pub async fn insert_bare_partner(db: &DatabaseConnection, name: &str) -> Result<partner::Model> {
    let now = chrono::Utc::now().naive_utc();
    let model = partner::ActiveModel {
        name: Set(name.to_string()),
        partner_type: Set("Retail".to_string()),
        director: Set("Sidorov Sidor".to_string()),
        email: Set("hello@lonely.example".to_string()),
        phone: Set("+7 900 111 11 11".to_string()),
        address: Set("Kazan, Baumana 5".to_string()),
        tax_id: Set("1111111111".to_string()),
        rating: Set(10),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(model)
}

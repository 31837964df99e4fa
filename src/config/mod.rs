/// Database configuration and connection management
pub mod database;

/// Catalog seed configuration (product types, defect rates, products)
pub mod catalog;

/// Application settings loaded from config.toml
pub mod settings;

pub use settings::{AppConfig, load_app_configuration};

//! Application settings.
//!
//! Settings come from a TOML file (`PARTNER_REQUESTS_CONFIG`, falling back to
//! `./config.toml`). A missing file is not an error: every setting has a
//! default, and the catalog simply starts empty.

use crate::config::catalog::CatalogConfig;
use crate::core::policy::{MutabilityPolicy, PartnerField};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Rating given to a new partner when the draft does not set one.
pub const DEFAULT_RATING: i32 = 100;

/// Top-level structure of config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Rating assigned to new partners that do not specify one
    #[serde(default = "default_rating")]
    pub default_rating: i32,
    /// Which partner fields stay editable after creation
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Catalog data seeded into the store
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_rating: DEFAULT_RATING,
            policy: PolicyConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

const fn default_rating() -> i32 {
    DEFAULT_RATING
}

/// The `[policy]` section: either a named preset or an explicit field list.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PolicyConfig {
    /// `"full-edit"` or `"rating-only"`
    pub preset: Option<String>,
    /// Field names that cannot change once the partner exists
    pub immutable_after_creation: Option<Vec<String>>,
}

impl PolicyConfig {
    /// Resolves the section into a [`MutabilityPolicy`].
    ///
    /// An explicit field list wins over a preset. With neither, only the
    /// partner name is frozen.
    pub fn to_policy(&self) -> Result<MutabilityPolicy> {
        if let Some(fields) = &self.immutable_after_creation {
            let parsed = fields
                .iter()
                .map(|name| name.parse::<PartnerField>())
                .collect::<Result<Vec<_>>>()?;
            return Ok(MutabilityPolicy::from_fields(parsed));
        }

        match self.preset.as_deref() {
            None => Ok(MutabilityPolicy::default()),
            Some("full-edit") => Ok(MutabilityPolicy::full_edit()),
            Some("rating-only") => Ok(MutabilityPolicy::rating_only()),
            Some(other) => Err(Error::Config {
                message: format!("Unknown policy preset '{other}'"),
            }),
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {}: {e}", path_ref.display()),
    })
}

/// Loads the application configuration from the configured location.
///
/// Falls back to defaults when the file does not exist.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("PARTNER_REQUESTS_CONFIG").unwrap_or_else(|_| "config.toml".into());
    if !Path::new(&path).exists() {
        info!("No configuration file at {}, using defaults.", path);
        return Ok(AppConfig::default());
    }

    let config = load_config(&path)?;
    // Surface a bad policy at startup rather than on the first save
    config.policy.to_policy()?;
    info!(
        "Loaded configuration from {} ({} catalog products).",
        path,
        config.catalog.products.len()
    );
    Ok(config)
}

//! Front-end layer - command-line interface over the core operations.
//!
//! Mirrors the operator workflow of a form front end: a main list,
//! an edit form (a TOML draft file), deletion and a running-total quote.

/// Command definitions and handlers
pub mod commands;
/// Draft file parsing
pub mod draft;
/// Text rendering of reports and quotes
pub mod format;

use crate::{config::AppConfig, core::policy::MutabilityPolicy, errors::Result};
use sea_orm::DatabaseConnection;

/// Shared state available to every command.
/// Holds the store connection and the resolved configuration.
pub struct AppContext {
    /// Database connection for all store operations
    pub database: DatabaseConnection,
    /// Loaded application configuration
    pub config: AppConfig,
    /// Field mutability policy resolved from the configuration
    pub policy: MutabilityPolicy,
}

impl AppContext {
    /// Creates the context, resolving the mutability policy.
    ///
    /// # Errors
    /// Returns `Error::Config` if the policy section is invalid.
    pub fn new(database: DatabaseConnection, config: AppConfig) -> Result<Self> {
        let policy = config.policy.to_policy()?;
        Ok(Self {
            database,
            config,
            policy,
        })
    }
}

pub use commands::{Cli, Command, run};

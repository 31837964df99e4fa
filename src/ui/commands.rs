//! Command definitions and handlers.
//!
//! Each handler returns the text to show the operator; errors bubble up to
//! `main`, which reports them.

use crate::{
    core::{
        catalog::{list_catalog_entries, load_catalog},
        partner::delete_partner,
        pricing::price_lines,
        report::{get_request_detail, list_request_summaries},
        request::{SaveRequestArgs, SaveTarget, save_request},
        validation::{FormContext, RequiredFields},
    },
    errors::Result,
    ui::{AppContext, draft::DraftFile, format},
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Partner request registry.
#[derive(Debug, Parser)]
#[command(name = "partner-requests")]
#[command(about = "Record partner product requests and their costs")]
pub struct Cli {
    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Available operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every partner with requests and the request totals
    List,
    /// Show one partner with its priced request
    Show {
        /// Partner name
        partner: String,
    },
    /// Price a draft file without saving it
    Quote {
        /// Draft file (TOML)
        draft: PathBuf,
    },
    /// Validate and save a draft file
    Save {
        /// Draft file (TOML)
        draft: PathBuf,
        /// Edit the partner stored under this name instead of creating one
        #[arg(long)]
        existing: Option<String>,
        /// Treat the contact panel as open (checks address, phone and email)
        #[arg(long)]
        expanded: bool,
    },
    /// Delete a partner and all of its request lines
    Delete {
        /// Partner name
        partner: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List the product catalog with adjusted unit costs
    Products,
}

/// Runs a command against the application context.
#[instrument(skip(ctx))]
pub async fn run(ctx: &AppContext, command: Command) -> Result<String> {
    let db = &ctx.database;
    match command {
        Command::List => Ok(format::format_summary_list(
            &list_request_summaries(db).await?,
        )),
        Command::Show { partner } => Ok(format::format_detail(
            &get_request_detail(db, &partner).await?,
        )),
        Command::Quote { draft } => {
            let (_, lines) = DraftFile::load(&draft)?.into_parts(ctx.config.default_rating)?;
            match load_catalog(db).await.and_then(|catalog| catalog.quote(&lines)) {
                Ok(quote) => Ok(format::format_quote(&quote)),
                Err(e) => Ok(format!("Total: {} ({e})", price_lines(db, &lines).await)),
            }
        }
        Command::Save {
            draft,
            existing,
            expanded,
        } => {
            let (partner, lines) =
                DraftFile::load(&draft)?.into_parts(ctx.config.default_rating)?;
            let target = existing.map_or(SaveTarget::New, SaveTarget::Existing);
            let required = RequiredFields::for_context(FormContext {
                is_new: target == SaveTarget::New,
                contact_panel_expanded: expanded,
            });
            let saved = save_request(
                db,
                SaveRequestArgs {
                    target: &target,
                    draft: &partner,
                    lines: &lines,
                    required: &required,
                    policy: &ctx.policy,
                },
            )
            .await?;
            Ok(format!(
                "Saved request for '{}' ({} products).",
                saved.name,
                lines.len()
            ))
        }
        Command::Delete { partner, yes } => {
            if !yes {
                return Ok(format!(
                    "This deletes all requests of partner '{partner}'. Re-run with --yes to confirm."
                ));
            }
            let removed = delete_partner(db, &partner).await?;
            info!("Operator deleted partner '{}'.", partner);
            Ok(format!(
                "Deleted partner '{partner}' and {removed} request lines."
            ))
        }
        Command::Products => Ok(format::format_products(&list_catalog_entries(db).await?)),
    }
}

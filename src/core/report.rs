//! Main-list report generation.
//!
//! Produces one summary row per partner with requests. Functions here are
//! framework-agnostic and return structured data the front end formats.

use crate::{
    core::{
        catalog,
        partner::{PartnerType, get_partner, list_partners_with_requests},
        pricing::{CostOutcome, Quote, partner_total},
        request::get_request_lines,
    },
    entities::partner,
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// One row of the main list.
#[derive(Debug, Clone)]
pub struct RequestSummary {
    /// The stored partner
    pub partner: partner::Model,
    /// Parsed partner type
    pub partner_type: PartnerType,
    /// Total cost of the partner's request
    pub total: CostOutcome,
}

/// Builds the main list: one row per partner that has request lines.
pub async fn list_request_summaries(db: &DatabaseConnection) -> Result<Vec<RequestSummary>> {
    let partners = list_partners_with_requests(db).await?;
    let mut summaries = Vec::with_capacity(partners.len());
    for partner in partners {
        let total = partner_total(db, &partner.name).await;
        summaries.push(RequestSummary {
            partner_type: PartnerType::from_label(&partner.partner_type),
            partner,
            total,
        });
    }
    Ok(summaries)
}

/// A partner with its full request, as shown in the edit form.
#[derive(Debug, Clone)]
pub struct RequestDetail {
    /// The stored partner
    pub partner: partner::Model,
    /// Priced lines, or `None` when the catalog could not price them
    pub quote: Option<Quote>,
    /// Total cost of the request
    pub total: CostOutcome,
}

/// Loads a partner with its priced request.
///
/// # Errors
/// Returns `Error::PartnerNotFound` for an unknown partner.
pub async fn get_request_detail(db: &DatabaseConnection, name: &str) -> Result<RequestDetail> {
    let partner = get_partner(db, name)
        .await?
        .ok_or_else(|| Error::PartnerNotFound {
            name: name.to_string(),
        })?;
    let lines = get_request_lines(db, &partner.name).await?;

    let quote = match catalog::load_catalog(db).await {
        Ok(catalog) => catalog.quote(&lines).ok(),
        Err(_) => None,
    };
    let total = partner_total(db, &partner.name).await;

    Ok(RequestDetail {
        partner,
        quote,
        total,
    })
}

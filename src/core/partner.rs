//! Partner business logic - Partner attributes, lookups and deletion.
//!
//! A partner is keyed by its name. Creation and attribute updates happen in
//! the request save path (see [`crate::core::request`]); this module covers
//! everything else.

use crate::{
    core::policy::PartnerField,
    entities::{Partner, RequestLine, partner, request_line},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use std::fmt;
use tracing::{debug, info};

/// Kind of partner organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartnerType {
    /// Wholesale buyer
    Wholesale,
    /// Retail shop
    Retail,
    /// Online store
    OnlineStore,
    /// Anything else, with a user-supplied label
    Other(String),
}

impl PartnerType {
    /// Labels of the predefined choices, in picker order.
    pub const CHOICES: [&'static str; 4] = ["Wholesale", "Retail", "Online store", "Other"];

    /// The label stored in the database.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Wholesale => "Wholesale",
            Self::Retail => "Retail",
            Self::OnlineStore => "Online store",
            Self::Other(label) => label,
        }
    }

    /// Reads a stored label back; unknown labels become [`PartnerType::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Wholesale" => Self::Wholesale,
            "Retail" => Self::Retail,
            "Online store" => Self::OnlineStore,
            other => Self::Other(other.to_string()),
        }
    }

    /// Builds a type from a picker choice plus the optional custom label.
    ///
    /// Choices match case-insensitively. The custom label is only used for
    /// `"Other"`, where it may still be empty; validation reports that.
    pub fn from_choice(choice: &str, custom_label: Option<&str>) -> Result<Self> {
        match choice.trim().to_lowercase().as_str() {
            "wholesale" => Ok(Self::Wholesale),
            "retail" => Ok(Self::Retail),
            "online store" | "online-store" | "onlinestore" => Ok(Self::OnlineStore),
            "other" => Ok(Self::Other(custom_label.unwrap_or_default().trim().to_string())),
            _ => Err(Error::Config {
                message: format!(
                    "Unknown partner type '{choice}', expected one of: {}",
                    Self::CHOICES.join(", ")
                ),
            }),
        }
    }

    /// Whether this is a custom "other" type.
    #[must_use]
    pub const fn is_other(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl fmt::Display for PartnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Partner attributes as entered in the form, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerDraft {
    /// Partner name
    pub name: String,
    /// Partner type
    pub partner_type: PartnerType,
    /// Director's full name
    pub director: String,
    /// Contact e-mail
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Legal address
    pub address: String,
    /// Taxpayer identification number
    pub tax_id: String,
    /// Rating, validated to be non-negative
    pub rating: i32,
}

impl PartnerDraft {
    /// Copy with surrounding whitespace stripped from every text field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        let partner_type = match &self.partner_type {
            PartnerType::Other(label) => PartnerType::Other(label.trim().to_string()),
            other => other.clone(),
        };
        Self {
            name: self.name.trim().to_string(),
            partner_type,
            director: self.director.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            tax_id: self.tax_id.trim().to_string(),
            rating: self.rating,
        }
    }

    /// Whether `field` in this draft differs from the stored partner,
    /// ignoring surrounding whitespace.
    #[must_use]
    pub fn differs_from(&self, stored: &partner::Model, field: PartnerField) -> bool {
        match field {
            PartnerField::Name => self.name.trim() != stored.name,
            PartnerField::PartnerType => {
                self.partner_type.label().trim() != stored.partner_type.trim()
            }
            PartnerField::Director => self.director.trim() != stored.director,
            PartnerField::Email => self.email.trim() != stored.email,
            PartnerField::Phone => self.phone.trim() != stored.phone,
            PartnerField::Address => self.address.trim() != stored.address,
            PartnerField::TaxId => self.tax_id.trim() != stored.tax_id,
            PartnerField::Rating => self.rating != stored.rating,
        }
    }
}

impl From<&partner::Model> for PartnerDraft {
    fn from(model: &partner::Model) -> Self {
        Self {
            name: model.name.clone(),
            partner_type: PartnerType::from_label(&model.partner_type),
            director: model.director.clone(),
            email: model.email.clone(),
            phone: model.phone.clone(),
            address: model.address.clone(),
            tax_id: model.tax_id.clone(),
            rating: model.rating,
        }
    }
}

/// Finds a partner by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_partner<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<partner::Model>> {
    Partner::find_by_id(name.trim())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every partner that has at least one request line, ordered by name.
///
/// This backs the main list: partners without requests are not shown.
pub async fn list_partners_with_requests(db: &DatabaseConnection) -> Result<Vec<partner::Model>> {
    let partners = Partner::find()
        .inner_join(RequestLine)
        .distinct()
        .order_by_asc(partner::Column::Name)
        .all(db)
        .await?;
    debug!("Found {} partners with requests.", partners.len());
    Ok(partners)
}

/// Deletes a partner together with all of its request lines.
///
/// Both deletes run in one transaction. Returns the number of request lines
/// removed.
///
/// # Errors
/// Returns `Error::PartnerNotFound` if no such partner exists; nothing is
/// deleted in that case.
pub async fn delete_partner(db: &DatabaseConnection, name: &str) -> Result<u64> {
    let name = name.trim();
    let txn = db.begin().await?;

    let lines = RequestLine::delete_many()
        .filter(request_line::Column::PartnerName.eq(name))
        .exec(&txn)
        .await?;

    let partners = Partner::delete_by_id(name).exec(&txn).await?;
    if partners.rows_affected == 0 {
        // Dropping the transaction rolls back the line delete
        return Err(Error::PartnerNotFound {
            name: name.to_string(),
        });
    }

    txn.commit().await?;
    info!(
        "Deleted partner '{}' and {} request lines.",
        name, lines.rows_affected
    );
    Ok(lines.rows_affected)
}

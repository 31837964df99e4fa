//! Draft files - the edit form in TOML form.
//!
//! ```toml
//! [partner]
//! name = "Romashka"
//! partner_type = "Other"
//! custom_type = "Dealer"
//! director = "Ivanov Ivan"
//! tax_id = "1234567890"
//! address = "Moscow, Lenina 1"
//! phone = "+7 900 000 00 00"
//! email = "info@romashka.example"
//! rating = 100
//!
//! [[lines]]
//! product = "Bolt"
//! quantity = 3
//! ```

use crate::{
    core::{
        partner::{PartnerDraft, PartnerType},
        request::RequestLines,
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Parsed draft file.
#[derive(Debug, Deserialize)]
pub struct DraftFile {
    /// Partner attributes
    pub partner: PartnerSection,
    /// Requested products
    #[serde(default)]
    pub lines: Vec<LineSection>,
}

/// The `[partner]` table.
#[derive(Debug, Deserialize)]
pub struct PartnerSection {
    /// Partner name
    #[serde(default)]
    pub name: String,
    /// One of the partner type choices
    pub partner_type: String,
    /// Label for the "Other" type
    pub custom_type: Option<String>,
    /// Director's full name
    #[serde(default)]
    pub director: String,
    /// Taxpayer identification number
    #[serde(default)]
    pub tax_id: String,
    /// Legal address
    #[serde(default)]
    pub address: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Contact e-mail
    #[serde(default)]
    pub email: String,
    /// Rating; the configured default when absent
    pub rating: Option<i32>,
}

/// One `[[lines]]` entry.
#[derive(Debug, Deserialize)]
pub struct LineSection {
    /// Product name
    pub product: String,
    /// Requested quantity
    pub quantity: i64,
}

impl DraftFile {
    /// Parses a draft from TOML text.
    ///
    /// # Errors
    /// Returns `Error::Config` for malformed TOML.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse draft: {e}"),
        })
    }

    /// Reads and parses a draft file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&contents)
    }

    /// Splits the draft into partner attributes and a line set.
    ///
    /// # Errors
    /// Returns `Error::Config` for an unknown partner type,
    /// `Error::InvalidQuantity` or `Error::DuplicateLine` for bad lines.
    pub fn into_parts(self, default_rating: i32) -> Result<(PartnerDraft, RequestLines)> {
        let p = self.partner;
        let draft = PartnerDraft {
            partner_type: PartnerType::from_choice(&p.partner_type, p.custom_type.as_deref())?,
            name: p.name,
            director: p.director,
            email: p.email,
            phone: p.phone,
            address: p.address,
            tax_id: p.tax_id,
            rating: p.rating.unwrap_or(default_rating),
        };

        let mut lines = RequestLines::new();
        for line in self.lines {
            let quantity = u32::try_from(line.quantity).map_err(|_| Error::InvalidQuantity {
                quantity: line.quantity,
            })?;
            lines.add(line.product, quantity)?;
        }
        Ok((draft, lines))
    }
}

//! Partner field mutability policy.
//!
//! Which partner attributes may change after the partner has been created is
//! a configuration choice, expressed as an explicit set of frozen fields.
//! The save path consults the policy before touching the store.

use crate::{
    core::partner::PartnerDraft,
    entities::partner,
    errors::{Error, Result},
};
use std::{collections::BTreeSet, fmt, str::FromStr};

/// A single editable partner attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartnerField {
    /// Partner name (the record key)
    Name,
    /// Partner type, including a custom label
    PartnerType,
    /// Director's full name
    Director,
    /// Contact e-mail
    Email,
    /// Contact phone
    Phone,
    /// Legal address
    Address,
    /// Taxpayer identification number
    TaxId,
    /// Partner rating
    Rating,
}

impl PartnerField {
    /// Every partner field, in form order.
    pub const ALL: [Self; 8] = [
        Self::PartnerType,
        Self::Name,
        Self::Director,
        Self::TaxId,
        Self::Address,
        Self::Phone,
        Self::Email,
        Self::Rating,
    ];

    /// Configuration name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PartnerType => "partner_type",
            Self::Director => "director",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::TaxId => "tax_id",
            Self::Rating => "rating",
        }
    }
}

impl fmt::Display for PartnerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartnerField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| Error::Config {
                message: format!("Unknown partner field '{s}'"),
            })
    }
}

/// The set of partner fields frozen once the partner exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutabilityPolicy {
    immutable: BTreeSet<PartnerField>,
}

impl Default for MutabilityPolicy {
    /// Only the name is frozen.
    fn default() -> Self {
        Self::from_fields([PartnerField::Name])
    }
}

impl MutabilityPolicy {
    /// Builds a policy freezing exactly `fields`.
    pub fn from_fields(fields: impl IntoIterator<Item = PartnerField>) -> Self {
        Self {
            immutable: fields.into_iter().collect(),
        }
    }

    /// Every attribute, the name included, stays editable.
    #[must_use]
    pub fn full_edit() -> Self {
        Self::from_fields([])
    }

    /// Only the rating can change after creation.
    #[must_use]
    pub fn rating_only() -> Self {
        Self::from_fields(
            PartnerField::ALL
                .into_iter()
                .filter(|field| *field != PartnerField::Rating),
        )
    }

    /// Whether `field` is frozen after creation.
    #[must_use]
    pub fn is_immutable(&self, field: PartnerField) -> bool {
        self.immutable.contains(&field)
    }

    /// The frozen fields.
    #[must_use]
    pub const fn immutable_fields(&self) -> &BTreeSet<PartnerField> {
        &self.immutable
    }

    /// Returns the frozen fields whose draft value differs from the stored one.
    #[must_use]
    pub fn violations(&self, stored: &partner::Model, draft: &PartnerDraft) -> Vec<PartnerField> {
        self.immutable
            .iter()
            .copied()
            .filter(|field| draft.differs_from(stored, *field))
            .collect()
    }

    /// Like [`Self::violations`], but as an error when anything changed.
    pub fn check(&self, stored: &partner::Model, draft: &PartnerDraft) -> Result<()> {
        let violations = self.violations(stored, draft);
        if violations.is_empty() {
            return Ok(());
        }
        Err(Error::ImmutableField {
            fields: violations.iter().map(ToString::to_string).collect(),
        })
    }
}

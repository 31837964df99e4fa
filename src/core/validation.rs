//! Partner attribute validation.
//!
//! Rules are parameterised by an explicit [`RequiredFields`] set derived from
//! the editing context, and every violated rule is reported at once.

use crate::core::{
    partner::{PartnerDraft, PartnerType},
    policy::PartnerField,
};
use std::collections::BTreeSet;

/// Number of digits in a taxpayer identification number.
pub const TAX_ID_LENGTH: usize = 10;

/// Where the draft is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormContext {
    /// The partner does not exist yet
    pub is_new: bool,
    /// The contact panel (address, phone, e-mail) is open
    pub contact_panel_expanded: bool,
}

/// Fields whose rules apply to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFields {
    fields: BTreeSet<PartnerField>,
}

impl RequiredFields {
    /// Every field is checked.
    #[must_use]
    pub fn all() -> Self {
        Self::from_fields(PartnerField::ALL)
    }

    /// Checks exactly `fields`.
    pub fn from_fields(fields: impl IntoIterator<Item = PartnerField>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Identity fields are always checked. Contact fields are checked for a
    /// new partner, or for an existing one when the contact panel is open.
    #[must_use]
    pub fn for_context(context: FormContext) -> Self {
        if context.is_new || context.contact_panel_expanded {
            return Self::all();
        }
        Self::from_fields([
            PartnerField::PartnerType,
            PartnerField::Name,
            PartnerField::Director,
            PartnerField::TaxId,
            PartnerField::Rating,
        ])
    }

    /// Whether the rules for `field` apply.
    #[must_use]
    pub fn contains(&self, field: PartnerField) -> bool {
        self.fields.contains(&field)
    }
}

/// Validates `draft` against the rules of the `required` fields.
///
/// Returns one message per violated rule, in form order; an empty list means
/// the draft is valid.
#[must_use]
pub fn validate(draft: &PartnerDraft, required: &RequiredFields) -> Vec<String> {
    let mut errors = Vec::new();

    if required.contains(PartnerField::PartnerType)
        && draft.partner_type.is_other()
        && draft.partner_type.label().trim().is_empty()
    {
        errors.push("Specify the partner type".to_string());
    }

    // A custom label equal to a predefined one would read back as that type
    if draft.partner_type.is_other()
        && !PartnerType::from_label(draft.partner_type.label()).is_other()
    {
        errors.push("Custom partner type cannot repeat a predefined type".to_string());
    }

    if required.contains(PartnerField::Name) && draft.name.trim().is_empty() {
        errors.push("Partner name cannot be empty".to_string());
    }

    if required.contains(PartnerField::Director) && draft.director.trim().is_empty() {
        errors.push("Director name cannot be empty".to_string());
    }

    if required.contains(PartnerField::TaxId) {
        let tax_id = draft.tax_id.trim();
        if tax_id.is_empty() {
            errors.push("Tax ID cannot be empty".to_string());
        } else if !is_valid_tax_id(tax_id) {
            errors.push(format!("Tax ID must consist of {TAX_ID_LENGTH} digits"));
        }
    }

    if required.contains(PartnerField::Address) && draft.address.trim().is_empty() {
        errors.push("Legal address cannot be empty".to_string());
    }

    if required.contains(PartnerField::Phone) && draft.phone.trim().is_empty() {
        errors.push("Phone cannot be empty".to_string());
    }

    if required.contains(PartnerField::Email) {
        let email = draft.email.trim();
        if email.is_empty() {
            errors.push("Email cannot be empty".to_string());
        } else if !is_plausible_email(email) {
            errors.push("Email format is invalid".to_string());
        }
    }

    if required.contains(PartnerField::Rating) && draft.rating < 0 {
        errors.push("Rating must be a non-negative number".to_string());
    }

    errors
}

/// Exactly [`TAX_ID_LENGTH`] ASCII digits.
#[must_use]
pub fn is_valid_tax_id(tax_id: &str) -> bool {
    tax_id.len() == TAX_ID_LENGTH && tax_id.bytes().all(|b| b.is_ascii_digit())
}

/// Loose check: an "@" and a "." somewhere.
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::partner::PartnerType;
    use crate::test_utils::sample_draft;

    #[test]
    fn test_valid_draft_has_no_errors() {
        let draft = sample_draft("Romashka");
        assert!(validate(&draft, &RequiredFields::all()).is_empty());
    }

    #[test]
    fn test_reports_all_errors_at_once() {
        let mut draft = sample_draft("");
        draft.director = "   ".to_string();
        draft.tax_id = "12345".to_string();
        draft.email = "not-an-email".to_string();
        draft.rating = -1;
        draft.partner_type = PartnerType::Other(String::new());

        let errors = validate(&draft, &RequiredFields::all());
        assert_eq!(
            errors,
            vec![
                "Specify the partner type",
                "Partner name cannot be empty",
                "Director name cannot be empty",
                "Tax ID must consist of 10 digits",
                "Email format is invalid",
                "Rating must be a non-negative number",
            ]
        );
    }

    #[test]
    fn test_custom_type_must_not_shadow_a_predefined_one() {
        let mut draft = sample_draft("Romashka");
        draft.partner_type = PartnerType::Other(" Retail ".to_string());
        assert_eq!(
            validate(&draft, &RequiredFields::all()),
            vec!["Custom partner type cannot repeat a predefined type"]
        );

        draft.partner_type = PartnerType::Other("Dealer".to_string());
        assert!(validate(&draft, &RequiredFields::all()).is_empty());
    }

    #[test]
    fn test_tax_id_rules() {
        assert!(is_valid_tax_id("1234567890"));
        assert!(!is_valid_tax_id("123456789"));
        assert!(!is_valid_tax_id("12345678901"));
        assert!(!is_valid_tax_id("123456789O"));
        assert!(!is_valid_tax_id("12345 6789"));
        // Non-ASCII digits are rejected too
        assert!(!is_valid_tax_id("١٢٣٤٥٦٧٨٩٠"));

        let mut draft = sample_draft("Romashka");
        draft.tax_id = "   ".to_string();
        assert_eq!(
            validate(&draft, &RequiredFields::all()),
            vec!["Tax ID cannot be empty"]
        );
    }

    #[test]
    fn test_email_heuristic() {
        assert!(is_plausible_email("a@b.c"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("a.b"));
    }

    #[test]
    fn test_contact_fields_follow_context() {
        let mut draft = sample_draft("Romashka");
        draft.address = String::new();
        draft.phone = String::new();
        draft.email = String::new();

        let collapsed = RequiredFields::for_context(FormContext {
            is_new: false,
            contact_panel_expanded: false,
        });
        assert!(validate(&draft, &collapsed).is_empty());

        let expanded = RequiredFields::for_context(FormContext {
            is_new: false,
            contact_panel_expanded: true,
        });
        assert_eq!(validate(&draft, &expanded).len(), 3);

        let new_partner = RequiredFields::for_context(FormContext {
            is_new: true,
            contact_panel_expanded: false,
        });
        assert_eq!(
            validate(&draft, &new_partner),
            vec![
                "Legal address cannot be empty",
                "Phone cannot be empty",
                "Email cannot be empty",
            ]
        );
    }

    #[test]
    fn test_identity_fields_are_always_required() {
        let mut draft = sample_draft("Romashka");
        draft.tax_id = "abc".to_string();
        let collapsed = RequiredFields::for_context(FormContext::default());
        assert_eq!(
            validate(&draft, &collapsed),
            vec!["Tax ID must consist of 10 digits"]
        );
    }
}

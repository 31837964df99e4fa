//! Partner request business logic - Line sets and the save transaction.
//!
//! A partner's request is a set of (product, quantity) lines. Saving validates
//! the partner attributes first, then writes the partner and replaces its
//! whole line set inside one database transaction: either every write
//! commits, or none does.

use crate::{
    core::{
        partner::PartnerDraft,
        policy::MutabilityPolicy,
        validation::{RequiredFields, validate},
    },
    entities::{Partner, Product, RequestLine, partner, request_line},
    errors::{Error, Result},
};
use sea_orm::{
    DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Largest quantity a single line may request.
pub const MAX_QUANTITY: u32 = 1_000_000;

/// A partner's requested products, keyed by product name.
///
/// Each product appears at most once; iteration is in product-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLines {
    items: BTreeMap<String, u32>,
}

impl RequestLines {
    /// An empty line set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product line.
    ///
    /// # Errors
    /// Returns `Error::DuplicateLine` if the product is already present and
    /// `Error::InvalidQuantity` unless `1 <= quantity <= MAX_QUANTITY`.
    pub fn add(&mut self, product: impl Into<String>, quantity: u32) -> Result<()> {
        check_quantity(quantity)?;
        let product = product.into().trim().to_string();
        if self.items.contains_key(&product) {
            return Err(Error::DuplicateLine { product });
        }
        self.items.insert(product, quantity);
        Ok(())
    }

    /// Changes the quantity of an existing line.
    ///
    /// # Errors
    /// Returns `Error::ProductNotFound` if the product has no line and
    /// `Error::InvalidQuantity` for an out-of-range quantity.
    pub fn set_quantity(&mut self, product: &str, quantity: u32) -> Result<()> {
        check_quantity(quantity)?;
        let slot = self
            .items
            .get_mut(product.trim())
            .ok_or_else(|| Error::ProductNotFound {
                name: product.to_string(),
            })?;
        *slot = quantity;
        Ok(())
    }

    /// Removes a line, returning its quantity.
    pub fn remove(&mut self, product: &str) -> Option<u32> {
        self.items.remove(product.trim())
    }

    /// Quantity requested for `product`.
    #[must_use]
    pub fn quantity(&self, product: &str) -> Option<u32> {
        self.items.get(product.trim()).copied()
    }

    /// Lines in product-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(product, qty)| (product.as_str(), *qty))
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn check_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 || quantity > MAX_QUANTITY {
        return Err(Error::InvalidQuantity {
            quantity: i64::from(quantity),
        });
    }
    Ok(())
}

/// Loads the stored line set of a partner.
///
/// An unknown partner simply has no lines.
pub async fn get_request_lines<C: ConnectionTrait>(db: &C, partner_name: &str) -> Result<RequestLines> {
    let rows = RequestLine::find()
        .filter(request_line::Column::PartnerName.eq(partner_name))
        .order_by_asc(request_line::Column::ProductName)
        .all(db)
        .await?;

    let mut lines = RequestLines::new();
    for row in rows {
        let quantity = u32::try_from(row.quantity).map_err(|_| Error::InvalidQuantity {
            quantity: i64::from(row.quantity),
        })?;
        lines.add(row.product_name, quantity)?;
    }
    debug!(
        "Loaded {} request lines for partner '{}'.",
        lines.len(),
        partner_name
    );
    Ok(lines)
}

/// Whether the save creates a partner or edits a stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// Create a partner from the draft
    New,
    /// Edit the partner currently stored under this name
    Existing(String),
}

/// Everything a save needs.
#[derive(Debug, Clone, Copy)]
pub struct SaveRequestArgs<'a> {
    /// New or existing partner
    pub target: &'a SaveTarget,
    /// Partner attributes
    pub draft: &'a PartnerDraft,
    /// The complete line set that replaces the stored one
    pub lines: &'a RequestLines,
    /// Fields whose validation rules apply
    pub required: &'a RequiredFields,
    /// Which fields an existing partner may change
    pub policy: &'a MutabilityPolicy,
}

/// Validates and saves a partner request.
///
/// Validation failures and an empty line set are reported before the store
/// is touched. All writes then happen in one transaction; any failure rolls
/// every write back. Returns the partner as stored.
///
/// # Errors
/// - `Error::Validation` with every violated rule
/// - `Error::EmptyRequest` when there are no lines
/// - `Error::PartnerExists` when creating (or renaming to) a taken name
/// - `Error::PartnerNotFound` when editing a partner that does not exist
/// - `Error::ImmutableField` when the policy freezes a changed field
/// - `Error::ProductNotFound` when a line references an unknown product
/// - `Error::Database` for store failures
#[instrument(skip(db, args), fields(save_target = ?args.target, partner = %args.draft.name.trim()))]
pub async fn save_request(db: &DatabaseConnection, args: SaveRequestArgs<'_>) -> Result<partner::Model> {
    let errors = validate(args.draft, args.required);
    if !errors.is_empty() {
        return Err(Error::Validation { errors });
    }
    if args.lines.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let draft = args.draft.trimmed();
    let txn = db.begin().await?;

    match args.target {
        SaveTarget::New => insert_partner(&txn, &draft).await?,
        SaveTarget::Existing(original_name) => {
            update_partner(&txn, original_name, &draft, args.policy).await?;
        }
    }

    replace_lines(&txn, &draft.name, args.lines).await?;

    let saved = Partner::find_by_id(draft.name.as_str())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::PartnerNotFound {
            name: draft.name.clone(),
        })?;

    txn.commit().await?;
    info!(
        "Saved request for partner '{}' with {} lines.",
        saved.name,
        args.lines.len()
    );
    Ok(saved)
}

async fn insert_partner(txn: &DatabaseTransaction, draft: &PartnerDraft) -> Result<()> {
    if Partner::find_by_id(draft.name.as_str()).one(txn).await?.is_some() {
        return Err(Error::PartnerExists {
            name: draft.name.clone(),
        });
    }

    let now = chrono::Utc::now().naive_utc();
    partner::ActiveModel {
        name: Set(draft.name.clone()),
        partner_type: Set(draft.partner_type.label().to_string()),
        director: Set(draft.director.clone()),
        email: Set(draft.email.clone()),
        phone: Set(draft.phone.clone()),
        address: Set(draft.address.clone()),
        tax_id: Set(draft.tax_id.clone()),
        rating: Set(draft.rating),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;
    info!("Created partner '{}'.", draft.name);
    Ok(())
}

async fn update_partner(
    txn: &DatabaseTransaction,
    original_name: &str,
    draft: &PartnerDraft,
    policy: &MutabilityPolicy,
) -> Result<()> {
    let original_name = original_name.trim();
    let stored = Partner::find_by_id(original_name)
        .one(txn)
        .await?
        .ok_or_else(|| Error::PartnerNotFound {
            name: original_name.to_string(),
        })?;

    policy.check(&stored, draft)?;

    let renamed = draft.name != stored.name;
    if renamed && Partner::find_by_id(draft.name.as_str()).one(txn).await?.is_some() {
        return Err(Error::PartnerExists {
            name: draft.name.clone(),
        });
    }

    // Lines reference the partner by name, so clear them before a rename
    RequestLine::delete_many()
        .filter(request_line::Column::PartnerName.eq(original_name))
        .exec(txn)
        .await?;

    Partner::update_many()
        .col_expr(partner::Column::Name, Expr::value(draft.name.clone()))
        .col_expr(
            partner::Column::PartnerType,
            Expr::value(draft.partner_type.label().to_string()),
        )
        .col_expr(partner::Column::Director, Expr::value(draft.director.clone()))
        .col_expr(partner::Column::Email, Expr::value(draft.email.clone()))
        .col_expr(partner::Column::Phone, Expr::value(draft.phone.clone()))
        .col_expr(partner::Column::Address, Expr::value(draft.address.clone()))
        .col_expr(partner::Column::TaxId, Expr::value(draft.tax_id.clone()))
        .col_expr(partner::Column::Rating, Expr::value(draft.rating))
        .col_expr(
            partner::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(partner::Column::Name.eq(original_name))
        .exec(txn)
        .await?;

    if renamed {
        info!("Renamed partner '{}' to '{}'.", original_name, draft.name);
    } else {
        info!("Updated partner '{}'.", draft.name);
    }
    Ok(())
}

async fn replace_lines(
    txn: &DatabaseTransaction,
    partner_name: &str,
    lines: &RequestLines,
) -> Result<()> {
    let removed = RequestLine::delete_many()
        .filter(request_line::Column::PartnerName.eq(partner_name))
        .exec(txn)
        .await?;
    debug!(
        "Removed {} previous lines for '{}'.",
        removed.rows_affected, partner_name
    );

    for (product_name, quantity) in lines.iter() {
        if Product::find_by_id(product_name).one(txn).await?.is_none() {
            return Err(Error::ProductNotFound {
                name: product_name.to_string(),
            });
        }
        let quantity = i32::try_from(quantity).map_err(|_| Error::InvalidQuantity {
            quantity: i64::from(quantity),
        })?;
        request_line::ActiveModel {
            partner_name: Set(partner_name.to_string()),
            product_name: Set(product_name.to_string()),
            quantity: Set(quantity),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{
        partner::{PartnerType, get_partner},
        pricing::partner_total,
    };
    use crate::test_utils::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn lines(items: &[(&str, u32)]) -> RequestLines {
        let mut lines = RequestLines::new();
        for (product, quantity) in items {
            lines.add(*product, *quantity).unwrap();
        }
        lines
    }

    #[test]
    fn test_request_lines_reject_duplicates() {
        let mut lines = RequestLines::new();
        lines.add("Bolt", 3).unwrap();

        let result = lines.add(" Bolt ", 5);
        assert!(matches!(result, Err(Error::DuplicateLine { product }) if product == "Bolt"));
        assert_eq!(lines.quantity("Bolt"), Some(3));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_request_lines_quantity_bounds() {
        let mut lines = RequestLines::new();
        assert!(matches!(
            lines.add("Bolt", 0),
            Err(Error::InvalidQuantity { quantity: 0 })
        ));
        assert!(lines.add("Bolt", MAX_QUANTITY + 1).is_err());
        lines.add("Bolt", MAX_QUANTITY).unwrap();

        lines.set_quantity("Bolt", 7).unwrap();
        assert_eq!(lines.quantity("Bolt"), Some(7));
        assert!(lines.set_quantity("Bolt", 0).is_err());
        assert!(matches!(
            lines.set_quantity("Nut", 1),
            Err(Error::ProductNotFound { .. })
        ));

        assert_eq!(lines.remove("Bolt"), Some(7));
        assert!(lines.is_empty());
    }

    #[test]
    fn test_request_lines_iterate_in_name_order() {
        let lines = lines(&[("Plank", 1), ("Bolt", 2), ("Nut", 3)]);
        let order: Vec<_> = lines.iter().collect();
        assert_eq!(order, vec![("Bolt", 2), ("Nut", 3), ("Plank", 1)]);
    }

    #[tokio::test]
    async fn test_validation_failure_does_not_touch_store() -> Result<()> {
        // A mock with no prepared results fails on any query
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let mut draft = sample_draft("Romashka");
        draft.tax_id = "123".to_string();

        let result = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::New,
                draft: &draft,
                lines: &lines(&[("Bolt", 1)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::default(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { errors }) if errors.len() == 1));
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let result = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::New,
                draft: &sample_draft("Romashka"),
                lines: &RequestLines::new(),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::default(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::EmptyRequest)));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_new_partner() -> Result<()> {
        let db = setup_with_catalog().await?;
        let draft = sample_draft("  Romashka ");

        let saved = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::New,
                draft: &draft,
                lines: &lines(&[("Bolt", 3), ("Plank", 2)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::default(),
            },
        )
        .await?;

        assert_eq!(saved.name, "Romashka");
        assert_eq!(saved.partner_type, "Wholesale");
        assert_eq!(saved.rating, 100);

        let stored = get_request_lines(&db, "Romashka").await?;
        assert_eq!(stored, lines(&[("Bolt", 3), ("Plank", 2)]));
        assert_eq!(
            partner_total(&db, "Romashka").await.total(),
            Some(Decimal::new(3850, 2))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_save_new_partner_with_taken_name_changes_nothing() -> Result<()> {
        let db = setup_with_catalog().await?;
        create_test_partner(&db, "Romashka", &[("Bolt", 3)]).await?;

        let mut draft = sample_draft("Romashka");
        draft.director = "Somebody Else".to_string();
        let result = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::New,
                draft: &draft,
                lines: &lines(&[("Nut", 50)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::default(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::PartnerExists { name }) if name == "Romashka"));

        let stored = get_partner(&db, "Romashka").await?.unwrap();
        assert_eq!(stored.director, "Ivanov Ivan");
        assert_eq!(
            get_request_lines(&db, "Romashka").await?,
            lines(&[("Bolt", 3)])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_save_existing_replaces_all_lines() -> Result<()> {
        let db = setup_with_catalog().await?;
        create_test_partner(&db, "Romashka", &[("Bolt", 3), ("Nut", 10)]).await?;

        let mut draft = sample_draft("Romashka");
        draft.rating = 7;
        draft.email = "sales@romashka.example".to_string();
        let saved = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::Existing("Romashka".to_string()),
                draft: &draft,
                lines: &lines(&[("Plank", 4)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::default(),
            },
        )
        .await?;

        assert_eq!(saved.rating, 7);
        assert_eq!(saved.email, "sales@romashka.example");
        assert!(saved.updated_at >= saved.created_at);
        assert_eq!(
            get_request_lines(&db, "Romashka").await?,
            lines(&[("Plank", 4)])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_save_existing_respects_policy() -> Result<()> {
        let db = setup_with_catalog().await?;
        create_test_partner(&db, "Romashka", &[("Bolt", 3)]).await?;

        let mut draft = sample_draft("Romashka");
        draft.director = "Petrov Petr".to_string();
        draft.rating = 1;
        let result = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::Existing("Romashka".to_string()),
                draft: &draft,
                lines: &lines(&[("Nut", 1)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::rating_only(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::ImmutableField { fields }) if fields == vec!["director"]));

        let stored = get_partner(&db, "Romashka").await?.unwrap();
        assert_eq!(stored.director, "Ivanov Ivan");
        assert_eq!(stored.rating, 100);
        assert_eq!(
            get_request_lines(&db, "Romashka").await?,
            lines(&[("Bolt", 3)])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rename_under_full_edit() -> Result<()> {
        let db = setup_with_catalog().await?;
        create_test_partner(&db, "Romashka", &[("Bolt", 3)]).await?;
        create_test_partner(&db, "Vasilek", &[("Nut", 1)]).await?;

        // Renaming onto a taken name fails
        let taken = sample_draft("Vasilek");
        let result = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::Existing("Romashka".to_string()),
                draft: &taken,
                lines: &lines(&[("Bolt", 3)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::full_edit(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::PartnerExists { .. })));

        let mut draft = sample_draft("Romashka Plus");
        draft.partner_type = PartnerType::Retail;
        let saved = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::Existing("Romashka".to_string()),
                draft: &draft,
                lines: &lines(&[("Bolt", 5)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::full_edit(),
            },
        )
        .await?;
        assert_eq!(saved.name, "Romashka Plus");
        assert_eq!(saved.partner_type, "Retail");

        assert!(get_partner(&db, "Romashka").await?.is_none());
        assert!(get_request_lines(&db, "Romashka").await?.is_empty());
        assert_eq!(
            get_request_lines(&db, "Romashka Plus").await?,
            lines(&[("Bolt", 5)])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_everything() -> Result<()> {
        let db = setup_with_catalog().await?;
        create_test_partner(&db, "Romashka", &[("Bolt", 3), ("Nut", 10)]).await?;

        let mut draft = sample_draft("Romashka");
        draft.rating = 999;
        let result = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::Existing("Romashka".to_string()),
                draft: &draft,
                lines: &lines(&[("Plank", 1), ("Widget", 2)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::default(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::ProductNotFound { name }) if name == "Widget"));

        let stored = get_partner(&db, "Romashka").await?.unwrap();
        assert_eq!(stored.rating, 100);
        assert_eq!(
            get_request_lines(&db, "Romashka").await?,
            lines(&[("Bolt", 3), ("Nut", 10)])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_target_name_is_trimmed() -> Result<()> {
        let db = setup_with_catalog().await?;
        create_test_partner(&db, "Romashka", &[("Bolt", 3)]).await?;

        let mut draft = sample_draft("Romashka");
        draft.rating = 42;
        let saved = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::Existing(" Romashka ".to_string()),
                draft: &draft,
                lines: &lines(&[("Nut", 2)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::default(),
            },
        )
        .await?;
        assert_eq!(saved.name, "Romashka");
        assert_eq!(saved.rating, 42);
        assert_eq!(
            get_request_lines(&db, "Romashka").await?,
            lines(&[("Nut", 2)])
        );
        Ok(())
    }

    #[test]
    fn test_invalid_quantity_message_names_the_range() {
        let message = RequestLines::new().add("Bolt", 0).unwrap_err().to_string();
        assert_eq!(
            message,
            "Invalid quantity: 0 (must be between 1 and 1000000)"
        );
    }

    #[tokio::test]
    async fn test_edit_missing_partner() -> Result<()> {
        let db = setup_with_catalog().await?;
        let result = save_request(
            &db,
            SaveRequestArgs {
                target: &SaveTarget::Existing("Ghost".to_string()),
                draft: &sample_draft("Ghost"),
                lines: &lines(&[("Bolt", 1)]),
                required: &RequiredFields::all(),
                policy: &MutabilityPolicy::default(),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::PartnerNotFound { name }) if name == "Ghost"));
        assert!(get_partner(&db, "Ghost").await?.is_none());
        Ok(())
    }
}

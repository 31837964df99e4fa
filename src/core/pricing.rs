//! Cost calculation.
//!
//! A line costs `min_partner_cost * (1 + defect_percent / 100) * quantity`,
//! where a product type without a defect rate carries no surcharge. A total is
//! the sum of its lines rounded to two decimal places and floored at zero.
//!
//! Pricing degrades in two steps: when the defect-aware catalog cannot be
//! loaded, lines are priced at their base cost; when that fails too the result
//! is [`CostOutcome::Unavailable`], never a made-up zero.

use crate::{
    core::{catalog, request::RequestLines},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, fmt};
use tracing::warn;

/// How a catalog prices its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingBasis {
    /// Base cost plus the material defect surcharge
    DefectAdjusted,
    /// Base cost only; defect rates could not be loaded
    BaseOnly,
}

/// Price data for a single product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPrice {
    /// Minimum unit cost for a partner
    pub min_partner_cost: Decimal,
    /// Product type, selects the defect rate
    pub product_type: String,
}

/// In-memory snapshot of the pricing-relevant catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: HashMap<String, ProductPrice>,
    defect_rates: HashMap<String, Decimal>,
    basis: PricingBasis,
}

impl Catalog {
    /// Catalog that applies defect surcharges.
    #[must_use]
    pub fn new(
        products: HashMap<String, ProductPrice>,
        defect_rates: HashMap<String, Decimal>,
    ) -> Self {
        Self {
            products,
            defect_rates,
            basis: PricingBasis::DefectAdjusted,
        }
    }

    /// Catalog that prices at base cost.
    #[must_use]
    pub fn base_only(products: HashMap<String, ProductPrice>) -> Self {
        Self {
            products,
            defect_rates: HashMap::new(),
            basis: PricingBasis::BaseOnly,
        }
    }

    /// How this catalog prices lines.
    #[must_use]
    pub const fn basis(&self) -> PricingBasis {
        self.basis
    }

    /// Price data for `product`, if catalogued.
    #[must_use]
    pub fn product(&self, product: &str) -> Option<&ProductPrice> {
        self.products.get(product)
    }

    /// Surcharge percentage for a product type; 0 when no rate is defined.
    #[must_use]
    pub fn defect_percent(&self, product_type: &str) -> Decimal {
        match self.basis {
            PricingBasis::DefectAdjusted => self
                .defect_rates
                .get(product_type)
                .copied()
                .unwrap_or(Decimal::ZERO),
            PricingBasis::BaseOnly => Decimal::ZERO,
        }
    }

    /// Unit cost of `product` including any surcharge.
    ///
    /// # Errors
    /// Returns `Error::ProductNotFound` if the product is not catalogued and
    /// `Error::CostOverflow` if the result does not fit a `Decimal`.
    pub fn unit_cost(&self, product: &str) -> Result<Decimal> {
        let price = self.product(product).ok_or_else(|| Error::ProductNotFound {
            name: product.to_string(),
        })?;
        adjusted_unit_cost(
            price.min_partner_cost,
            self.defect_percent(&price.product_type),
        )
        .ok_or_else(|| overflow(product))
    }

    /// Cost of `quantity` units of `product`.
    ///
    /// # Errors
    /// Returns `Error::ProductNotFound` if the product is not catalogued and
    /// `Error::CostOverflow` if the result does not fit a `Decimal`.
    pub fn cost(&self, product: &str, quantity: u32) -> Result<Decimal> {
        self.unit_cost(product)?
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| overflow(product))
    }

    /// Total cost of a line set, rounded and floored.
    ///
    /// # Errors
    /// Returns `Error::ProductNotFound` if any line's product is not catalogued
    /// and `Error::CostOverflow` if the sum does not fit a `Decimal`.
    pub fn total(&self, lines: &RequestLines) -> Result<Decimal> {
        let sum = lines
            .iter()
            .try_fold(Decimal::ZERO, |sum, (product, quantity)| {
                sum.checked_add(self.cost(product, quantity)?)
                    .ok_or_else(|| overflow(product))
            })?;
        Ok(finalize_total(sum))
    }

    /// Per-line breakdown of a line set, as shown next to an unsaved draft.
    ///
    /// # Errors
    /// Returns `Error::ProductNotFound` if any line's product is not catalogued.
    pub fn quote(&self, lines: &RequestLines) -> Result<Quote> {
        let mut quoted = Vec::with_capacity(lines.len());
        let mut sum = Decimal::ZERO;
        for (product, quantity) in lines.iter() {
            let price = self.product(product).ok_or_else(|| Error::ProductNotFound {
                name: product.to_string(),
            })?;
            let unit_cost = self.unit_cost(product)?;
            let line_cost = self.cost(product, quantity)?;
            sum = sum
                .checked_add(line_cost)
                .ok_or_else(|| overflow(product))?;
            quoted.push(QuotedLine {
                product: product.to_string(),
                quantity,
                base_unit_cost: price.min_partner_cost,
                unit_cost: unit_cost.round_dp(2),
                line_cost: line_cost.round_dp(2),
            });
        }
        Ok(Quote {
            lines: quoted,
            total: finalize_total(sum),
            basis: self.basis,
        })
    }
}

/// Base unit cost with the defect surcharge applied, or `None` on overflow.
#[must_use]
pub fn adjusted_unit_cost(min_partner_cost: Decimal, defect_percent: Decimal) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_add(defect_percent.checked_div(Decimal::ONE_HUNDRED)?)?;
    min_partner_cost.checked_mul(factor)
}

fn overflow(product: &str) -> Error {
    Error::CostOverflow {
        product: product.to_string(),
    }
}

/// Rounds to two decimal places and floors at zero.
#[must_use]
pub fn finalize_total(sum: Decimal) -> Decimal {
    sum.round_dp(2).max(Decimal::ZERO)
}

/// One priced line of a [`Quote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedLine {
    /// Product name
    pub product: String,
    /// Requested quantity
    pub quantity: u32,
    /// Catalog unit cost before surcharge
    pub base_unit_cost: Decimal,
    /// Unit cost after surcharge, rounded
    pub unit_cost: Decimal,
    /// Line cost, rounded
    pub line_cost: Decimal,
}

/// Priced breakdown of a line set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Lines in product order
    pub lines: Vec<QuotedLine>,
    /// Total, rounded and floored
    pub total: Decimal,
    /// Whether surcharges were applied
    pub basis: PricingBasis,
}

/// Result of pricing a partner's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostOutcome {
    /// A computed total
    Priced {
        /// Total, rounded and floored
        total: Decimal,
        /// Whether surcharges were applied
        basis: PricingBasis,
    },
    /// The cost could not be computed
    Unavailable,
}

impl CostOutcome {
    /// The total, if one could be computed.
    #[must_use]
    pub const fn total(&self) -> Option<Decimal> {
        match self {
            Self::Priced { total, .. } => Some(*total),
            Self::Unavailable => None,
        }
    }
}

impl fmt::Display for CostOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Priced {
                total,
                basis: PricingBasis::DefectAdjusted,
            } => write!(f, "{total:.2}"),
            Self::Priced {
                total,
                basis: PricingBasis::BaseOnly,
            } => write!(f, "{total:.2} (base)"),
            Self::Unavailable => f.write_str("n/a"),
        }
    }
}

fn priced(catalog: &Catalog, lines: &RequestLines) -> Result<CostOutcome> {
    Ok(CostOutcome::Priced {
        total: catalog.total(lines)?,
        basis: catalog.basis(),
    })
}

/// Prices a line set against the store.
///
/// Tries the defect-aware catalog first, then the base catalog, and reports
/// [`CostOutcome::Unavailable`] when neither can price every line.
pub async fn price_lines(db: &DatabaseConnection, lines: &RequestLines) -> CostOutcome {
    let defect_aware = catalog::load_catalog(db)
        .await
        .and_then(|catalog| priced(&catalog, lines));
    match defect_aware {
        Ok(outcome) => return outcome,
        Err(e) => warn!("Defect-adjusted pricing failed, using base cost: {}", e),
    }

    let base = catalog::load_base_catalog(db)
        .await
        .and_then(|catalog| priced(&catalog, lines));
    base.unwrap_or_else(|e| {
        warn!("Base pricing failed, cost unavailable: {}", e);
        CostOutcome::Unavailable
    })
}

/// Prices the stored request of `partner_name`.
///
/// A partner without lines (or an unknown partner) costs 0.00.
pub async fn partner_total(db: &DatabaseConnection, partner_name: &str) -> CostOutcome {
    match crate::core::request::get_request_lines(db, partner_name).await {
        Ok(lines) => price_lines(db, &lines).await,
        Err(e) => {
            warn!(
                "Could not load request lines for '{}': {}",
                partner_name, e
            );
            CostOutcome::Unavailable
        }
    }
}

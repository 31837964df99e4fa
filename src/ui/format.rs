//! Text rendering for the command-line front end.

use crate::core::{
    catalog::CatalogEntry,
    pricing::{PricingBasis, Quote},
    report::{RequestDetail, RequestSummary},
};
use std::fmt::Write;

/// Renders one main-list row: type and name, address, phone, rating, total.
#[must_use]
pub fn format_summary(summary: &RequestSummary) -> String {
    let partner = &summary.partner;
    format!(
        "{} | {}\n  {}\n  {}\n  Rating: {}\n  Cost: {}",
        summary.partner_type, partner.name, partner.address, partner.phone, partner.rating,
        summary.total
    )
}

/// Renders the main list.
#[must_use]
pub fn format_summary_list(summaries: &[RequestSummary]) -> String {
    if summaries.is_empty() {
        return "No partner requests yet.".to_string();
    }
    summaries
        .iter()
        .map(format_summary)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders a priced line table with its total.
#[must_use]
pub fn format_quote(quote: &Quote) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>8} {:>12} {:>12}",
        "Product", "Qty", "Unit cost", "Line cost"
    );
    for line in &quote.lines {
        let _ = writeln!(
            out,
            "{:<24} {:>8} {:>12.2} {:>12.2}",
            line.product, line.quantity, line.unit_cost, line.line_cost
        );
    }
    let _ = write!(out, "Total: {:.2}", quote.total);
    if quote.basis == PricingBasis::BaseOnly {
        out.push_str(" (base cost, defect rates unavailable)");
    }
    out
}

/// Renders a partner card with its request.
#[must_use]
pub fn format_detail(detail: &RequestDetail) -> String {
    let p = &detail.partner;
    let mut out = format!(
        "{} ({})\n  Director: {}\n  Tax ID: {}\n  Address: {}\n  Phone: {}\n  Email: {}\n  Rating: {}\n\n",
        p.name, p.partner_type, p.director, p.tax_id, p.address, p.phone, p.email, p.rating
    );
    match &detail.quote {
        Some(quote) => out.push_str(&format_quote(quote)),
        None => {
            let _ = write!(out, "Total: {}", detail.total);
        }
    }
    out
}

/// Renders the product catalog.
#[must_use]
pub fn format_products(entries: &[CatalogEntry]) -> String {
    if entries.is_empty() {
        return "The catalog is empty.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<12} {:>10} {:>8} {:>12}",
        "Product", "Type", "Min cost", "Defect", "Unit cost"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<24} {:<12} {:>10.2} {:>7}% {:>12.2}",
            entry.product.name,
            entry.product.product_type,
            entry.product.min_partner_cost,
            entry.defect_percent.normalize(),
            entry.adjusted_unit_cost
        );
    }
    out.truncate(out.trim_end().len());
    out
}

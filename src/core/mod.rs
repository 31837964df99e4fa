//! Core business logic - framework-agnostic pricing, validation and persistence.

/// Catalog loading and seeding
pub mod catalog;
/// Partner attributes, lookups and deletion
pub mod partner;
/// Field mutability policy for existing partners
pub mod policy;
/// Cost calculation with graceful degradation
pub mod pricing;
/// Main-list and detail reports
pub mod report;
/// Request line sets and the save transaction
pub mod request;
/// Partner attribute validation
pub mod validation;

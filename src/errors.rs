use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid partner data:\n{}", errors.join("\n"))]
    Validation { errors: Vec<String> },

    #[error("A partner named '{name}' already exists")]
    PartnerExists { name: String },

    #[error("Partner '{name}' not found")]
    PartnerNotFound { name: String },

    #[error("Product '{name}' not found in the catalog")]
    ProductNotFound { name: String },

    #[error("Product '{product}' is already part of the request")]
    DuplicateLine { product: String },

    #[error(
        "Invalid quantity: {quantity} (must be between 1 and {max})",
        max = crate::core::request::MAX_QUANTITY
    )]
    InvalidQuantity { quantity: i64 },

    #[error("Cost of product '{product}' is out of range")]
    CostOverflow { product: String },

    #[error("Add at least one product to the request")]
    EmptyRequest,

    #[error("Fields cannot be changed after creation: {}", fields.join(", "))]
    ImmutableField { fields: Vec<String> },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod material_defect_rate;
pub mod partner;
pub mod product;
pub mod product_type;
pub mod request_line;

// Re-export specific types to avoid conflicts
pub use material_defect_rate::{
    Column as MaterialDefectRateColumn, Entity as MaterialDefectRate,
    Model as MaterialDefectRateModel,
};
pub use partner::{Column as PartnerColumn, Entity as Partner, Model as PartnerModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_type::{
    Column as ProductTypeColumn, Entity as ProductType, Model as ProductTypeModel,
};
pub use request_line::{
    Column as RequestLineColumn, Entity as RequestLine, Model as RequestLineModel,
};

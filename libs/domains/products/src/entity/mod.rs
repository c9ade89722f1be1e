//! SeaORM entities for the catalog schema created by the `migration` crate.

pub mod company;
pub mod inventory;
pub mod product;
pub mod sale;
pub mod supplier;
pub mod supplier_product;
pub mod warehouse;

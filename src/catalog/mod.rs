// src/catalog/mod.rs
mod catalog;
mod room_type;
mod validate;

pub use self::catalog::{CatalogError, RoomTypeCatalog, BUILTIN_CATALOG};
pub use self::room_type::RoomType;
pub use self::validate::{validate, CatalogIssue};

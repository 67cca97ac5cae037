//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts, populated by the service layer
//! - An update DTO (all `Option` fields) for patches

pub mod category;
pub mod image;
pub mod product;

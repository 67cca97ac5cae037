//! Product image entity model and create DTO.
//!
//! Image rows have no independent API surface: they are created and
//! destroyed only as a side effect of product create/update/delete.

use catalog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `product_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductImage {
    pub id: DbId,
    pub product_id: DbId,
    pub path: String,
    pub alt: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an image record.
#[derive(Debug, Clone)]
pub struct CreateProductImage {
    pub product_id: DbId,
    pub path: String,
    pub alt: String,
    pub sort_order: i32,
}

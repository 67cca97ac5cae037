//! Product entity models and DTOs.

use catalog_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Option<DbId>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A product row joined with its category's name and slug, when set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductWithCategory {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The compact product row embedded in a category detail response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductSummary {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub status: String,
}

/// DTO for inserting a product. Slug and status are validated and
/// assigned by the caller.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub category_id: Option<DbId>,
    pub status: String,
}

/// DTO for updating a product. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    /// `None` keeps the current reference, `Some(None)` clears it to
    /// NULL, `Some(Some(id))` points it at a category.
    pub category_id: Option<Option<DbId>>,
    pub status: Option<String>,
}

/// The `{id, name, slug}` stub returned from delete operations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductStub {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

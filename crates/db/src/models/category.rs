//! Category entity models and DTOs.

use catalog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category row joined with its referencing-product count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCount {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub product_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a category. The slug is assigned by the caller
/// before the insert, never taken from the request.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// DTO for updating a category. Only non-`None` fields are applied;
/// `slug` is set by the caller whenever `name` changes.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// The `{id, name, slug}` stub returned from delete operations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryStub {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

//! Repository for the `categories` table.

use std::collections::HashSet;

use catalog_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{
    Category, CategoryStub, CategoryWithCount, CreateCategory, UpdateCategory,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Column list for rows carrying the referencing-product count.
const COUNTED_COLUMNS: &str = "c.id, c.name, c.slug, c.description, \
    (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count, \
    c.created_at, c.updated_at";

/// Provides CRUD and slug-namespace queries for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a category by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category together with its product count.
    pub async fn find_with_count(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryWithCount>, sqlx::Error> {
        let query = format!("SELECT {COUNTED_COLUMNS} FROM categories c WHERE c.id = $1");
        sqlx::query_as::<_, CategoryWithCount>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all categories with product counts, ordered by name.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        let query = format!("SELECT {COUNTED_COLUMNS} FROM categories c ORDER BY c.name");
        sqlx::query_as::<_, CategoryWithCount>(&query)
            .fetch_all(pool)
            .await
    }

    /// Whether a category with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    /// Returns `None` if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category, returning its `{id, name, slug}` stub.
    /// Returns `None` if the row does not exist.
    ///
    /// Callers must have run the deletion guard first; this performs no
    /// dependent check of its own.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<CategoryStub>, sqlx::Error> {
        sqlx::query_as::<_, CategoryStub>(
            "DELETE FROM categories WHERE id = $1 RETURNING id, name, slug",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Slugs already taken in the category namespace that could collide
    /// with `base`: the base itself plus every `base-N` variant,
    /// excluding the row identified by `exclude_id` so an update never
    /// conflicts with its own current slug.
    pub async fn taken_slugs(
        pool: &PgPool,
        base: &str,
        exclude_id: Option<DbId>,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM categories
             WHERE (slug = $1 OR slug LIKE $1 || '-%')
               AND ($2::BIGINT IS NULL OR id <> $2)",
        )
        .bind(base)
        .bind(exclude_id)
        .fetch_all(pool)
        .await?;
        Ok(slugs.into_iter().collect())
    }
}

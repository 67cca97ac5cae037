//! Repository for the `products` table.

use std::collections::HashSet;

use catalog_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{
    CreateProduct, Product, ProductStub, ProductSummary, ProductWithCategory, UpdateProduct,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, slug, description, price, stock, category_id, status, created_at, updated_at";

/// Column list for rows joined with the category stub.
const JOINED_COLUMNS: &str = "p.id, p.name, p.slug, p.description, p.price, p.stock, \
    p.category_id, c.name AS category_name, c.slug AS category_slug, p.status, \
    p.created_at, p.updated_at";

/// Provides CRUD, slug-namespace, and guard queries for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (name, slug, description, price, stock, category_id, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(input.category_id)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product joined with its category stub.
    pub async fn find_with_category(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1"
        );
        sqlx::query_as::<_, ProductWithCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all products with category stubs, ordered by name.
    pub async fn list_with_category(pool: &PgPool) -> Result<Vec<ProductWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             ORDER BY p.name"
        );
        sqlx::query_as::<_, ProductWithCategory>(&query)
            .fetch_all(pool)
            .await
    }

    /// Compact rows for the products embedded in a category detail.
    pub async fn list_summaries_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<ProductSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProductSummary>(
            "SELECT id, name, slug, price, status FROM products
             WHERE category_id = $1
             ORDER BY name",
        )
        .bind(category_id)
        .fetch_all(pool)
        .await
    }

    /// Number of products referencing a category (deletion guard input).
    pub async fn count_by_category(pool: &PgPool, category_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(pool)
            .await
    }

    /// Update a product. Only non-`None` fields in `input` are applied,
    /// except `category_id`, whose `Some(None)` form explicitly clears
    /// the reference to NULL. Returns `None` if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                stock = COALESCE($6, stock),
                category_id = CASE WHEN $7 THEN NULL ELSE COALESCE($8, category_id) END,
                status = COALESCE($9, status),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(matches!(input.category_id, Some(None)))
            .bind(input.category_id.flatten())
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a product row, returning its `{id, name, slug}` stub.
    /// Returns `None` if the row does not exist. Image records cascade
    /// at the database level; backing files are the caller's job.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<ProductStub>, sqlx::Error> {
        sqlx::query_as::<_, ProductStub>(
            "DELETE FROM products WHERE id = $1 RETURNING id, name, slug",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Slugs already taken in the product namespace that could collide
    /// with `base`, excluding the row identified by `exclude_id`.
    pub async fn taken_slugs(
        pool: &PgPool,
        base: &str,
        exclude_id: Option<DbId>,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM products
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

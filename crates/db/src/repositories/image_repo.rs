//! Repository for the `product_images` table.

use catalog_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::{CreateProductImage, ProductImage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, product_id, path, alt, sort_order, created_at, updated_at";

/// Provides record operations for product images. The backing files
/// are managed separately by the attachment manager.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert a new image record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProductImage,
    ) -> Result<ProductImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO product_images (product_id, path, alt, sort_order)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(input.product_id)
            .bind(&input.path)
            .bind(&input.alt)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// List a product's images in ascending display order.
    pub async fn list_by_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<ProductImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM product_images
             WHERE product_id = $1
             ORDER BY sort_order"
        );
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }

    /// List images for a set of products in one round trip, ascending
    /// by display order within each product.
    pub async fn list_by_products(
        pool: &PgPool,
        product_ids: &[DbId],
    ) -> Result<Vec<ProductImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM product_images
             WHERE product_id = ANY($1)
             ORDER BY product_id, sort_order"
        );
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(product_ids)
            .fetch_all(pool)
            .await
    }

    /// Find an image only if it belongs to the given product. Ids that
    /// resolve to another product's image come back as `None`.
    pub async fn find_owned(
        pool: &PgPool,
        product_id: DbId,
        image_id: DbId,
    ) -> Result<Option<ProductImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM product_images
             WHERE id = $1 AND product_id = $2"
        );
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(image_id)
            .bind(product_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an image record by ID.
    pub async fn delete(pool: &PgPool, image_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM product_images WHERE id = $1")
            .bind(image_id)
            .execute(pool)
            .await
            .map(|_| ())
    }
}

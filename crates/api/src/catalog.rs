//! Catalog orchestration.
//!
//! The create/update/delete flows shared by the HTTP handlers: slug
//! assignment, the category deletion guard, and the coordination of
//! product rows with their image attachments. Handlers stay thin and
//! every response goes through the canonical representations in
//! [`crate::representation`].

use std::collections::HashMap;

use catalog_core::error::CoreError;
use catalog_core::guard::check_category_delete;
use catalog_core::slug::{resolve_unique, slugify};
use catalog_core::status::ProductStatus;
use catalog_core::storage::FileStore;
use catalog_core::types::DbId;
use catalog_db::models::category::{CategoryStub, CategoryWithCount, CreateCategory, UpdateCategory};
use catalog_db::models::image::ProductImage;
use catalog_db::models::product::{CreateProduct, ProductStub, UpdateProduct};
use catalog_db::repositories::{CategoryRepo, ImageRepo, ProductRepo};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::images::{ImageAttachmentManager, ImageRecords};
use crate::multipart::ProductForm;
use crate::representation::{
    category_repr, product_repr, product_summary_repr, CategoryDetailRepr, CategoryRepr,
    ProductRepr,
};

// ---------------------------------------------------------------------------
// Slug assignment
// ---------------------------------------------------------------------------

/// Assign a unique slug in the category namespace.
///
/// `exclude_id` is set on update so the record never conflicts with its
/// own current slug. The fetch-then-resolve window is the documented
/// slug race; the DB unique constraint catches the loser.
async fn assign_category_slug(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<DbId>,
) -> Result<String, sqlx::Error> {
    let base = slugify(name);
    let taken = CategoryRepo::taken_slugs(pool, &base, exclude_id).await?;
    Ok(resolve_unique(&base, &taken))
}

/// Assign a unique slug in the product namespace. Independent from the
/// category namespace: a product and a category may share a slug.
async fn assign_product_slug(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<DbId>,
) -> Result<String, sqlx::Error> {
    let base = slugify(name);
    let taken = ProductRepo::taken_slugs(pool, &base, exclude_id).await?;
    Ok(resolve_unique(&base, &taken))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// JSON body for category creation.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
}

/// JSON body for category update.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn list_categories(pool: &PgPool) -> AppResult<Vec<CategoryRepr>> {
    let rows = CategoryRepo::list_with_counts(pool).await?;
    Ok(rows.into_iter().map(category_repr).collect())
}

pub async fn create_category(
    pool: &PgPool,
    input: CreateCategoryRequest,
) -> AppResult<CategoryRepr> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let slug = assign_category_slug(pool, &input.name, None).await?;
    let created = CategoryRepo::create(
        pool,
        &CreateCategory {
            name: input.name,
            slug,
            description: input.description,
        },
    )
    .await?;

    tracing::info!(category_id = created.id, slug = %created.slug, "Category created");

    // A fresh category has no products yet.
    Ok(category_repr(CategoryWithCount {
        id: created.id,
        name: created.name,
        slug: created.slug,
        description: created.description,
        product_count: 0,
        created_at: created.created_at,
        updated_at: created.updated_at,
    }))
}

pub async fn get_category(pool: &PgPool, id: DbId) -> AppResult<CategoryDetailRepr> {
    let category = CategoryRepo::find_with_count(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    let products = ProductRepo::list_summaries_by_category(pool, id).await?;

    Ok(CategoryDetailRepr {
        category: category_repr(category),
        products: products.into_iter().map(product_summary_repr).collect(),
    })
}

pub async fn update_category(
    pool: &PgPool,
    id: DbId,
    input: UpdateCategoryRequest,
) -> AppResult<CategoryRepr> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // A name change recomputes the slug, excluding this record so an
    // unchanged name keeps its slug without a numbered suffix.
    let slug = match &input.name {
        Some(name) => Some(assign_category_slug(pool, name, Some(id)).await?),
        None => None,
    };

    let updated = CategoryRepo::update(
        pool,
        id,
        &UpdateCategory {
            name: input.name,
            slug,
            description: input.description,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    }))?;

    let category = CategoryRepo::find_with_count(pool, updated.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    Ok(category_repr(category))
}

/// Delete a category, blocked while products reference it.
///
/// The count-then-delete sequence is deliberately not atomic; the guard
/// is best-effort against concurrent product creation.
pub async fn delete_category(pool: &PgPool, id: DbId) -> AppResult<CategoryStub> {
    let product_count = ProductRepo::count_by_category(pool, id).await?;
    check_category_delete(product_count).into_result(id)?;

    let stub = CategoryRepo::delete(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    tracing::info!(category_id = stub.id, slug = %stub.slug, "Category deleted");
    Ok(stub)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Validate the scalar product fields shared by create and update.
fn validate_price(price: Decimal) -> AppResult<Decimal> {
    if price < Decimal::ZERO {
        return Err(AppError::Core(CoreError::Validation(
            "price must be non-negative".to_string(),
        )));
    }
    // NUMERIC(10,2) storage; normalize eagerly.
    Ok(price.round_dp(2))
}

fn validate_stock(stock: i32) -> AppResult<i32> {
    if stock < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "stock must be non-negative".to_string(),
        )));
    }
    Ok(stock)
}

/// The category reference must resolve when supplied.
async fn ensure_category_exists(pool: &PgPool, category_id: DbId) -> AppResult<()> {
    if !CategoryRepo::exists(pool, category_id).await? {
        return Err(AppError::Core(CoreError::Validation(format!(
            "category {category_id} does not exist"
        ))));
    }
    Ok(())
}

fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::Core(CoreError::Validation(format!("{field} is required"))))
}

pub async fn list_products(pool: &PgPool, public_prefix: &str) -> AppResult<Vec<ProductRepr>> {
    let rows = ProductRepo::list_with_category(pool).await?;
    let ids: Vec<DbId> = rows.iter().map(|p| p.id).collect();

    // One round trip for all image rows, then group per product.
    let mut by_product: HashMap<DbId, Vec<ProductImage>> = HashMap::new();
    for image in ImageRepo::list_by_products(pool, &ids).await? {
        by_product.entry(image.product_id).or_default().push(image);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let images = by_product.remove(&row.id).unwrap_or_default();
            product_repr(row, images, public_prefix)
        })
        .collect())
}

pub async fn get_product(pool: &PgPool, public_prefix: &str, id: DbId) -> AppResult<ProductRepr> {
    let row = ProductRepo::find_with_category(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    let images = ImageRepo::list_by_product(pool, id).await?;
    Ok(product_repr(row, images, public_prefix))
}

pub async fn create_product<R: ImageRecords, F: FileStore>(
    pool: &PgPool,
    images: &ImageAttachmentManager<R, F>,
    public_prefix: &str,
    form: ProductForm,
) -> AppResult<ProductRepr> {
    let name = required(form.name, "name")?;
    if name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".to_string(),
        )));
    }
    let price = validate_price(required(form.price, "price")?)?;
    let stock = validate_stock(required(form.stock, "stock")?)?;
    let status = ProductStatus::from_name(&required(form.status, "status")?)?;
    // An empty category_id field on create is the same as leaving it out.
    let category_id = form.category_id.flatten();
    if let Some(category_id) = category_id {
        ensure_category_exists(pool, category_id).await?;
    }

    let slug = assign_product_slug(pool, &name, None).await?;
    let created = ProductRepo::create(
        pool,
        &CreateProduct {
            name,
            slug,
            description: form.description,
            price,
            stock,
            category_id,
            status: status.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(product_id = created.id, slug = %created.slug, "Product created");

    if !form.files.is_empty() {
        images
            .attach(created.id, &created.name, &form.files, 0)
            .await?;
    }

    get_product(pool, public_prefix, created.id).await
}

pub async fn update_product<R: ImageRecords, F: FileStore>(
    pool: &PgPool,
    images: &ImageAttachmentManager<R, F>,
    public_prefix: &str,
    id: DbId,
    form: ProductForm,
) -> AppResult<ProductRepr> {
    // Resolve the row first so absent ids fail before any side effect.
    ProductRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;

    let slug = match &form.name {
        Some(name) if !name.trim().is_empty() => {
            Some(assign_product_slug(pool, name, Some(id)).await?)
        }
        Some(_) => {
            return Err(AppError::Core(CoreError::Validation(
                "name must not be empty".to_string(),
            )))
        }
        None => None,
    };
    let price = form.price.map(validate_price).transpose()?;
    let stock = form.stock.map(validate_stock).transpose()?;
    let status = match &form.status {
        Some(s) => Some(ProductStatus::from_name(s)?.as_str().to_string()),
        None => None,
    };
    // Submitted empty clears the reference; only a real id is checked.
    if let Some(Some(category_id)) = form.category_id {
        ensure_category_exists(pool, category_id).await?;
    }

    let updated = ProductRepo::update(
        pool,
        id,
        &UpdateProduct {
            name: form.name,
            slug,
            description: form.description,
            price,
            stock,
            category_id: form.category_id,
            status,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    }))?;

    // Deletions first, then appends after the remaining max order.
    images
        .attach_during_update(id, &updated.name, &form.files, &form.deleted_images)
        .await?;

    get_product(pool, public_prefix, id).await
}

pub async fn delete_product<R: ImageRecords, F: FileStore>(
    pool: &PgPool,
    images: &ImageAttachmentManager<R, F>,
    id: DbId,
) -> AppResult<ProductStub> {
    // Files first: the row delete cascades the image records, but the
    // backing files are ours to clean up.
    images.cascade_delete(id).await?;

    let stub = ProductRepo::delete(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;

    tracing::info!(product_id = stub.id, slug = %stub.slug, "Product deleted");
    Ok(stub)
}

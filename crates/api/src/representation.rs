//! Canonical entity representations.
//!
//! Every read and write path serializes entities through these mapping
//! functions, so there is exactly one place that decides what a
//! category or product looks like on the wire.

use catalog_core::money::format_price;
use catalog_core::types::{DbId, Timestamp};
use catalog_db::models::category::CategoryWithCount;
use catalog_db::models::image::ProductImage;
use catalog_db::models::product::{ProductSummary, ProductWithCategory};
use rust_decimal::Decimal;
use serde::Serialize;

/// One image of a product, with its public URL resolved.
#[derive(Debug, Serialize)]
pub struct ImageRepr {
    pub id: DbId,
    pub path: String,
    pub url: String,
    pub alt: String,
    pub order: i32,
}

/// The compact category stub embedded in product responses.
#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// A full product representation.
#[derive(Debug, Serialize)]
pub struct ProductRepr {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub formatted_price: String,
    pub stock: i32,
    pub status: String,
    pub category: Option<CategoryRef>,
    pub images: Vec<ImageRepr>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category list/detail representation.
#[derive(Debug, Serialize)]
pub struct CategoryRepr {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub product_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Category detail: the list representation plus its products.
#[derive(Debug, Serialize)]
pub struct CategoryDetailRepr {
    #[serde(flatten)]
    pub category: CategoryRepr,
    pub products: Vec<ProductSummaryRepr>,
}

/// The compact product row embedded in a category detail.
#[derive(Debug, Serialize)]
pub struct ProductSummaryRepr {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub formatted_price: String,
    pub status: String,
}

/// Map an image row, resolving its public URL.
fn image_repr(image: ProductImage, public_prefix: &str) -> ImageRepr {
    ImageRepr {
        url: format!("{public_prefix}/{}", image.path),
        id: image.id,
        path: image.path,
        alt: image.alt,
        order: image.sort_order,
    }
}

/// Map a product row and its images to the canonical representation.
///
/// Images are sorted here by ascending order, so the guarantee holds on
/// every path regardless of how the rows were fetched.
pub fn product_repr(
    product: ProductWithCategory,
    mut images: Vec<ProductImage>,
    public_prefix: &str,
) -> ProductRepr {
    images.sort_by_key(|img| img.sort_order);

    let category = match (product.category_id, product.category_name, product.category_slug) {
        (Some(id), Some(name), Some(slug)) => Some(CategoryRef { id, name, slug }),
        _ => None,
    };

    ProductRepr {
        id: product.id,
        name: product.name,
        slug: product.slug,
        description: product.description,
        formatted_price: format_price(product.price),
        price: product.price,
        stock: product.stock,
        status: product.status,
        category,
        images: images
            .into_iter()
            .map(|img| image_repr(img, public_prefix))
            .collect(),
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

/// Map a category row with its product count.
pub fn category_repr(category: CategoryWithCount) -> CategoryRepr {
    CategoryRepr {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        product_count: category.product_count,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

/// Map a compact product row for category detail embedding.
pub fn product_summary_repr(product: ProductSummary) -> ProductSummaryRepr {
    ProductSummaryRepr {
        id: product.id,
        name: product.name,
        slug: product.slug,
        formatted_price: format_price(product.price),
        price: product.price,
        status: product.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn image(id: DbId, path: &str, order: i32) -> ProductImage {
        ProductImage {
            id,
            product_id: 1,
            path: path.to_string(),
            alt: format!("P - Image {}", order + 1),
            sort_order: order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product(category: bool) -> ProductWithCategory {
        ProductWithCategory {
            id: 1,
            name: "Desk Lamp".to_string(),
            slug: "desk-lamp".to_string(),
            description: None,
            price: Decimal::new(1999, 2),
            stock: 4,
            category_id: category.then_some(9),
            category_name: category.then(|| "Home".to_string()),
            category_slug: category.then(|| "home".to_string()),
            status: "active".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn images_come_out_ascending_even_when_fetched_unordered() {
        // Non-contiguous orders after a deletion: [0, 2, 3].
        let images = vec![image(3, "c.png", 3), image(1, "a.png", 0), image(2, "b.png", 2)];
        let repr = product_repr(product(false), images, "/storage");

        let orders: Vec<i32> = repr.images.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 2, 3]);
        assert_eq!(repr.images[0].url, "/storage/a.png");
    }

    #[test]
    fn category_stub_requires_joined_fields() {
        let repr = product_repr(product(true), Vec::new(), "/storage");
        let cat = repr.category.expect("category stub");
        assert_eq!((cat.id, cat.slug.as_str()), (9, "home"));

        let repr = product_repr(product(false), Vec::new(), "/storage");
        assert!(repr.category.is_none());
    }

    #[test]
    fn formatted_price_is_derived_from_price() {
        let repr = product_repr(product(false), Vec::new(), "/storage");
        assert_eq!(repr.formatted_price, "$19.99");
    }
}

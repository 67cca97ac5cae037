//! Multipart form parsing for product create/update requests.
//!
//! Products are submitted as `multipart/form-data`: scalar fields plus
//! repeated `images` file parts and repeated `deleted_images` id parts.
//! Field-level requiredness is checked later by the catalog layer
//! (create requires more than update), so everything here is optional.

use axum::extract::Multipart;
use catalog_core::error::CoreError;
use catalog_core::types::DbId;
use catalog_core::upload::{UploadedFile, MAX_FILES_PER_REQUEST};
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

/// Decoded product form fields.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    /// `None` when absent, `Some(None)` when submitted empty (clear the
    /// reference), `Some(Some(id))` when submitted with a value.
    pub category_id: Option<Option<DbId>>,
    pub status: Option<String>,
    pub files: Vec<UploadedFile>,
    pub deleted_images: Vec<DbId>,
}

impl ProductForm {
    /// Drain a multipart stream into a form.
    ///
    /// Malformed scalar fields are rejected here; file *content* is not
    /// judged here at all -- per-file validity is the attachment
    /// manager's call, and a bad file must not fail the request.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                "images" | "images[]" => {
                    let original_name = field.file_name().unwrap_or("upload").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?
                        .to_vec();
                    form.files.push(UploadedFile {
                        original_name,
                        bytes,
                    });
                }
                "deleted_images" | "deleted_images[]" => {
                    let text = Self::text(field).await?;
                    let id: DbId = text.trim().parse().map_err(|_| {
                        AppError::BadRequest(format!("Invalid deleted_images id '{text}'"))
                    })?;
                    form.deleted_images.push(id);
                }
                "name" => form.name = Some(Self::text(field).await?),
                "description" => form.description = Some(Self::text(field).await?),
                "price" => {
                    let text = Self::text(field).await?;
                    let price: Decimal = text.trim().parse().map_err(|_| {
                        AppError::BadRequest(format!("Invalid price '{text}'"))
                    })?;
                    form.price = Some(price);
                }
                "stock" => {
                    let text = Self::text(field).await?;
                    let stock: i32 = text.trim().parse().map_err(|_| {
                        AppError::BadRequest(format!("Invalid stock '{text}'"))
                    })?;
                    form.stock = Some(stock);
                }
                "category_id" => {
                    let text = Self::text(field).await?;
                    form.category_id = Some(parse_category_id(&text)?);
                }
                "status" => form.status = Some(Self::text(field).await?),
                // Unknown fields are drained and ignored.
                _ => {
                    let _ = field.bytes().await;
                }
            }
        }

        if form.files.len() > MAX_FILES_PER_REQUEST {
            return Err(AppError::Core(CoreError::Validation(format!(
                "At most {MAX_FILES_PER_REQUEST} images per request"
            ))));
        }

        Ok(form)
    }

    async fn text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
        field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

/// A submitted `category_id` value: empty clears the reference,
/// anything else must parse as an id.
fn parse_category_id(text: &str) -> AppResult<Option<DbId>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid category_id '{text}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn category_id_value_parses() {
        assert_eq!(parse_category_id("7").unwrap(), Some(7));
        assert_eq!(parse_category_id(" 42 ").unwrap(), Some(42));
    }

    #[test]
    fn empty_category_id_means_clear() {
        assert_eq!(parse_category_id("").unwrap(), None);
        assert_eq!(parse_category_id("   ").unwrap(), None);
    }

    #[test]
    fn garbage_category_id_is_rejected() {
        assert_matches!(parse_category_id("seven"), Err(AppError::BadRequest(_)));
    }
}

//! Handlers for the `/products` resource.
//!
//! Create and update accept `multipart/form-data` so image files ride
//! along with the scalar fields; see [`crate::multipart::ProductForm`].

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::types::DbId;
use catalog_db::models::product::ProductStub;

use crate::catalog;
use crate::error::AppResult;
use crate::multipart::ProductForm;
use crate::representation::ProductRepr;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/products
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProductRepr>>>> {
    let products = catalog::list_products(&state.pool, &state.config.public_prefix).await?;
    Ok(Json(DataResponse { data: products }))
}

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<ProductRepr>>)> {
    let form = ProductForm::from_multipart(multipart).await?;
    let product = catalog::create_product(
        &state.pool,
        state.images.as_ref(),
        &state.config.public_prefix,
        form,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductRepr>>> {
    let product = catalog::get_product(&state.pool, &state.config.public_prefix, id).await?;
    Ok(Json(DataResponse { data: product }))
}

/// PUT /api/v1/products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ProductRepr>>> {
    let form = ProductForm::from_multipart(multipart).await?;
    let product = catalog::update_product(
        &state.pool,
        state.images.as_ref(),
        &state.config.public_prefix,
        id,
        form,
    )
    .await?;
    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/products/{id}
///
/// Removes the product, its image records, and their backing files;
/// returns the deleted `{id, name, slug}` stub.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductStub>>> {
    let stub = catalog::delete_product(&state.pool, state.images.as_ref(), id).await?;
    Ok(Json(DataResponse { data: stub }))
}

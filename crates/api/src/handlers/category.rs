//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use catalog_core::types::DbId;
use catalog_db::models::category::CategoryStub;

use crate::catalog::{self, CreateCategoryRequest, UpdateCategoryRequest};
use crate::error::AppResult;
use crate::representation::{CategoryDetailRepr, CategoryRepr};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryRepr>>>> {
    let categories = catalog::list_categories(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CategoryRepr>>)> {
    let category = catalog::create_category(&state.pool, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CategoryDetailRepr>>> {
    let category = catalog::get_category(&state.pool, id).await?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategoryRequest>,
) -> AppResult<Json<DataResponse<CategoryRepr>>> {
    let category = catalog::update_category(&state.pool, id, input).await?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Blocked with 409 `HAS_DEPENDENTS` while products reference the
/// category; on success returns the deleted `{id, name, slug}` stub.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CategoryStub>>> {
    let stub = catalog::delete_category(&state.pool, id).await?;
    Ok(Json(DataResponse { data: stub }))
}

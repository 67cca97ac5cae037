use std::sync::Arc;

use crate::config::ServerConfig;
use crate::images::AppImageManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: catalog_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Image attachment manager (records + files + clock).
    pub images: Arc<AppImageManager>,
}

//! Catalog API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! the attachment manager, catalog orchestration) so integration tests
//! and the binary entrypoint can both access them.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod images;
pub mod multipart;
pub mod representation;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;

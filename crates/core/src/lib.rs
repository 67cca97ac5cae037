//! Pure domain logic for the product catalog.
//!
//! Everything in this crate is either a pure function or an abstraction
//! over an external resource (the file store, the clock). Database access
//! lives in `catalog-db`; HTTP concerns live in `catalog-api`.

pub mod error;
pub mod guard;
pub mod money;
pub mod slug;
pub mod status;
pub mod storage;
pub mod types;
pub mod upload;

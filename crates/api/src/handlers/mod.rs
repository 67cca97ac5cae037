//! HTTP handlers, one module per resource.

pub mod category;
pub mod product;

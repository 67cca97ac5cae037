//! Repository structs, one per table.

pub mod category_repo;
pub mod image_repo;
pub mod product_repo;

pub use category_repo::CategoryRepo;
pub use image_repo::ImageRepo;
pub use product_repo::ProductRepo;

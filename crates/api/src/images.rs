//! Image attachment lifecycle for products.
//!
//! The manager coordinates two independent stores: image records (the
//! database) and backing files (a [`FileStore`]). The two are not
//! transactional together; a failure between a file write and a record
//! insert (or the reverse on delete) leaves an orphan on one side,
//! which is accepted for this regenerable metadata.
//!
//! Batch attach is best-effort per file: invalid or unwritable files
//! are skipped and never abort the batch, so an upload with one bad
//! file still succeeds with the attached subset.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::error::CoreError;
use catalog_core::storage::FileStore;
use catalog_core::types::DbId;
use catalog_core::upload::{
    append_start_order, default_alt, is_valid_upload, storage_filename, StampSource, UploadedFile,
};
use catalog_db::models::image::{CreateProductImage, ProductImage};
use catalog_db::repositories::ImageRepo;

/// Subdirectory (and public URL segment) for product image files.
const STORAGE_SUBDIR: &str = "products";

/// Record-store seam for image rows.
///
/// The production implementation is [`PgImageRecords`]; tests use an
/// in-memory double so the attachment semantics can be exercised
/// without a database.
#[async_trait]
pub trait ImageRecords: Send + Sync {
    /// Insert a record, returning the stored row.
    async fn create(&self, input: &CreateProductImage) -> Result<ProductImage, CoreError>;

    /// All records for a product, ascending by display order.
    async fn list_by_product(&self, product_id: DbId) -> Result<Vec<ProductImage>, CoreError>;

    /// A record, only if it belongs to the given product.
    async fn find_owned(
        &self,
        product_id: DbId,
        image_id: DbId,
    ) -> Result<Option<ProductImage>, CoreError>;

    /// Delete a record by ID.
    async fn delete(&self, image_id: DbId) -> Result<(), CoreError>;
}

/// [`ImageRecords`] backed by the `product_images` table.
#[derive(Clone)]
pub struct PgImageRecords {
    pool: sqlx::PgPool,
}

impl PgImageRecords {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("image record store: {err}"))
}

#[async_trait]
impl ImageRecords for PgImageRecords {
    async fn create(&self, input: &CreateProductImage) -> Result<ProductImage, CoreError> {
        ImageRepo::create(&self.pool, input).await.map_err(db_err)
    }

    async fn list_by_product(&self, product_id: DbId) -> Result<Vec<ProductImage>, CoreError> {
        ImageRepo::list_by_product(&self.pool, product_id)
            .await
            .map_err(db_err)
    }

    async fn find_owned(
        &self,
        product_id: DbId,
        image_id: DbId,
    ) -> Result<Option<ProductImage>, CoreError> {
        ImageRepo::find_owned(&self.pool, product_id, image_id)
            .await
            .map_err(db_err)
    }

    async fn delete(&self, image_id: DbId) -> Result<(), CoreError> {
        ImageRepo::delete(&self.pool, image_id).await.map_err(db_err)
    }
}

/// Manages the ordered image collection of a product.
pub struct ImageAttachmentManager<R, F> {
    records: R,
    files: F,
    stamps: Arc<dyn StampSource>,
}

/// The manager wired for production.
pub type AppImageManager =
    ImageAttachmentManager<PgImageRecords, catalog_core::storage::LocalFileStore>;

impl<R: ImageRecords, F: FileStore> ImageAttachmentManager<R, F> {
    pub fn new(records: R, files: F, stamps: Arc<dyn StampSource>) -> Self {
        Self {
            records,
            files,
            stamps,
        }
    }

    /// Attach uploaded files to a product, in input order, starting at
    /// `start_order`.
    ///
    /// Per file: invalid uploads are skipped silently; a file-write
    /// failure skips that entry without rolling back earlier ones.
    /// Skipped files do not reserve an order slot -- each created
    /// record gets `start_order + its position among created records`.
    pub async fn attach(
        &self,
        product_id: DbId,
        product_name: &str,
        files: &[UploadedFile],
        start_order: i32,
    ) -> Result<Vec<ProductImage>, CoreError> {
        let stamp = self.stamps.stamp();
        let mut created = Vec::new();

        for (batch_index, file) in files.iter().enumerate() {
            if !is_valid_upload(file) {
                tracing::debug!(
                    product_id,
                    batch_index,
                    name = %file.original_name,
                    "Skipping invalid upload"
                );
                continue;
            }
            // is_valid_upload guarantees the extension is present.
            let Some(ext) = file.extension() else {
                continue;
            };

            let filename = storage_filename(product_id, stamp, batch_index, &ext);
            let path = format!("{STORAGE_SUBDIR}/{filename}");

            if let Err(err) = self.files.write(&path, &file.bytes).await {
                tracing::warn!(
                    product_id,
                    batch_index,
                    path,
                    error = %err,
                    "File write failed; skipping upload"
                );
                continue;
            }

            let order = start_order + created.len() as i32;
            let record = self
                .records
                .create(&CreateProductImage {
                    product_id,
                    path,
                    alt: default_alt(product_name, i64::from(order) + 1),
                    sort_order: order,
                })
                .await?;
            created.push(record);
        }

        Ok(created)
    }

    /// Remove the given images from a product.
    ///
    /// Ids that do not resolve to an image of this product are ignored.
    /// The backing file is deleted first (a missing file is success);
    /// the record is removed regardless of the file outcome.
    pub async fn detach(&self, product_id: DbId, image_ids: &[DbId]) -> Result<(), CoreError> {
        for &image_id in image_ids {
            let Some(image) = self.records.find_owned(product_id, image_id).await? else {
                continue;
            };
            if let Err(err) = self.files.delete(&image.path).await {
                tracing::warn!(
                    product_id,
                    image_id,
                    path = %image.path,
                    error = %err,
                    "File delete failed; removing record anyway"
                );
            }
            self.records.delete(image_id).await?;
        }
        Ok(())
    }

    /// Composite operation used by product update: deletions first,
    /// then new files appended after the remaining images.
    ///
    /// The start order is `max(order) + 1` over what remains *after*
    /// deletion (0 if nothing remains). This delete-then-append order
    /// determines final display order and is load-bearing.
    pub async fn attach_during_update(
        &self,
        product_id: DbId,
        product_name: &str,
        files: &[UploadedFile],
        deleted_image_ids: &[DbId],
    ) -> Result<Vec<ProductImage>, CoreError> {
        self.detach(product_id, deleted_image_ids).await?;

        if files.is_empty() {
            return Ok(Vec::new());
        }

        let remaining = self.records.list_by_product(product_id).await?;
        let orders: Vec<i32> = remaining.iter().map(|img| img.sort_order).collect();
        let start_order = append_start_order(&orders);

        self.attach(product_id, product_name, files, start_order).await
    }

    /// Delete every image record and backing file for a product.
    /// Invoked when the owning product is deleted.
    pub async fn cascade_delete(&self, product_id: DbId) -> Result<(), CoreError> {
        let images = self.records.list_by_product(product_id).await?;
        for image in images {
            if let Err(err) = self.files.delete(&image.path).await {
                tracing::warn!(
                    product_id,
                    image_id = image.id,
                    path = %image.path,
                    error = %err,
                    "File delete failed during cascade; removing record anyway"
                );
            }
            self.records.delete(image.id).await?;
        }
        Ok(())
    }

    /// All images of a product, ascending by display order.
    pub async fn list(&self, product_id: DbId) -> Result<Vec<ProductImage>, CoreError> {
        self.records.list_by_product(product_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    // Smallest valid 1x1 GIF, enough for format sniffing.
    const GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
        0x00, 0x00, 0xff, 0xff, 0xff, 0x2c, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00,
        0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
    ];

    fn valid(name: &str) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            bytes: GIF.to_vec(),
        }
    }

    fn corrupt(name: &str) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            bytes: Vec::new(),
        }
    }

    /// In-memory [`ImageRecords`] double. Clones share state, the way
    /// clones of the pool-backed [`PgImageRecords`] share a database.
    #[derive(Clone, Default)]
    struct MemoryRecords {
        rows: Arc<Mutex<Vec<ProductImage>>>,
        next_id: Arc<Mutex<DbId>>,
    }

    #[async_trait]
    impl ImageRecords for MemoryRecords {
        async fn create(&self, input: &CreateProductImage) -> Result<ProductImage, CoreError> {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let row = ProductImage {
                id: *next,
                product_id: input.product_id,
                path: input.path.clone(),
                alt: input.alt.clone(),
                sort_order: input.sort_order,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn list_by_product(&self, product_id: DbId) -> Result<Vec<ProductImage>, CoreError> {
            let mut rows: Vec<ProductImage> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.product_id == product_id)
                .cloned()
                .collect();
            rows.sort_by_key(|r| r.sort_order);
            Ok(rows)
        }

        async fn find_owned(
            &self,
            product_id: DbId,
            image_id: DbId,
        ) -> Result<Option<ProductImage>, CoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == image_id && r.product_id == product_id)
                .cloned())
        }

        async fn delete(&self, image_id: DbId) -> Result<(), CoreError> {
            self.rows.lock().unwrap().retain(|r| r.id != image_id);
            Ok(())
        }
    }

    /// In-memory [`FileStore`] double, `Arc`-shared like [`MemoryRecords`].
    #[derive(Clone, Default)]
    struct MemoryFiles {
        blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    #[async_trait]
    impl FileStore for MemoryFiles {
        async fn write(&self, path: &str, bytes: &[u8]) -> Result<(), CoreError> {
            self.blobs
                .lock()
                .unwrap()
                .insert(path.to_string(), bytes.to_vec());
            Ok(())
        }

        async fn exists(&self, path: &str) -> bool {
            self.blobs.lock().unwrap().contains_key(path)
        }

        async fn delete(&self, path: &str) -> Result<(), CoreError> {
            // Idempotent: deleting a missing path is success.
            self.blobs.lock().unwrap().remove(path);
            Ok(())
        }
    }

    /// Deterministic stamps: one fresh value per batch, so test batches
    /// never collide on storage paths the way same-millisecond batches
    /// would not in production either.
    struct SeqStamps(Mutex<i64>);

    impl StampSource for SeqStamps {
        fn stamp(&self) -> i64 {
            let mut next = self.0.lock().unwrap();
            let current = *next;
            *next += 1;
            current
        }
    }

    type TestManager = ImageAttachmentManager<MemoryRecords, MemoryFiles>;

    fn manager() -> (TestManager, MemoryFiles) {
        let files = MemoryFiles::default();
        let mgr = ImageAttachmentManager::new(
            MemoryRecords::default(),
            files.clone(),
            Arc::new(SeqStamps(Mutex::new(1_700_000_000_000))),
        );
        (mgr, files)
    }

    #[tokio::test]
    async fn invalid_file_in_batch_does_not_reserve_an_order_slot() {
        let (mgr, files) = manager();

        let created = mgr
            .attach(
                1,
                "Desk Lamp",
                &[valid("a.gif"), corrupt("b.gif"), valid("c.gif")],
                0,
            )
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(created[0].sort_order, 0);
        assert_eq!(created[1].sort_order, 1);
        assert_eq!(created[0].alt, "Desk Lamp - Image 1");
        assert_eq!(created[1].alt, "Desk Lamp - Image 2");

        // Filenames keep the raw batch position, so the stored paths
        // of the two survivors are positions 0 and 2.
        assert!(files.exists("products/product_1_1700000000000_0.gif").await);
        assert!(files.exists("products/product_1_1700000000000_2.gif").await);
    }

    #[tokio::test]
    async fn update_appends_after_post_delete_max_order() {
        let (mgr, files) = manager();

        // Existing images at orders [0, 1, 2].
        let existing = mgr
            .attach(
                1,
                "Desk Lamp",
                &[valid("a.gif"), valid("b.gif"), valid("c.gif")],
                0,
            )
            .await
            .unwrap();
        let middle = &existing[1];
        assert_eq!(middle.sort_order, 1);

        // Delete the order-1 image, then append two new files.
        let added = mgr
            .attach_during_update(
                1,
                "Desk Lamp",
                &[valid("d.gif"), valid("e.gif")],
                &[middle.id],
            )
            .await
            .unwrap();

        // Remaining [0, 2]; max is 2, so new images land at 3 and 4.
        assert_eq!(added.len(), 2);
        assert_eq!(added[0].sort_order, 3);
        assert_eq!(added[1].sort_order, 4);

        let orders: Vec<i32> = mgr.list(1).await.unwrap().iter().map(|i| i.sort_order).collect();
        assert_eq!(orders, vec![0, 2, 3, 4]);

        // The detached image's backing file is gone.
        assert!(!files.exists(&middle.path).await);
    }

    #[tokio::test]
    async fn detach_ignores_foreign_and_stale_ids() {
        let (mgr, files) = manager();

        let mine = mgr.attach(1, "Mine", &[valid("a.gif")], 0).await.unwrap();
        let theirs = mgr.attach(2, "Theirs", &[valid("b.gif")], 0).await.unwrap();

        // An id owned by another product, an id that does not exist,
        // and a real one.
        mgr.detach(1, &[theirs[0].id, 999, mine[0].id]).await.unwrap();

        assert!(mgr.list(1).await.unwrap().is_empty());
        // Product 2 is untouched.
        assert_eq!(mgr.list(2).await.unwrap().len(), 1);
        assert!(files.exists(&theirs[0].path).await);
    }

    #[tokio::test]
    async fn detach_with_missing_backing_file_still_removes_record() {
        let (mgr, files) = manager();

        let created = mgr.attach(1, "Lamp", &[valid("a.gif")], 0).await.unwrap();
        // Simulate a file that vanished outside the manager.
        files.delete(&created[0].path).await.unwrap();

        mgr.detach(1, &[created[0].id]).await.unwrap();
        assert!(mgr.list(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cascade_delete_removes_only_the_owners_images() {
        let (mgr, files) = manager();

        mgr.attach(1, "Mine", &[valid("a.gif"), valid("b.gif")], 0)
            .await
            .unwrap();
        let theirs = mgr.attach(2, "Theirs", &[valid("c.gif")], 0).await.unwrap();

        mgr.cascade_delete(1).await.unwrap();

        assert!(mgr.list(1).await.unwrap().is_empty());
        assert_eq!(mgr.list(2).await.unwrap().len(), 1);
        assert!(files.exists(&theirs[0].path).await);
        assert!(!files.exists("products/product_1_1700000000000_0.gif").await);
    }

    #[tokio::test]
    async fn listing_is_ascending_with_gaps() {
        let (mgr, _files) = manager();

        let created = mgr
            .attach(
                1,
                "Lamp",
                &[valid("a.gif"), valid("b.gif"), valid("c.gif"), valid("d.gif")],
                0,
            )
            .await
            .unwrap();
        mgr.detach(1, &[created[1].id]).await.unwrap();

        let orders: Vec<i32> = mgr.list(1).await.unwrap().iter().map(|i| i.sort_order).collect();
        assert_eq!(orders, vec![0, 2, 3]);
    }
}

//! Image upload rules and filename generation.
//!
//! Batch uploads are best-effort per file: a file that fails
//! [`is_valid_upload`] is skipped and the rest of the batch proceeds.
//! Stored filenames are built from the owning product id, a millisecond
//! stamp, and the file's position in its batch, so concurrent writers
//! never target the same path. The stamp comes from a [`StampSource`]
//! rather than the ambient clock so tests can pin it.

use image::guess_format;

/// Maximum number of image files accepted in a single request.
pub const MAX_FILES_PER_REQUEST: usize = 5;

/// Maximum accepted size per file (2 MiB).
pub const MAX_FILE_BYTES: usize = 2 * 1024 * 1024;

/// Accepted file extensions, matched case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];

/// An uploaded file, decoded out of the multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename; only its extension is trusted.
    pub original_name: String,
    /// Raw file body.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Lowercased extension of the original filename, if any.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.original_name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }
}

/// Basic validity check applied to each file in a batch.
///
/// A file is valid when it is non-empty, within the size limit, carries
/// an allowed extension, and its magic bytes sniff as a real image
/// format. Invalid files are skipped silently by the attachment
/// manager; they never abort the batch.
pub fn is_valid_upload(file: &UploadedFile) -> bool {
    if file.bytes.is_empty() || file.bytes.len() > MAX_FILE_BYTES {
        return false;
    }
    let Some(ext) = file.extension() else {
        return false;
    };
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return false;
    }
    guess_format(&file.bytes).is_ok()
}

/// Build the storage-unique filename for one file of a batch.
///
/// Convention: `product_{product_id}_{stamp}_{batch_index}.{ext}`.
/// Distinct products, request stamps, and batch positions can never
/// collide on a path.
pub fn storage_filename(product_id: i64, stamp: i64, batch_index: usize, ext: &str) -> String {
    format!("product_{product_id}_{stamp}_{batch_index}.{ext}")
}

/// Default alt text for an image at a 1-based display position.
pub fn default_alt(product_name: &str, position: i64) -> String {
    format!("{product_name} - Image {position}")
}

/// Starting order for images appended after a deletion pass.
///
/// `max(remaining orders) + 1`, or 0 when no images remain. Orders are
/// not required to be contiguous, only ascending.
pub fn append_start_order(remaining_orders: &[i32]) -> i32 {
    remaining_orders.iter().max().map_or(0, |max| max + 1)
}

/// Source of millisecond stamps for filename generation.
pub trait StampSource: Send + Sync {
    fn stamp(&self) -> i64;
}

/// Wall-clock stamps, used by the running server.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemStamps;

impl StampSource for SystemStamps {
    fn stamp(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid 1x1 GIF, enough for format sniffing.
    const GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
        0x00, 0x00, 0xff, 0xff, 0xff, 0x2c, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00,
        0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
    ];

    fn gif(name: &str) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            bytes: GIF.to_vec(),
        }
    }

    #[test]
    fn valid_image_passes() {
        assert!(is_valid_upload(&gif("photo.gif")));
        assert!(is_valid_upload(&gif("PHOTO.GIF")));
    }

    #[test]
    fn empty_body_is_invalid() {
        let file = UploadedFile {
            original_name: "photo.gif".to_string(),
            bytes: Vec::new(),
        };
        assert!(!is_valid_upload(&file));
    }

    #[test]
    fn oversize_body_is_invalid() {
        let file = UploadedFile {
            original_name: "photo.gif".to_string(),
            bytes: vec![0u8; MAX_FILE_BYTES + 1],
        };
        assert!(!is_valid_upload(&file));
    }

    #[test]
    fn disallowed_or_missing_extension_is_invalid() {
        assert!(!is_valid_upload(&gif("photo.tiff")));
        assert!(!is_valid_upload(&gif("photo")));
        assert!(!is_valid_upload(&gif(".")));
    }

    #[test]
    fn garbage_bytes_are_invalid() {
        let file = UploadedFile {
            original_name: "photo.png".to_string(),
            bytes: vec![0u8; 64],
        };
        assert!(!is_valid_upload(&file));
    }

    #[test]
    fn filename_convention() {
        assert_eq!(
            storage_filename(42, 1_700_000_000_123, 2, "png"),
            "product_42_1700000000123_2.png"
        );
    }

    #[test]
    fn alt_text_numbers_from_one() {
        assert_eq!(default_alt("Desk Lamp", 1), "Desk Lamp - Image 1");
        assert_eq!(default_alt("Desk Lamp", 3), "Desk Lamp - Image 3");
    }

    #[test]
    fn start_order_is_max_remaining_plus_one() {
        assert_eq!(append_start_order(&[0, 2]), 3);
        assert_eq!(append_start_order(&[0, 1, 2]), 3);
        assert_eq!(append_start_order(&[]), 0);
        // Non-contiguous orders after deletions.
        assert_eq!(append_start_order(&[5]), 6);
    }
}

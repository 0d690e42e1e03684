//! Upload validation and stored-filename derivation.
//!
//! Both checks run before any backend I/O: a rejected upload never touches
//! storage or the database.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::constants::{ALLOWED_CONTENT_TYPES, FALLBACK_EXTENSION, MAX_DOCUMENT_SIZE_BYTES};
use crate::error::AppError;

/// Validate the declared size against the fixed 10 MiB cap.
pub fn validate_file_size(file_size: i64) -> Result<(), AppError> {
    if file_size > MAX_DOCUMENT_SIZE_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "File size {} exceeds maximum of {} bytes",
            file_size, MAX_DOCUMENT_SIZE_BYTES
        )));
    }
    Ok(())
}

/// Validate the MIME type against the fixed allow-list.
pub fn validate_content_type(mime_type: &str) -> Result<(), AppError> {
    if !ALLOWED_CONTENT_TYPES.contains(&mime_type) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported content type: {}",
            mime_type
        )));
    }
    Ok(())
}

/// Extension of `filename` after its last dot, or `bin` when the name has
/// no usable extension (no dot, trailing dot, or a leading-dot-only name).
pub fn file_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
        _ => FALLBACK_EXTENSION,
    }
}

/// Derive the stored filename for an upload:
/// `{document_type}_{YYYYMMDD_HHMMSS}_{id8}.{extension}`.
///
/// The first 8 hex digits of the document id make the name
/// collision-resistant even for same-type uploads within one second.
pub fn stored_filename(
    document_type: &str,
    original_filename: &str,
    id: Uuid,
    uploaded_at: DateTime<Utc>,
) -> String {
    let short_id = id.simple().to_string();
    format!(
        "{}_{}_{}.{}",
        document_type,
        uploaded_at.format("%Y%m%d_%H%M%S"),
        &short_id[..8],
        file_extension(original_filename)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_size_cap() {
        assert!(validate_file_size(MAX_DOCUMENT_SIZE_BYTES).is_ok());
        assert!(matches!(
            validate_file_size(MAX_DOCUMENT_SIZE_BYTES + 1),
            Err(AppError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn test_content_type_allow_list() {
        assert!(validate_content_type("application/pdf").is_ok());
        assert!(validate_content_type("image/png").is_ok());
        assert!(matches!(
            validate_content_type("application/zip"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(validate_content_type("text/html").is_err());
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Resume.pdf"), "pdf");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("noextension"), "bin");
        assert_eq!(file_extension("trailing."), "bin");
        assert_eq!(file_extension(".gitignore"), "bin");
    }

    #[test]
    fn test_stored_filename_shape() {
        let id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let name = stored_filename("cv", "Resume.pdf", id, at);
        assert_eq!(name, "cv_20250101_100000_123e4567.pdf");
    }

    #[test]
    fn test_stored_filename_fallback_extension() {
        let id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
        let at = Utc.with_ymd_and_hms(2025, 11, 13, 12, 0, 0).unwrap();
        let name = stored_filename("carta_presentacion", "cover letter", id, at);
        assert_eq!(name, "carta_presentacion_20251113_120000_123e4567.bin");
    }
}

//! Shared key generation for storage backends.
//!
//! Key format: `documents/{YYYY}/{MM}/{filename}`.

use chrono::{DateTime, Datelike, Utc};

/// Generate the storage key for a stored filename, partitioned by the
/// upload year and month. All backends must use this format so the key
/// stays portable between them.
pub fn generate_storage_key(uploaded_at: DateTime<Utc>, filename: &str) -> String {
    format!(
        "documents/{:04}/{:02}/{}",
        uploaded_at.year(),
        uploaded_at.month(),
        filename
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_layout() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(
            generate_storage_key(at, "cv_20250101_100000_123e4567.pdf"),
            "documents/2025/01/cv_20250101_100000_123e4567.pdf"
        );
    }
}

//! One-based page arithmetic shared by every listing.

use crate::error::AppError;

/// Convert a one-based `(page, page_size)` pair into a row offset.
///
/// Both values must be at least 1.
pub fn page_offset(page: u64, page_size: u64) -> Result<u64, AppError> {
    if page < 1 || page_size < 1 {
        return Err(AppError::BadRequest(
            "page and page_size must be at least 1".to_string(),
        ));
    }
    Ok((page - 1) * page_size)
}

/// Whether rows beyond the given page exist.
#[must_use]
pub const fn has_more(page: u64, page_size: u64, total: u64) -> bool {
    page.saturating_mul(page_size) < total
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset_is_zero_based() {
        assert_eq!(page_offset(1, 20).unwrap(), 0);
        assert_eq!(page_offset(3, 10).unwrap(), 20);
    }

    #[test]
    fn test_page_offset_rejects_zero() {
        assert!(page_offset(0, 20).is_err());
        assert!(page_offset(1, 0).is_err());
    }

    #[test]
    fn test_has_more() {
        assert!(has_more(1, 10, 11));
        assert!(!has_more(2, 10, 20));
        assert!(!has_more(1, 10, 10));
    }
}

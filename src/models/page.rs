//! Pagination and sorting types shared by the catalog listings

use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Sort direction for paginated listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

pub(crate) fn default_size() -> i64 {
    1
}

/// Row offset of a page slice. None means the product overflows i64, which
/// puts the page past the end of any possible data set.
pub(crate) fn page_offset(page: i64, size: i64) -> Option<i64> {
    page.checked_mul(size)
}

/// Reject page parameters outside the accepted range. Pages past the end of
/// the data are not an error; they yield an empty slice.
pub fn validate_page_params(page: i64, size: i64) -> AppResult<()> {
    if page < 0 {
        return Err(AppError::Validation("page must be 0 or greater".to_string()));
    }
    if size < 1 {
        return Err(AppError::Validation("size must be at least 1".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_sql() {
        assert_eq!(SortOrder::Asc.sql(), "ASC");
        assert_eq!(SortOrder::Desc.sql(), "DESC");
    }

    #[test]
    fn test_page_params() {
        assert!(validate_page_params(0, 1).is_ok());
        assert!(validate_page_params(100, 50).is_ok());
        assert!(validate_page_params(-1, 1).is_err());
        assert!(validate_page_params(0, 0).is_err());
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(0, 20), Some(0));
        assert_eq!(page_offset(3, 20), Some(60));
        // An overflowing offset is past the end of any data set
        assert_eq!(page_offset(i64::MAX, 2), None);
        assert_eq!(page_offset(i64::MAX, 1), Some(i64::MAX));
    }
}

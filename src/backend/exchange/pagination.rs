//! Pagination parameters for history listing.
//!
//! `limit` falls back to 10 when absent, unparsable or below 1; `offset`
//! falls back to 0 when absent, unparsable or negative.

use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_OFFSET: i64 = 0;

/// Normalized `limit`/`offset` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.filter(|l| *l >= 1).unwrap_or(DEFAULT_LIMIT),
            offset: offset.filter(|o| *o >= 0).unwrap_or(DEFAULT_OFFSET),
        }
    }

    /// Build from raw query-string values
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<i64>().ok());
        Self::new(parse(limit), parse(offset))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Raw `?limit=&offset=` query, kept as strings so bad values fall back to
/// defaults instead of rejecting the request
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl From<PageQuery> for Pagination {
    fn from(query: PageQuery) -> Self {
        Pagination::from_query(query.limit.as_deref(), query.offset.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Pagination::default(), Pagination { limit: 10, offset: 0 });
        assert_eq!(Pagination::from_query(None, None), Pagination::default());
    }

    #[test]
    fn test_valid_values_are_kept() {
        assert_eq!(
            Pagination::from_query(Some("25"), Some("50")),
            Pagination { limit: 25, offset: 50 }
        );
        assert_eq!(
            Pagination::from_query(Some(" 3 "), Some("0")),
            Pagination { limit: 3, offset: 0 }
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        assert_eq!(
            Pagination::from_query(Some("abc"), Some("-4")),
            Pagination::default()
        );
        assert_eq!(Pagination::new(Some(0), Some(-1)), Pagination::default());
        assert_eq!(Pagination::from_query(Some("1.5"), Some("")), Pagination::default());
    }

    #[test]
    fn test_from_page_query() {
        let query = PageQuery {
            limit: Some("1".to_string()),
            offset: None,
        };
        assert_eq!(Pagination::from(query), Pagination { limit: 1, offset: 0 });
    }
}

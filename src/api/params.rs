//! Query-string parameters and their range checks. Checks run in the handler
//! before any connection is taken from the pool.

use serde::Deserialize;

use crate::config::limits::Bounds;
use crate::config::MIN_SEARCH_LEN;
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchMarketsParams {
    pub query: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ClosingSoonParams {
    pub hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchTagsParams {
    pub name: String,
    pub limit: Option<i64>,
}

/// Applies the default when absent; rejects values outside `[min, max]`.
pub fn validate_range(field: &'static str, value: Option<i64>, bounds: Bounds) -> Result<i64> {
    let (min, max, default) = bounds;
    let value = value.unwrap_or(default);
    if value < min || value > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} (got {value})"
        )));
    }
    Ok(value)
}

/// Search terms are matched as-is; only their length (in characters) is checked.
pub fn validate_search_term<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    if value.chars().count() < MIN_SEARCH_LEN {
        return Err(AppError::Validation(format!(
            "{field} must be at least {MIN_SEARCH_LEN} characters"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::limits;

    #[test]
    fn default_used_when_absent() {
        assert_eq!(validate_range("limit", None, limits::TOP_MARKETS).unwrap(), 10);
        assert_eq!(validate_range("limit", None, limits::SEARCH_MARKETS).unwrap(), 50);
        assert_eq!(validate_range("limit", None, limits::EVENT_MARKETS).unwrap(), 200);
        assert_eq!(validate_range("hours", None, limits::CLOSING_SOON_HOURS).unwrap(), 48);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(validate_range("limit", Some(1), limits::TOP_MARKETS).unwrap(), 1);
        assert_eq!(validate_range("limit", Some(100), limits::TOP_MARKETS).unwrap(), 100);
        assert_eq!(validate_range("limit", Some(500), limits::EVENT_MARKETS).unwrap(), 500);
        assert_eq!(validate_range("hours", Some(168), limits::CLOSING_SOON_HOURS).unwrap(), 168);
    }

    #[test]
    fn out_of_range_names_the_constraint() {
        let err = validate_range("limit", Some(0), limits::TOP_MARKETS).unwrap_err();
        assert_eq!(err.to_string(), "limit must be between 1 and 100 (got 0)");

        let err = validate_range("hours", Some(169), limits::CLOSING_SOON_HOURS).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(validate_range("limit", Some(201), limits::SEARCH_TAGS).is_err());
    }

    #[test]
    fn search_term_length() {
        assert!(validate_search_term("query", "w").is_err());
        assert!(validate_search_term("query", "").is_err());
        assert_eq!(validate_search_term("query", "gs").unwrap(), "gs");
        // Counted in characters, not bytes.
        assert!(validate_search_term("name", "é").is_err());
        assert!(validate_search_term("name", "éé").is_ok());
    }
}

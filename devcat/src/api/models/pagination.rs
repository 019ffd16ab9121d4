//! Page-number pagination for list endpoints.
//!
//! The raw query values are kept as strings so that a non-numeric `page` or `limit` gets the
//! same field-specific 400 as an out-of-range one, instead of a generic query rejection.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::{Error, Result};

/// Page returned when `page` is not given.
pub const DEFAULT_PAGE: u32 = 1;

/// Number of items per page when `limit` is not given.
pub const DEFAULT_LIMIT: u32 = 3;

/// Maximum number of items that can be requested per page.
pub const MAX_LIMIT: u32 = 100;

/// Query parameters for paginated listings
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct Pagination {
    /// 1-based page number (default: 1)
    #[param(value_type = Option<u32>, default = 1, minimum = 1)]
    pub page: Option<String>,

    /// Items per page (default: 3, max: 100)
    #[param(value_type = Option<u32>, default = 3, minimum = 1, maximum = 100)]
    pub limit: Option<String>,
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Number of items before this page in store order
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Pagination {
    pub fn validate(&self) -> Result<PageRequest> {
        let page = match self.page.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_PAGE,
            Some(raw) => raw.parse::<u32>().ok().filter(|p| *p >= 1).ok_or_else(|| Error::BadRequest {
                message: "page must be a positive integer".to_string(),
            })?,
        };

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_LIMIT,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|l| (1..=MAX_LIMIT).contains(l))
                .ok_or_else(|| Error::BadRequest {
                    message: format!("limit must be an integer between 1 and {MAX_LIMIT}"),
                })?,
        };

        Ok(PageRequest { page, limit })
    }
}

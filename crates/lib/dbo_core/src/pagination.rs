//! Page arithmetic for list endpoints.
//!
//! A `limit` of 0 means "no limit": the whole result set is one page.
//! Requests for a page beyond the last one are rejected by the list
//! orchestration with `PageOutOfRange`, never answered with an empty page.

use crate::error::{ServiceError, ServiceResult};
use crate::models::ListQuery;

/// Parse the raw `limit` query value. Empty means unbounded (0).
pub fn parse_limit(raw: Option<&str>) -> ServiceResult<i64> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(0);
    }
    match raw.parse::<i64>() {
        Ok(limit) if limit >= 0 => Ok(limit),
        _ => Err(ServiceError::BadRequest(format!(
            "limit must be a non-negative integer, got {raw:?}"
        ))),
    }
}

/// Parse the raw `page` query value. Empty means the first page.
pub fn parse_page(raw: Option<&str>) -> ServiceResult<i64> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(1);
    }
    raw.parse::<i64>()
        .map_err(|_| ServiceError::BadRequest(format!("page must be an integer, got {raw:?}")))
}

/// Build a `ListQuery` from raw query-string values.
pub fn parse_list_query(
    keyword: Option<String>,
    limit: Option<&str>,
    page: Option<&str>,
) -> ServiceResult<ListQuery> {
    Ok(ListQuery::new(keyword, parse_limit(limit)?, parse_page(page)?))
}

/// Effective page: anything below 1 is the first page.
pub fn resolve_page(requested: i64) -> i64 {
    if requested <= 0 { 1 } else { requested }
}

/// Number of pages for `total_count` rows at `limit` rows per page; never 0.
pub fn total_pages(limit: i64, total_count: i64) -> i64 {
    if limit <= 0 {
        return 1;
    }
    let total_count = total_count.max(0);
    let pages = total_count / limit + i64::from(total_count % limit != 0);
    pages.max(1)
}

/// Rows to skip before `page`.
pub fn offset(page: i64, limit: i64) -> i64 {
    (resolve_page(page) - 1).saturating_mul(limit.max(0))
}

/// Resolved page window for one list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub total_pages: i64,
    pub offset: i64,
    /// `None` when unbounded.
    pub limit: Option<i64>,
}

impl PageWindow {
    /// Resolve the window, failing when the requested page is past the end.
    pub fn resolve(requested_page: i64, limit: i64, total_count: i64) -> ServiceResult<Self> {
        let page = resolve_page(requested_page);
        let total_pages = total_pages(limit, total_count);
        if page > total_pages {
            return Err(ServiceError::PageOutOfRange { page, total_pages });
        }
        Ok(Self {
            page,
            total_pages,
            offset: offset(page, limit),
            limit: (limit > 0).then_some(limit),
        })
    }
}

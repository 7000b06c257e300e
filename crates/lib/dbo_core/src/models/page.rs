//! List queries and paged results shared by every resource.

use serde::Serialize;

/// Parsed list parameters: optional keyword, `limit` (0 = unbounded) and
/// the requested page (values below 1 are resolved to 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub keyword: Option<String>,
    pub limit: i64,
    pub page: i64,
}

impl ListQuery {
    pub fn new(keyword: Option<String>, limit: i64, page: i64) -> Self {
        Self {
            keyword: keyword.filter(|k| !k.is_empty()),
            limit,
            page,
        }
    }
}

/// One page of records plus the paging metadata echoed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub limit: i64,
    pub page: i64,
    pub total_page: i64,
}

/// Delete by id (account / order id, or credential username).
#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub id: String,
}

impl DeleteRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

//! Wire types: the response envelope and query/response DTOs.

use dbo_core::models::Page;
use serde::{Deserialize, Serialize};

pub const MSG_RETRIEVE: &str = "success retrieve data";
pub const MSG_CREATE: &str = "success create data";
pub const MSG_UPDATE: &str = "success update data";
pub const MSG_DELETE: &str = "success delete data";
pub const MSG_LOGIN: &str = "success login";

/// Uniform response body for every endpoint, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_page: Option<i64>,
}

impl<T> Envelope<T> {
    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            data: None,
            id: None,
            limit: None,
            page: None,
            total_page: None,
        }
    }

    pub fn data(message: &str, data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::new(true, message)
        }
    }

    pub fn id(message: &str, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::new(true, message)
        }
    }

    pub fn created(id: impl Into<String>, data: T) -> Self {
        Self {
            data: Some(data),
            id: Some(id.into()),
            ..Self::new(true, MSG_CREATE)
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn page(page: Page<T>) -> Self {
        Self {
            data: Some(page.data),
            limit: Some(page.limit),
            page: Some(page.page),
            total_page: Some(page.total_page),
            ..Self::new(true, MSG_RETRIEVE)
        }
    }
}

/// Raw list query string: `?keyword=&limit=&page=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub keyword: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

use crate::db::Pagination;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Helper function to create a standardized success response
pub fn success_response<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(data)).into_response()
}

/// Helper function to create a standardized created response
pub fn created_response<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Pagination block attached to every list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Page that was served, 1-based
    #[schema(example = 1)]
    pub current_page: u64,
    /// Number of pages at the current page size
    #[schema(example = 3)]
    pub total_pages: u64,
    /// Number of records matching the query across all pages
    #[schema(example = 25)]
    pub total_items: u64,
    /// Page size that was applied after clamping
    #[schema(example = 10)]
    pub items_per_page: u64,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, total_items: u64) -> Self {
        Self {
            current_page: pagination.page(),
            total_pages: pagination.total_pages(total_items),
            total_items,
            items_per_page: pagination.limit(),
        }
    }
}

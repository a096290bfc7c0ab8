use crate::errors::{ApiError, ServiceError};
use crate::handlers::common::created_response;
use crate::services::uploads::{is_allowed_image_type, UploadedImage};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Creates the router for upload endpoints
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/", post(upload_image))
}

/// Accept a multipart image and hand it to the configured image host
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "File rejected", body = crate::errors::ErrorResponse),
        (status = 502, description = "Image host unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "Uploads"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let limit = state.config.upload_max_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_allowed_image_type(&content_type) {
            return Err(ServiceError::invalid_field(
                "file",
                "Only JPEG, PNG, and WebP images are allowed",
            )
            .into());
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
        if bytes.len() > limit {
            return Err(
                ServiceError::invalid_field("file", "Image must be smaller than 5MB").into(),
            );
        }

        let url = state
            .uploads
            .store_image(UploadedImage {
                file_name,
                content_type,
                bytes,
            })
            .await?;

        return Ok(created_response(UploadResponse { url }));
    }

    Err(ServiceError::invalid_field("file", "File is required").into())
}

// Request/Response DTOs

/// Multipart form accepted by the upload endpoint
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// Image file to store (JPEG, PNG, or WebP, at most 5MB)
    #[schema(value_type = String, format = Binary)]
    pub file: String,
}

/// Location of a stored image
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL of the stored image
    #[schema(example = "https://images.example.com/uploads/ocean-view-villa.jpg")]
    pub url: String,
}

use crate::errors::ServiceError;
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Content types accepted for property images.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

/// A raw image received from a client, not yet handed to the host.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Somewhere that can durably store an image and hand back a public URL.
///
/// The rest of the application only ever sees the returned URL string.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn store_image(&self, image: UploadedImage) -> Result<String, ServiceError>;
}

/// `ImageHost` that forwards the image to an external hosting API as a
/// multipart POST and reads the public URL out of its JSON response.
pub struct HttpImageHost {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct HostedImage {
    url: String,
}

impl HttpImageHost {
    pub fn new(endpoint: Url, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build image host HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    #[instrument(skip(self, image), fields(content_type = %image.content_type, size = image.bytes.len()))]
    async fn store_image(&self, image: UploadedImage) -> Result<String, ServiceError> {
        let file_name = image.file_name.unwrap_or_else(|| "upload".to_string());
        let part = multipart::Part::bytes(image.bytes.to_vec())
            .file_name(file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ServiceError::InternalError(format!("Invalid image content type: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        let mut request = self.client.post(self.endpoint.clone()).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("Image host request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "Image host returned status {status}"
            )));
        }

        let hosted: HostedImage = response.json().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("Image host returned invalid response: {e}"))
        })?;

        info!(url = %hosted.url, "Stored image with host");
        Ok(hosted.url)
    }
}

/// Service for storing uploaded property images
#[derive(Clone)]
pub struct UploadService {
    image_host: Option<Arc<dyn ImageHost>>,
}

impl UploadService {
    /// Creates a new upload service; `None` means no host is configured and
    /// uploads will be refused.
    pub fn new(image_host: Option<Arc<dyn ImageHost>>) -> Self {
        Self { image_host }
    }

    /// Stores an image with the configured host and returns its public URL.
    pub async fn store_image(&self, image: UploadedImage) -> Result<String, ServiceError> {
        let host = self.image_host.as_deref().ok_or_else(|| {
            ServiceError::ExternalServiceError("Image host is not configured".to_string())
        })?;

        host.store_image(image).await
    }
}

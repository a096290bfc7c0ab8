use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use estate_api::entities::property::{self, Location, PropertyStatus, PropertyType};
use estate_api::services::uploads::{HttpImageHost, ImageHost};
use estate_api::{config::AppConfig, db, AppState};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tempfile::NamedTempFile;
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;

/// Helper harness for spinning up an application backed by a throwaway
/// SQLite database file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _db_file: NamedTempFile,
}

impl TestApp {
    /// Construct a new test application with fresh database state and no
    /// image host configured.
    pub async fn new() -> Self {
        Self::build(None).await
    }

    /// Construct a test application whose uploads are forwarded to the
    /// given image host endpoint.
    pub async fn with_image_host(endpoint: &str) -> Self {
        let endpoint = Url::parse(endpoint).expect("valid image host endpoint");
        let host: Arc<dyn ImageHost> = Arc::new(
            HttpImageHost::new(endpoint, None).expect("image host client for tests"),
        );
        Self::build(Some(host)).await
    }

    async fn build(image_host: Option<Arc<dyn ImageHost>>) -> Self {
        let db_file = NamedTempFile::new().expect("create temp database file");
        let database_url = format!("sqlite://{}?mode=rwc", db_file.path().display());

        // Minimal configuration suitable for tests.
        let mut cfg = AppConfig::new(
            database_url,
            "127.0.0.1".to_string(),
            13_001,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg, image_host);

        // Mirror the serve-time body cap so oversized uploads reach the
        // handler's own limit check instead of the extractor default.
        let router = estate_api::app_router(state.clone()).layer(
            axum::extract::DefaultBodyLimit::max(state.config.max_body_size),
        );

        Self {
            router,
            state,
            _db_file: db_file,
        }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a single-file multipart request to the upload endpoint.
    pub async fn upload(
        &self,
        field_name: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> axum::response::Response {
        let boundary = "estate-test-boundary";
        let mut payload = Vec::new();
        payload.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        payload.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        payload.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        payload.extend_from_slice(bytes);
        payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/uploads")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .expect("failed to build multipart request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Insert a listing directly, pinning its creation time so ordering
    /// assertions are deterministic.
    pub async fn insert_property_at(
        &self,
        index: usize,
        created_at: DateTime<Utc>,
    ) -> property::Model {
        let model = property::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(format!("Listing {index:02}")),
            image: Set(format!(
                "https://images.example.com/listing-{index:02}.jpg"
            )),
            slug: Set(format!("listing-{index:02}")),
            location: Set(Location::Colombo),
            description: Set(format!("Seeded listing number {index:02} for paging tests.")),
            price: Set(dec!(10_000_000)),
            property_type: Set(PropertyType::SingleFamily),
            status: Set(PropertyStatus::ForSale),
            area: Set(1200.0),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        };

        model
            .insert(&*self.state.db)
            .await
            .expect("insert seeded property")
    }
}

/// Full valid create payload; callers override individual fields.
pub fn valid_property_payload(slug: &str) -> Value {
    serde_json::json!({
        "title": "Ocean View Villa",
        "image": "https://images.example.com/ocean-view-villa.jpg",
        "slug": slug,
        "location": "Galle",
        "description": "A breezy four-bedroom villa with uninterrupted ocean views.",
        "price": 45000000,
        "type": "Villa",
        "status": "For Sale",
        "area": 2400.0
    })
}

/// Read a response body as JSON, asserting the expected status first.
pub async fn read_json(response: axum::response::Response, expected: StatusCode) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    assert_eq!(
        status,
        expected,
        "unexpected status; body: {}",
        String::from_utf8_lossy(&bytes)
    );
    serde_json::from_slice(&bytes).expect("response body is not valid JSON")
}

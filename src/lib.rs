//! Estate API: a property catalog service.
//!
//! Exposes validated CRUD over real-estate listings with filtered,
//! paginated browsing and slug lookups, plus multipart image uploads
//! delegated to an external host. [`client::PropertyClient`] is the
//! consumer-side companion with mutation-aware caching.

// API consumer
pub mod client;

// Configuration
pub mod config;

// Database access
pub mod db;
pub mod entities;
pub mod migrator;

// HTTP surface
pub mod handlers;
pub mod health;
pub mod openapi;

// Domain services
pub mod services;

// Cross-cutting concerns
pub mod errors;
pub mod middleware_helpers;
pub mod tracing;

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

use config::AppConfig;
use db::DbPool;
use services::uploads::ImageHost;
use services::{PropertyService, UploadService};

/// Shared application state available to all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub properties: PropertyService,
    pub uploads: UploadService,
}

impl AppState {
    pub fn new(
        db: Arc<DbPool>,
        config: AppConfig,
        image_host: Option<Arc<dyn ImageHost>>,
    ) -> Self {
        Self {
            properties: PropertyService::new(db.clone()),
            uploads: UploadService::new(image_host),
            db,
            config,
        }
    }
}

/// Builds the `/api/v1` route tree
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/properties", handlers::property_routes())
        .nest("/uploads", handlers::upload_routes())
        .route("/status", get(api_status))
}

/// Reports service identity, version, and build metadata
pub async fn api_status() -> impl IntoResponse {
    Json(json!({
        "service": "estate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
        "built": option_env!("BUILD_TIME").unwrap_or("unknown"),
        "status": "operational",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Assembles the application router: versioned API, health endpoints, and
/// interactive documentation. Middleware layers are applied by the caller.
pub fn app_router(state: AppState) -> Router {
    let db = state.db.clone();

    Router::new()
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
        .nest("/health", health::health_routes(db))
        .merge(openapi::swagger_ui())
}

/// Commonly used types for building on or against the API.
pub mod prelude {
    pub use crate::client::{ClientError, ListQuery, PropertyClient};
    pub use crate::config::AppConfig;
    pub use crate::entities::property::{Location, PropertyStatus, PropertyType};
    pub use crate::errors::{ApiError, ErrorResponse, ServiceError};
    pub use crate::handlers::properties::{
        CreatePropertyRequest, PropertyListResponse, PropertyResponse, UpdatePropertyRequest,
    };
    pub use crate::services::{PropertyService, UploadService};
    pub use crate::AppState;
}

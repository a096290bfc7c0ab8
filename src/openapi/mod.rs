use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Estate API",
        version = "0.1.0",
        description = r#"
# Estate Property Catalog API

A REST API for managing real-estate listings: validated property records with
filtered, paginated browsing, slug-based lookups, and delegated image hosting.

## Features

- **Property Management**: Create, update, and delete property listings
- **Browsing**: Filter by location, status, and type, with free-text search
- **Slug Lookups**: Stable, human-readable URLs for individual listings
- **Image Uploads**: Multipart uploads forwarded to an external image host

## Error Handling

The API uses consistent error response formats with appropriate HTTP status codes:

```json
{
  "error": "Validation Failed",
  "message": "Validation failed",
  "errors": {
    "title": ["Title must be at least 3 characters long"]
  },
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

The list endpoint supports pagination with the following query parameters:
- `page`: Page number (default: 1)
- `limit`: Items per page (default: 10, max: 100)
- `search`: Case-insensitive match against title and description
        "#,
        contact(
            name = "Estate Support",
            email = "support@estate.example.com"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "https://api.estate.example.com", description = "Production server"),
        (url = "http://localhost:3001", description = "Local development")
    ),
    tags(
        (name = "Properties", description = "Property listing endpoints"),
        (name = "Uploads", description = "Image upload endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Properties
        crate::handlers::properties::create_property,
        crate::handlers::properties::list_properties,
        crate::handlers::properties::get_property_by_slug,
        crate::handlers::properties::get_property,
        crate::handlers::properties::update_property,
        crate::handlers::properties::delete_property,

        // Uploads
        crate::handlers::uploads::upload_image,

        // Health intentionally omitted from OpenAPI paths for now
    ),
    components(
        schemas(
            // Property types
            crate::handlers::properties::PropertyResponse,
            crate::handlers::properties::CreatePropertyRequest,
            crate::handlers::properties::UpdatePropertyRequest,
            crate::handlers::properties::PropertyListResponse,
            crate::handlers::properties::AppliedFilters,
            crate::handlers::properties::PropertyDeleted,
            crate::handlers::common::PaginationMeta,

            // Upload types
            crate::handlers::uploads::UploadForm,
            crate::handlers::uploads::UploadResponse,

            // Enum literals
            crate::entities::property::Location,
            crate::entities::property::PropertyType,
            crate::entities::property::PropertyStatus,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

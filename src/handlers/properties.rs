use crate::config::AppConfig;
use crate::db::{Pagination, PropertyFilter};
use crate::entities::property::{self, Location, PropertyStatus, PropertyType};
use crate::errors::{collect_field_errors, ApiError, ServiceError};
use crate::handlers::common::{created_response, success_response, PaginationMeta};
use crate::services::properties::{NewProperty, PropertyPatch};
use crate::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

const PRICE_MAX: Decimal = dec!(1_000_000_000);
const AREA_MIN: f64 = 1.0;
const AREA_MAX: f64 = 100_000.0;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new("^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

/// Creates the router for property endpoints
pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_property))
        .route("/", get(list_properties))
        .route("/slug/:slug", get(get_property_by_slug))
        .route("/:id", get(get_property))
        .route("/:id", patch(update_property))
        .route("/:id", delete(delete_property))
}

/// Create a new property listing
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Property created", body = PropertyResponse),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 409, description = "Slug already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn create_property(
    State(state): State<AppState>,
    Json(payload): Json<CreatePropertyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload)?;
    let input = payload.into_new_property()?;

    let created = state.properties.create_property(input).await?;

    Ok(created_response(PropertyResponse::from(created)))
}

/// List properties with filtering and pagination
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    params(ListPropertiesParams),
    responses(
        (status = 200, description = "Properties retrieved", body = PropertyListResponse)
    ),
    tag = "Properties"
)]
pub async fn list_properties(
    State(state): State<AppState>,
    Query(params): Query<ListPropertiesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, pagination) = params.into_query(&state.config);

    let (items, total) = state.properties.list_properties(&filter, pagination).await?;

    let data: Vec<PropertyResponse> = items.into_iter().map(PropertyResponse::from).collect();
    Ok(success_response(PropertyListResponse {
        data,
        pagination: PaginationMeta::new(pagination, total),
        filters: AppliedFilters::from(&filter),
    }))
}

/// Get a property by its URL slug
#[utoipa::path(
    get,
    path = "/api/v1/properties/slug/{slug}",
    params(
        ("slug" = String, Path, description = "Property slug")
    ),
    responses(
        (status = 200, description = "Property retrieved", body = PropertyResponse),
        (status = 404, description = "Property not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn get_property_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let found = state.properties.get_property_by_slug(&slug).await?;

    Ok(success_response(PropertyResponse::from(found)))
}

/// Get a property by ID
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    params(
        ("id" = String, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Property retrieved", body = PropertyResponse),
        (status = 404, description = "Property not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let found = state.properties.get_property(&id).await?;

    Ok(success_response(PropertyResponse::from(found)))
}

/// Apply a partial update to a property
#[utoipa::path(
    patch,
    path = "/api/v1/properties/{id}",
    params(
        ("id" = String, Path, description = "Property ID")
    ),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Property updated", body = PropertyResponse),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Slug already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePropertyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_payload(&payload)?;
    let patch = payload.into_patch()?;

    let updated = state.properties.update_property(&id, patch).await?;

    Ok(success_response(PropertyResponse::from(updated)))
}

/// Delete a property
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}",
    params(
        ("id" = String, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Property deleted", body = PropertyDeleted),
        (status = 404, description = "Property not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Properties"
)]
pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.properties.delete_property(&id).await?;

    Ok(success_response(PropertyDeleted::default()))
}

/// Validate a request body, reporting violations under their wire field names.
fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(|e| {
        let mut fields = collect_field_errors(&e);
        // The dwelling category is `type` on the wire.
        if let Some(messages) = fields.remove("property_type") {
            fields.insert("type".to_string(), messages);
        }
        ApiError::ServiceError(ServiceError::ValidationFailed(fields))
    })
}

fn validation_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn location_message() -> String {
    format!("Location must be one of: {}", Location::ALLOWED)
}

fn property_type_message() -> String {
    format!("Property type must be one of: {}", PropertyType::ALLOWED)
}

fn status_message() -> String {
    format!("Property status must be one of: {}", PropertyStatus::ALLOWED)
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let length = title.chars().count();
    if length < 3 {
        return Err(validation_error(
            "title_min",
            "Title must be at least 3 characters long",
        ));
    }
    if length > 100 {
        return Err(validation_error(
            "title_max",
            "Title must be less than 100 characters",
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    let length = description.chars().count();
    if length < 10 {
        return Err(validation_error(
            "description_min",
            "Description must be at least 10 characters long",
        ));
    }
    if length > 1000 {
        return Err(validation_error(
            "description_max",
            "Description must be less than 1000 characters",
        ));
    }
    Ok(())
}

fn validate_location(value: &str) -> Result<(), ValidationError> {
    if value.parse::<Location>().is_err() {
        return Err(validation_error("location_literal", location_message()));
    }
    Ok(())
}

fn validate_property_type(value: &str) -> Result<(), ValidationError> {
    if value.parse::<PropertyType>().is_err() {
        return Err(validation_error(
            "property_type_literal",
            property_type_message(),
        ));
    }
    Ok(())
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    if value.parse::<PropertyStatus>().is_err() {
        return Err(validation_error("status_literal", status_message()));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ONE {
        return Err(validation_error(
            "price_min",
            "Price must be greater than 0",
        ));
    }
    if *price > PRICE_MAX {
        return Err(validation_error("price_max", "Price is too high"));
    }
    Ok(())
}

fn validate_area(area: f64) -> Result<(), ValidationError> {
    if area < AREA_MIN {
        return Err(validation_error("area_min", "Area must be greater than 0"));
    }
    if area > AREA_MAX {
        return Err(validation_error("area_max", "Area is too large"));
    }
    Ok(())
}

fn parse_location(value: &str) -> Result<Location, ApiError> {
    value
        .parse()
        .map_err(|_| ServiceError::invalid_field("location", location_message()).into())
}

fn parse_property_type(value: &str) -> Result<PropertyType, ApiError> {
    value
        .parse()
        .map_err(|_| ServiceError::invalid_field("type", property_type_message()).into())
}

fn parse_status(value: &str) -> Result<PropertyStatus, ApiError> {
    value
        .parse()
        .map_err(|_| ServiceError::invalid_field("status", status_message()).into())
}

// Request/Response DTOs

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "title": "Ocean View Villa",
    "image": "https://images.example.com/ocean-view-villa.jpg",
    "slug": "ocean-view-villa",
    "location": "Galle",
    "description": "A breezy four-bedroom villa with uninterrupted ocean views.",
    "price": "45000000",
    "type": "Villa",
    "status": "For Sale",
    "area": 2400.0
}))]
pub struct CreatePropertyRequest {
    /// Listing headline
    #[validate(
        required(message = "Title is required"),
        custom = "validate_title"
    )]
    #[schema(example = "Ocean View Villa")]
    pub title: Option<String>,
    /// URL of the externally hosted listing image
    #[validate(
        required(message = "Image URL is required"),
        url(message = "Image must be a valid URL")
    )]
    #[schema(example = "https://images.example.com/ocean-view-villa.jpg")]
    pub image: Option<String>,
    /// URL-safe unique identifier
    #[validate(
        required(message = "Slug is required"),
        regex(
            path = "SLUG_RE",
            message = "Slug must be lowercase letters, numbers, and hyphens only"
        )
    )]
    #[schema(example = "ocean-view-villa")]
    pub slug: Option<String>,
    /// City the property is in
    #[validate(
        required(message = "Location is required"),
        custom = "validate_location"
    )]
    #[schema(example = "Galle")]
    pub location: Option<String>,
    /// Longer sales copy for the listing
    #[validate(
        required(message = "Description is required"),
        custom = "validate_description"
    )]
    pub description: Option<String>,
    /// Asking price
    #[validate(
        required(message = "Price must be a number"),
        custom = "validate_price"
    )]
    #[schema(example = "45000000")]
    pub price: Option<Decimal>,
    /// Dwelling category
    #[serde(rename = "type")]
    #[validate(
        required(message = "Property type is required"),
        custom = "validate_property_type"
    )]
    #[schema(example = "Villa")]
    pub property_type: Option<String>,
    /// Listing status
    #[validate(
        required(message = "Property status is required"),
        custom = "validate_status"
    )]
    #[schema(example = "For Sale")]
    pub status: Option<String>,
    /// Floor area in square feet
    #[validate(required(message = "Area must be a number"), custom = "validate_area")]
    #[schema(example = 2400.0)]
    pub area: Option<f64>,
}

impl CreatePropertyRequest {
    /// Convert the validated payload into service input. The enum parses
    /// repeat the validator checks so an unvalidated call still fails closed.
    fn into_new_property(self) -> Result<NewProperty, ApiError> {
        Ok(NewProperty {
            title: self.title.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            slug: self.slug.unwrap_or_default(),
            location: parse_location(self.location.as_deref().unwrap_or_default())?,
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            property_type: parse_property_type(self.property_type.as_deref().unwrap_or_default())?,
            status: parse_status(self.status.as_deref().unwrap_or_default())?,
            area: self.area.unwrap_or_default(),
        })
    }
}

/// Partial update payload; absent fields keep their stored values.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    #[validate(custom = "validate_title")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Ocean View Villa")]
    pub title: Option<String>,
    #[validate(url(message = "Image must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[validate(regex(
        path = "SLUG_RE",
        message = "Slug must be lowercase letters, numbers, and hyphens only"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "ocean-view-villa")]
    pub slug: Option<String>,
    #[validate(custom = "validate_location")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Galle")]
    pub location: Option<String>,
    #[validate(custom = "validate_description")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom = "validate_price")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "46500000")]
    pub price: Option<Decimal>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_property_type")]
    #[schema(example = "Villa")]
    pub property_type: Option<String>,
    #[validate(custom = "validate_status")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "For Rent")]
    pub status: Option<String>,
    #[validate(custom = "validate_area")]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 2400.0)]
    pub area: Option<f64>,
}

impl UpdatePropertyRequest {
    fn into_patch(self) -> Result<PropertyPatch, ApiError> {
        Ok(PropertyPatch {
            title: self.title,
            image: self.image,
            slug: self.slug,
            location: self.location.as_deref().map(parse_location).transpose()?,
            description: self.description,
            price: self.price,
            property_type: self
                .property_type
                .as_deref()
                .map(parse_property_type)
                .transpose()?,
            status: self.status.as_deref().map(parse_status).transpose()?,
            area: self.area,
        })
    }
}

/// Query parameters accepted by the list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListPropertiesParams {
    /// Exact-match city filter
    pub location: Option<Location>,
    /// Exact-match listing status filter
    pub status: Option<PropertyStatus>,
    /// Exact-match dwelling category filter
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    /// Case-insensitive substring match on title or description
    pub search: Option<String>,
    /// 1-based page number; values below 1 read as 1
    pub page: Option<i64>,
    /// Page size; clamped into the configured bounds
    pub limit: Option<i64>,
}

impl ListPropertiesParams {
    fn into_query(self, config: &AppConfig) -> (PropertyFilter, Pagination) {
        let page = self.page.map(|p| p.max(1) as u64);
        let limit = self.limit.map(|l| l.max(1) as u64);
        let pagination = Pagination::resolve(
            page,
            limit,
            u64::from(config.api_default_page_size),
            u64::from(config.api_max_page_size),
        );

        let filter = PropertyFilter {
            location: self.location,
            status: self.status,
            property_type: self.property_type,
            search: self.search,
        };

        (filter, pagination)
    }
}

/// A property record as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    pub id: Uuid,
    #[schema(example = "Ocean View Villa")]
    pub title: String,
    #[schema(example = "https://images.example.com/ocean-view-villa.jpg")]
    pub image: String,
    #[schema(example = "ocean-view-villa")]
    pub slug: String,
    pub location: Location,
    pub description: String,
    #[schema(example = "45000000")]
    pub price: Decimal,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    #[schema(example = 2400.0)]
    pub area: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<property::Model> for PropertyResponse {
    fn from(model: property::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            image: model.image,
            slug: model.slug,
            location: model.location,
            description: model.description,
            price: model.price,
            property_type: model.property_type,
            status: model.status,
            area: model.area,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Filters actually applied to a list query, echoed back in the response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AppliedFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl From<&PropertyFilter> for AppliedFilters {
    fn from(filter: &PropertyFilter) -> Self {
        Self {
            location: filter.location,
            status: filter.status,
            property_type: filter.property_type,
            // Echo only a search term that actually narrowed the query.
            search: filter
                .search
                .as_deref()
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_string),
        }
    }
}

/// Shape of the list endpoint response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PropertyListResponse {
    pub data: Vec<PropertyResponse>,
    pub pagination: PaginationMeta,
    pub filters: AppliedFilters,
}

/// Confirmation returned after a successful delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PropertyDeleted {
    #[schema(example = "Property deleted successfully")]
    pub message: String,
}

impl Default for PropertyDeleted {
    fn default() -> Self {
        Self {
            message: "Property deleted successfully".to_string(),
        }
    }
}

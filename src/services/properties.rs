use crate::{
    db::{DbPool, Pagination, PropertyFilter},
    entities::property::{self, Location, PropertyStatus, PropertyType},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// A fully validated property ready for insertion.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub title: String,
    pub image: String,
    pub slug: String,
    pub location: Location,
    pub description: String,
    pub price: Decimal,
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    pub area: f64,
}

/// Field-level changes for an existing property; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub image: Option<String>,
    pub slug: Option<String>,
    pub location: Option<Location>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub property_type: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
    pub area: Option<f64>,
}

/// Service for managing property listings
#[derive(Clone)]
pub struct PropertyService {
    db_pool: Arc<DbPool>,
}

impl PropertyService {
    /// Creates a new property service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Creates a new property listing
    #[instrument(skip(self, new))]
    pub async fn create_property(&self, new: NewProperty) -> Result<property::Model, ServiceError> {
        let db = &*self.db_pool;
        let slug = new.slug.clone();
        let now = Utc::now();

        let model = property::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            image: Set(new.image),
            slug: Set(new.slug),
            location: Set(new.location),
            description: Set(new.description),
            price: Set(new.price),
            property_type: Set(new.property_type),
            status: Set(new.status),
            area: Set(new.area),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model
            .insert(db)
            .await
            .map_err(|e| Self::map_slug_collision(e, &slug))?;

        info!(property_id = %created.id, slug = %created.slug, "Created property");
        Ok(created)
    }

    /// Lists properties matching `filter`, newest first, one page at a time.
    ///
    /// Returns the page of records together with the total number of matches,
    /// fetched concurrently.
    #[instrument(skip(self))]
    pub async fn list_properties(
        &self,
        filter: &PropertyFilter,
        pagination: Pagination,
    ) -> Result<(Vec<property::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let condition = filter.condition();

        let count = property::Entity::find()
            .filter(condition.clone())
            .count(db);
        let page = property::Entity::find()
            .filter(condition)
            .order_by_desc(property::Column::CreatedAt)
            // Tie-break on id so records created in the same instant page stably
            .order_by_desc(property::Column::Id)
            .limit(pagination.limit())
            .offset(pagination.offset())
            .all(db);

        let (total, items) = tokio::try_join!(count, page).map_err(ServiceError::DatabaseError)?;

        Ok((items, total))
    }

    /// Gets a property by ID
    #[instrument(skip(self))]
    pub async fn get_property(&self, raw_id: &str) -> Result<property::Model, ServiceError> {
        let db = &*self.db_pool;
        let id = Self::parse_id(raw_id)?;

        property::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| Self::id_not_found(raw_id))
    }

    /// Gets a property by its URL slug
    #[instrument(skip(self))]
    pub async fn get_property_by_slug(&self, slug: &str) -> Result<property::Model, ServiceError> {
        let db = &*self.db_pool;

        property::Entity::find()
            .filter(property::Column::Slug.eq(slug))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Property with slug '{slug}' not found"))
            })
    }

    /// Applies a partial update to an existing property
    #[instrument(skip(self, patch))]
    pub async fn update_property(
        &self,
        raw_id: &str,
        patch: PropertyPatch,
    ) -> Result<property::Model, ServiceError> {
        let db = &*self.db_pool;
        let existing = self.get_property(raw_id).await?;

        // Remember which slug an insert conflict would be about.
        let slug = patch.slug.clone().unwrap_or_else(|| existing.slug.clone());

        let mut active: property::ActiveModel = existing.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(image) = patch.image {
            active.image = Set(image);
        }
        if let Some(new_slug) = patch.slug {
            active.slug = Set(new_slug);
        }
        if let Some(location) = patch.location {
            active.location = Set(location);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(property_type) = patch.property_type {
            active.property_type = Set(property_type);
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        if let Some(area) = patch.area {
            active.area = Set(area);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => Self::id_not_found(raw_id),
            e => Self::map_slug_collision(e, &slug),
        })?;

        info!(property_id = %updated.id, "Updated property");
        Ok(updated)
    }

    /// Deletes a property by ID
    #[instrument(skip(self))]
    pub async fn delete_property(&self, raw_id: &str) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let id = Self::parse_id(raw_id)?;

        let result = property::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(Self::id_not_found(raw_id));
        }

        info!(property_id = %id, "Deleted property");
        Ok(())
    }

    /// A malformed ID can never match a record, so it reads as not found
    /// rather than a client error.
    fn parse_id(raw_id: &str) -> Result<Uuid, ServiceError> {
        Uuid::parse_str(raw_id).map_err(|_| Self::id_not_found(raw_id))
    }

    fn id_not_found(raw_id: &str) -> ServiceError {
        ServiceError::NotFound(format!("Property with ID '{raw_id}' not found"))
    }

    /// Translate a unique-index violation on the slug column into a conflict
    /// the caller can report; anything else stays a database error.
    fn map_slug_collision(err: DbErr, slug: &str) -> ServiceError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ServiceError::Conflict(format!("Property with slug '{slug}' already exists"))
            }
            _ => ServiceError::DatabaseError(err),
        }
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Property listing entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub image: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub location: Location,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: Decimal,
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    pub area: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// City a listing belongs to. Stored and serialized as the display name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Location {
    #[sea_orm(string_value = "Colombo")]
    Colombo,
    #[sea_orm(string_value = "Kandy")]
    Kandy,
    #[sea_orm(string_value = "Galle")]
    Galle,
}

/// Listing category. Wire value is the spaced display name ("Single Family").
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PropertyType {
    #[sea_orm(string_value = "Single Family")]
    #[serde(rename = "Single Family")]
    #[strum(serialize = "Single Family")]
    SingleFamily,
    #[sea_orm(string_value = "Villa")]
    Villa,
}

/// Sale/rent state of a listing
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PropertyStatus {
    #[sea_orm(string_value = "For Sale")]
    #[serde(rename = "For Sale")]
    #[strum(serialize = "For Sale")]
    ForSale,
    #[sea_orm(string_value = "For Rent")]
    #[serde(rename = "For Rent")]
    #[strum(serialize = "For Rent")]
    ForRent,
}

impl Location {
    pub const ALLOWED: &'static str = "Colombo, Kandy, Galle";
}

impl PropertyType {
    pub const ALLOWED: &'static str = "Single Family, Villa";
}

impl PropertyStatus {
    pub const ALLOWED: &'static str = "For Sale, For Rent";
}

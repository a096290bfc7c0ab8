//! Seed script - populates the catalog with realistic demo listings
//!
//! Run with: cargo run --bin seed-properties
//!
//! This creates nine properties spread across Colombo, Kandy, and Galle,
//! covering both dwelling types and both listing statuses.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use tracing::info;

use estate_api::db::{establish_connection, run_migrations};
use estate_api::entities::property::{self, Location, PropertyStatus, PropertyType};
use estate_api::errors::ServiceError;
use estate_api::services::properties::{NewProperty, PropertyService};

#[derive(Parser)]
#[command(
    name = "seed-properties",
    about = "Populates the property catalog with demo listings",
    version
)]
struct Cli {
    /// Database to seed; falls back to DATABASE_URL, then a local SQLite file
    #[arg(long)]
    database_url: Option<String>,

    /// Delete every existing property before seeding
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite://estate.db?mode=rwc".to_string());

    info!("=== Estate API Seed Data ===");
    info!("Connecting to database: {}", database_url);

    let db = establish_connection(&database_url).await?;
    run_migrations(&db).await?;

    if cli.fresh {
        let removed = property::Entity::delete_many()
            .exec(&db)
            .await?
            .rows_affected;
        info!("Removed {} existing properties", removed);
    }

    let service = PropertyService::new(Arc::new(db));

    info!("Creating properties...");
    let mut created = 0;
    for listing in demo_listings() {
        let slug = listing.slug.clone();
        match service.create_property(listing).await {
            Ok(_) => created += 1,
            Err(ServiceError::Conflict(_)) => {
                info!("  Skipping '{}': slug already present", slug);
            }
            Err(e) => return Err(e.into()),
        }
    }
    info!("  Created {} properties", created);

    info!("\n=== Seed Data Complete ===");
    info!("Try these API calls:");
    info!("  curl http://localhost:3001/api/v1/properties");
    info!("  curl 'http://localhost:3001/api/v1/properties?location=Galle&status=For%20Sale'");
    info!("  curl 'http://localhost:3001/api/v1/properties?search=villa&page=1&limit=5'");
    info!("  curl http://localhost:3001/api/v1/properties/slug/ocean-view-villa");
    info!("");
    info!("Or explore interactively at: http://localhost:3001/docs");

    Ok(())
}

fn demo_listings() -> Vec<NewProperty> {
    vec![
        listing(
            "Ocean View Villa",
            "ocean-view-villa",
            Location::Galle,
            PropertyType::Villa,
            PropertyStatus::ForSale,
            dec!(45_000_000),
            2400.0,
            "A breezy four-bedroom villa above Unawatuna with uninterrupted ocean views, a private pool, and mature frangipani gardens.",
        ),
        listing(
            "Fort Ramparts Townhouse",
            "fort-ramparts-townhouse",
            Location::Galle,
            PropertyType::SingleFamily,
            PropertyStatus::ForSale,
            dec!(28_500_000),
            1650.0,
            "Restored Dutch-era townhouse inside the Galle Fort walls, with original timber beams and a shaded inner courtyard.",
        ),
        listing(
            "Lighthouse Beach Cottage",
            "lighthouse-beach-cottage",
            Location::Galle,
            PropertyType::SingleFamily,
            PropertyStatus::ForRent,
            dec!(180_000),
            980.0,
            "Two-bedroom cottage a short walk from the lighthouse, rented furnished with a covered veranda facing the reef break.",
        ),
        listing(
            "Cinnamon Gardens Residence",
            "cinnamon-gardens-residence",
            Location::Colombo,
            PropertyType::SingleFamily,
            PropertyStatus::ForSale,
            dec!(95_000_000),
            3200.0,
            "Colonial-style residence on a quiet lane in Colombo 7, with five bedrooms, staff quarters, and space for three cars.",
        ),
        listing(
            "Marine Drive Sky Villa",
            "marine-drive-sky-villa",
            Location::Colombo,
            PropertyType::Villa,
            PropertyStatus::ForRent,
            dec!(650_000),
            2100.0,
            "Duplex villa-style penthouse on Marine Drive with a wraparound terrace, sea-facing master suite, and dedicated lift lobby.",
        ),
        listing(
            "Havelock Town Family Home",
            "havelock-town-family-home",
            Location::Colombo,
            PropertyType::SingleFamily,
            PropertyStatus::ForSale,
            dec!(52_000_000),
            1850.0,
            "Practical four-bedroom home near Havelock City mall with a landscaped rear garden and solar hot water throughout.",
        ),
        listing(
            "Hanthana Estate Bungalow",
            "hanthana-estate-bungalow",
            Location::Kandy,
            PropertyType::Villa,
            PropertyStatus::ForSale,
            dec!(38_000_000),
            2750.0,
            "Tea-country bungalow on the Hanthana ridge with mountain panoramas, a fireplace lounge, and half an acre of lawn.",
        ),
        listing(
            "Lake Round Cottage",
            "lake-round-cottage",
            Location::Kandy,
            PropertyType::SingleFamily,
            PropertyStatus::ForRent,
            dec!(145_000),
            1100.0,
            "Compact cottage minutes from Kandy Lake, rented semi-furnished and suited to a small family or visiting academics.",
        ),
        listing(
            "Peradeniya Garden Villa",
            "peradeniya-garden-villa",
            Location::Kandy,
            PropertyType::Villa,
            PropertyStatus::ForSale,
            dec!(41_500_000),
            2300.0,
            "Modern villa bordering the botanical gardens with double-height living space, a koi pond, and a granny flat above the garage.",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn listing(
    title: &str,
    slug: &str,
    location: Location,
    property_type: PropertyType,
    status: PropertyStatus,
    price: Decimal,
    area: f64,
    description: &str,
) -> NewProperty {
    NewProperty {
        title: title.to_string(),
        image: format!("https://images.example.com/listings/{slug}.jpg"),
        slug: slug.to_string(),
        location,
        description: description.to_string(),
        price,
        property_type,
        status,
        area,
    }
}

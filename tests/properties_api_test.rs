mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Duration, Utc};
use common::{read_json, valid_property_payload, TestApp};
use std::collections::HashSet;

#[tokio::test]
async fn create_returns_the_stored_record() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/properties",
            Some(valid_property_payload("ocean-view-villa")),
        )
        .await;
    let body = read_json(response, StatusCode::CREATED).await;

    assert!(body["id"].as_str().is_some());
    assert_eq!(body["title"], "Ocean View Villa");
    assert_eq!(body["slug"], "ocean-view-villa");
    assert_eq!(body["location"], "Galle");
    assert_eq!(body["type"], "Villa");
    assert_eq!(body["status"], "For Sale");
    assert_eq!(body["price"], "45000000");
    assert_eq!(body["area"], 2400.0);
    assert!(body["createdAt"].as_str().is_some());
    assert!(body["updatedAt"].as_str().is_some());
}

#[tokio::test]
async fn created_records_are_fetchable_by_id_and_slug() {
    let app = TestApp::new().await;

    let created = read_json(
        app.request(
            Method::POST,
            "/api/v1/properties",
            Some(valid_property_payload("fort-townhouse")),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let by_id = read_json(
        app.request(Method::GET, &format!("/api/v1/properties/{id}"), None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(by_id["slug"], "fort-townhouse");

    let by_slug = read_json(
        app.request(Method::GET, "/api/v1/properties/slug/fort-townhouse", None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(by_slug["id"], created["id"]);
}

#[tokio::test]
async fn duplicate_slug_is_rejected_with_conflict() {
    let app = TestApp::new().await;

    read_json(
        app.request(
            Method::POST,
            "/api/v1/properties",
            Some(valid_property_payload("ocean-view-villa")),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let mut second = valid_property_payload("ocean-view-villa");
    second["title"] = "Another Villa Entirely".into();
    let conflict = read_json(
        app.request(Method::POST, "/api/v1/properties", Some(second))
            .await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(conflict["error"], "Conflict");
    assert_eq!(
        conflict["message"],
        "Property with slug 'ocean-view-villa' already exists"
    );

    // The failed insert left exactly one record behind.
    let listing = read_json(
        app.request(Method::GET, "/api/v1/properties", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listing["pagination"]["totalItems"], 1);
    assert_eq!(listing["data"][0]["title"], "Ocean View Villa");
}

#[tokio::test]
async fn create_validation_enumerates_every_field() {
    let app = TestApp::new().await;

    let payload = serde_json::json!({
        "title": "ab",
        "image": "not a url",
        "slug": "Bad Slug!",
        "location": "Paris",
        "description": "too short",
        "price": 0,
        "type": "Condo",
        "status": "Sold",
        "area": 0.5
    });

    let body = read_json(
        app.request(Method::POST, "/api/v1/properties", Some(payload))
            .await,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert_eq!(body["error"], "Validation Failed");
    assert_eq!(body["message"], "Validation failed");

    let errors = &body["errors"];
    assert_eq!(errors["title"][0], "Title must be at least 3 characters long");
    assert_eq!(errors["image"][0], "Image must be a valid URL");
    assert_eq!(
        errors["slug"][0],
        "Slug must be lowercase letters, numbers, and hyphens only"
    );
    assert_eq!(
        errors["location"][0],
        "Location must be one of: Colombo, Kandy, Galle"
    );
    assert_eq!(
        errors["description"][0],
        "Description must be at least 10 characters long"
    );
    assert_eq!(errors["price"][0], "Price must be greater than 0");
    assert_eq!(
        errors["type"][0],
        "Property type must be one of: Single Family, Villa"
    );
    assert_eq!(
        errors["status"][0],
        "Property status must be one of: For Sale, For Rent"
    );
    assert_eq!(errors["area"][0], "Area must be greater than 0");
    assert!(errors.get("property_type").is_none());
}

#[tokio::test]
async fn missing_fields_are_all_reported_as_required() {
    let app = TestApp::new().await;

    let body = read_json(
        app.request(Method::POST, "/api/v1/properties", Some(serde_json::json!({})))
            .await,
        StatusCode::BAD_REQUEST,
    )
    .await;

    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 9);
    assert_eq!(errors["title"][0], "Title is required");
    assert_eq!(errors["image"][0], "Image URL is required");
    assert_eq!(errors["slug"][0], "Slug is required");
    assert_eq!(errors["location"][0], "Location is required");
    assert_eq!(errors["description"][0], "Description is required");
    assert_eq!(errors["price"][0], "Price must be a number");
    assert_eq!(errors["type"][0], "Property type is required");
    assert_eq!(errors["status"][0], "Property status is required");
    assert_eq!(errors["area"][0], "Area must be a number");
}

#[tokio::test]
async fn pagination_serves_stable_pages_newest_first() {
    let app = TestApp::new().await;
    let base = Utc::now() - Duration::minutes(60);
    for i in 1..=25 {
        app.insert_property_at(i, base + Duration::seconds(i as i64))
            .await;
    }

    let page3 = read_json(
        app.request(Method::GET, "/api/v1/properties?page=3&limit=10", None)
            .await,
        StatusCode::OK,
    )
    .await;

    let data = page3["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    // Newest-first ordering puts the oldest five on the last page.
    assert_eq!(data[0]["title"], "Listing 05");
    assert_eq!(data[4]["title"], "Listing 01");
    assert_eq!(page3["pagination"]["currentPage"], 3);
    assert_eq!(page3["pagination"]["totalPages"], 3);
    assert_eq!(page3["pagination"]["totalItems"], 25);
    assert_eq!(page3["pagination"]["itemsPerPage"], 10);

    // Walking every page yields each record exactly once.
    let mut seen = HashSet::new();
    for page in 1..=3 {
        let body = read_json(
            app.request(
                Method::GET,
                &format!("/api/v1/properties?page={page}&limit=10"),
                None,
            )
            .await,
            StatusCode::OK,
        )
        .await;
        for item in body["data"].as_array().unwrap() {
            assert!(
                seen.insert(item["slug"].as_str().unwrap().to_string()),
                "slug repeated across pages"
            );
        }
    }
    assert_eq!(seen.len(), 25);
}

#[tokio::test]
async fn paging_parameters_are_clamped() {
    let app = TestApp::new().await;
    let base = Utc::now() - Duration::minutes(10);
    for i in 1..=3 {
        app.insert_property_at(i, base + Duration::seconds(i as i64))
            .await;
    }

    let oversized = read_json(
        app.request(Method::GET, "/api/v1/properties?limit=500", None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(oversized["pagination"]["itemsPerPage"], 100);
    assert_eq!(oversized["pagination"]["totalPages"], 1);

    let undersized = read_json(
        app.request(Method::GET, "/api/v1/properties?limit=0", None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(undersized["pagination"]["itemsPerPage"], 1);
    assert_eq!(undersized["pagination"]["totalPages"], 3);

    let negative_page = read_json(
        app.request(Method::GET, "/api/v1/properties?page=-2", None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(negative_page["pagination"]["currentPage"], 1);
}

#[tokio::test]
async fn search_matches_title_or_description_case_insensitively() {
    let app = TestApp::new().await;

    let mut townhouse = valid_property_payload("fort-townhouse");
    townhouse["title"] = "Fort Townhouse".into();
    townhouse["description"] = "Restored townhouse with a grand Villa feel inside.".into();
    let mut hillside = valid_property_payload("hillside-home");
    hillside["title"] = "VILLA HEIGHTS".into();
    hillside["description"] = "Plain hillside home with mountain views.".into();
    let mut unrelated = valid_property_payload("city-apartment");
    unrelated["title"] = "City Apartment".into();
    unrelated["description"] = "A compact city apartment near the fort.".into();

    for payload in [townhouse, hillside, unrelated] {
        read_json(
            app.request(Method::POST, "/api/v1/properties", Some(payload))
                .await,
            StatusCode::CREATED,
        )
        .await;
    }

    let body = read_json(
        app.request(Method::GET, "/api/v1/properties?search=villa", None)
            .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["pagination"]["totalItems"], 2);
    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["slug"].as_str().unwrap())
        .collect();
    assert!(slugs.contains(&"fort-townhouse"));
    assert!(slugs.contains(&"hillside-home"));
    assert_eq!(body["filters"]["search"], "villa");
}

#[tokio::test]
async fn blank_search_is_ignored() {
    let app = TestApp::new().await;
    read_json(
        app.request(
            Method::POST,
            "/api/v1/properties",
            Some(valid_property_payload("ocean-view-villa")),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    let body = read_json(
        app.request(Method::GET, "/api/v1/properties?search=%20%20", None)
            .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["pagination"]["totalItems"], 1);
    assert!(body["filters"].get("search").is_none());
}

#[tokio::test]
async fn filters_combine_with_logical_and() {
    let app = TestApp::new().await;

    let mut kandy_rental = valid_property_payload("kandy-rental");
    kandy_rental["location"] = "Kandy".into();
    kandy_rental["status"] = "For Rent".into();
    let mut kandy_sale = valid_property_payload("kandy-sale");
    kandy_sale["location"] = "Kandy".into();
    let galle_sale = valid_property_payload("galle-sale");

    for payload in [kandy_rental, kandy_sale, galle_sale] {
        read_json(
            app.request(Method::POST, "/api/v1/properties", Some(payload))
                .await,
            StatusCode::CREATED,
        )
        .await;
    }

    let body = read_json(
        app.request(
            Method::GET,
            "/api/v1/properties?location=Kandy&status=For%20Sale",
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["pagination"]["totalItems"], 1);
    assert_eq!(body["data"][0]["slug"], "kandy-sale");
    assert_eq!(body["filters"]["location"], "Kandy");
    assert_eq!(body["filters"]["status"], "For Sale");
    assert!(body["filters"].get("type").is_none());
}

#[tokio::test]
async fn empty_catalog_lists_cleanly() {
    let app = TestApp::new().await;

    let body = read_json(
        app.request(Method::GET, "/api/v1/properties", None).await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["totalItems"], 0);
    assert_eq!(body["pagination"]["totalPages"], 0);
    assert_eq!(body["pagination"]["currentPage"], 1);
}

#[tokio::test]
async fn malformed_ids_read_as_not_found() {
    let app = TestApp::new().await;

    let get = read_json(
        app.request(Method::GET, "/api/v1/properties/not-a-uuid", None)
            .await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(get["error"], "Not Found");
    assert_eq!(get["message"], "Property with ID 'not-a-uuid' not found");

    read_json(
        app.request(
            Method::PATCH,
            "/api/v1/properties/not-a-uuid",
            Some(serde_json::json!({ "title": "New Title" })),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
    read_json(
        app.request(Method::DELETE, "/api/v1/properties/not-a-uuid", None)
            .await,
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn update_applies_partial_changes() {
    let app = TestApp::new().await;
    let created = read_json(
        app.request(
            Method::POST,
            "/api/v1/properties",
            Some(valid_property_payload("ocean-view-villa")),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let updated = read_json(
        app.request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(serde_json::json!({ "title": "Ocean View Villa Renovated", "price": 47000000 })),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(updated["title"], "Ocean View Villa Renovated");
    assert_eq!(updated["price"], "47000000");
    // Untouched fields survive the patch.
    assert_eq!(updated["slug"], "ocean-view-villa");
    assert_eq!(updated["location"], "Galle");

    let created_at: DateTime<Utc> = created["createdAt"].as_str().unwrap().parse().unwrap();
    let updated_at: DateTime<Utc> = updated["updatedAt"].as_str().unwrap().parse().unwrap();
    assert!(updated_at >= created_at);

    // An empty patch is a no-op, not an error.
    let unchanged = read_json(
        app.request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(serde_json::json!({})),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(unchanged["title"], "Ocean View Villa Renovated");
}

#[tokio::test]
async fn update_keeps_own_slug_and_rejects_taken_ones() {
    let app = TestApp::new().await;
    let first = read_json(
        app.request(
            Method::POST,
            "/api/v1/properties",
            Some(valid_property_payload("ocean-view-villa")),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    read_json(
        app.request(
            Method::POST,
            "/api/v1/properties",
            Some(valid_property_payload("fort-townhouse")),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = first["id"].as_str().unwrap();

    // Re-asserting the record's own slug is not a conflict.
    read_json(
        app.request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(serde_json::json!({ "slug": "ocean-view-villa" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    let conflict = read_json(
        app.request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(serde_json::json!({ "slug": "fort-townhouse" })),
        )
        .await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(
        conflict["message"],
        "Property with slug 'fort-townhouse' already exists"
    );
}

#[tokio::test]
async fn update_revalidates_provided_fields() {
    let app = TestApp::new().await;
    let created = read_json(
        app.request(
            Method::POST,
            "/api/v1/properties",
            Some(valid_property_payload("ocean-view-villa")),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let body = read_json(
        app.request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(serde_json::json!({ "price": 0, "location": "Paris" })),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["errors"]["price"][0], "Price must be greater than 0");
    assert_eq!(
        body["errors"]["location"][0],
        "Location must be one of: Colombo, Kandy, Galle"
    );
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let app = TestApp::new().await;
    let id = uuid::Uuid::new_v4();

    let body = read_json(
        app.request(
            Method::PATCH,
            &format!("/api/v1/properties/{id}"),
            Some(serde_json::json!({ "title": "New Title" })),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(body["message"], format!("Property with ID '{id}' not found"));
}

#[tokio::test]
async fn delete_confirms_then_turns_not_found() {
    let app = TestApp::new().await;
    let created = read_json(
        app.request(
            Method::POST,
            "/api/v1/properties",
            Some(valid_property_payload("ocean-view-villa")),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let confirmation = read_json(
        app.request(Method::DELETE, &format!("/api/v1/properties/{id}"), None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(confirmation["message"], "Property deleted successfully");

    read_json(
        app.request(Method::DELETE, &format!("/api/v1/properties/{id}"), None)
            .await,
        StatusCode::NOT_FOUND,
    )
    .await;
    read_json(
        app.request(Method::GET, &format!("/api/v1/properties/{id}"), None)
            .await,
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn missing_slug_lookups_are_not_found() {
    let app = TestApp::new().await;

    let body = read_json(
        app.request(Method::GET, "/api/v1/properties/slug/no-such-slug", None)
            .await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(body["message"], "Property with slug 'no-such-slug' not found");
}

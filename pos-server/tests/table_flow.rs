//! 桌台状态流转

mod common;

use common::{TestApp, error_code};
use http::StatusCode;
use serde_json::json;
use shared::ErrorCode;
use shared::models::Role;

#[tokio::test]
async fn occupy_reserve_and_release() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let host = app.staff("Hana Host", Role::Host).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let table_id = app.table(&admin, 12, 4).await;
    let uri = format!("/api/tables/{table_id}/status");

    // Occupied needs a waiter; the rejected change is not persisted
    let (status, body) = app
        .put(&uri, &host.token, json!({ "status": "occupied", "guestCount": 2 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), ErrorCode::TableWaiterRequired.code() as u64);
    let (_, body) = app.get(&format!("/api/tables/{table_id}"), &host.token).await;
    assert_eq!(body["table"]["status"], "available");
    assert!(body["table"]["guestCount"].is_null());

    let (status, body) = app
        .put(
            &uri,
            &host.token,
            json!({ "status": "reserved", "reservationName": "Lovelace", "reservationTime": 1_750_000_000_000i64 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["table"]["reservationName"], "Lovelace");

    // Reservation arrives
    let (status, body) = app
        .put(
            &uri,
            &host.token,
            json!({ "status": "occupied", "waiterId": waiter.user.id, "guestCount": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["table"]["status"], "occupied");
    assert!(body["table"]["reservationName"].is_null());
    assert!(body["table"]["reservationTime"].is_null());

    let (status, body) = app
        .put(&uri, &host.token, json!({ "status": "reserved", "reservationName": "Babbage" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), ErrorCode::TableInvalidTransition.code() as u64);

    let (status, body) = app.put(&uri, &waiter.token, json!({ "status": "available" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["table"]["waiterId"].is_null());
    assert!(body["table"]["guestCount"].is_null());
}

#[tokio::test]
async fn occupancy_checks_capacity_and_waiter() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let chef = app.staff("Carla Chef", Role::Chef).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let table_id = app.table(&admin, 7, 2).await;
    let uri = format!("/api/tables/{table_id}/status");

    let (status, body) = app
        .put(
            &uri,
            &admin.token,
            json!({ "status": "occupied", "waiterId": waiter.user.id, "guestCount": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), ErrorCode::TableCapacityExceeded.code() as u64);

    // A chef cannot be assigned to serve a table
    let (status, body) = app
        .put(
            &uri,
            &admin.token,
            json!({ "status": "occupied", "waiterId": chef.user.id, "guestCount": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), ErrorCode::WaiterInvalid.code() as u64);

    // Chefs cannot change table status at all
    let (status, _) = app.put(&uri, &chef.token, json!({ "status": "available" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn table_layout_management() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let first = app.table(&admin, 1, 4).await;
    app.table(&admin, 2, 6).await;

    let (status, body) = app
        .post("/api/tables", &admin.token, json!({ "number": 1, "capacity": 2 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), ErrorCode::TableNumberExists.code() as u64);

    let (status, _) = app
        .post("/api/tables", &waiter.token, json!({ "number": 9, "capacity": 2 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(&format!("/api/tables/{first}"), &admin.token, json!({ "capacity": 8 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["table"]["capacity"], 8);
    assert_eq!(body["table"]["number"], 1);

    let (status, body) = app.get("/api/tables?status=available", &waiter.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tables"].as_array().map(Vec::len), Some(2));

    let (status, body) = app.get("/api/tables/999", &waiter.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), ErrorCode::TableNotFound.code() as u64);
}

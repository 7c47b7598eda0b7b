//! 点餐到收款的完整流程
//!
//! 开台 → 下单 → 厨房推进 → 上菜 → 收款 → 订单锁定

mod common;

use common::{TestApp, error_code};
use http::StatusCode;
use serde_json::json;
use shared::ErrorCode;
use shared::models::Role;

#[tokio::test]
async fn table_to_paid_order() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let chef = app.staff("Carla Chef", Role::Chef).await;

    let table_id = app.table(&admin, 5, 4).await;
    let burger = app.menu_item(&admin, "Burger", 10.00).await;

    // Seat two guests with the waiter
    let (status, body) = app
        .put(
            &format!("/api/tables/{table_id}/status"),
            &waiter.token,
            json!({ "status": "occupied", "waiterId": waiter.user.id, "guestCount": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["table"]["status"], "occupied");
    assert_eq!(body["table"]["waiterId"], waiter.user.id);
    assert_eq!(body["table"]["guestCount"], 2);

    // One line, Burger x2
    let (status, body) = app
        .post(
            "/api/orders",
            &waiter.token,
            json!({ "tableId": table_id, "items": [{ "menuItemId": burger, "quantity": 2 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order_id = body["order"]["id"].as_i64().expect("order id");
    assert_eq!(body["order"]["status"], "new");
    assert_eq!(body["order"]["waiterId"], waiter.user.id);
    assert_eq!(body["order"]["items"][0]["name"], "Burger");
    assert_eq!(body["order"]["items"][0]["quantity"], 2);

    let (status, body) = app
        .get(&format!("/api/orders/{order_id}/totals?tipPercent=15"), &waiter.token)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["totals"]["subtotal"].as_f64(), Some(20.0));
    assert_eq!(body["totals"]["tax"].as_f64(), Some(1.7));
    assert_eq!(body["totals"]["tip"].as_f64(), Some(3.0));
    assert_eq!(body["totals"]["total"].as_f64(), Some(24.7));

    // Kitchen picks it up, waiter delivers
    for (token, next) in [
        (&chef.token, "in_progress"),
        (&chef.token, "done"),
        (&waiter.token, "delivered"),
    ] {
        let (status, body) = app
            .put(
                &format!("/api/orders/{order_id}/status"),
                token,
                json!({ "status": next }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{next}: {body}");
        assert_eq!(body["order"]["status"], next);
    }

    let (status, body) = app
        .post(
            &format!("/api/orders/{order_id}/payments"),
            &waiter.token,
            json!({ "amount": 20.00, "tip": 3.00, "method": "cash" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["order"]["status"], "paid");
    assert_eq!(body["payment"]["orderId"], order_id);
    assert_eq!(body["payment"]["method"], "cash");
    assert_eq!(body["payment"]["recordedBy"], waiter.user.id);

    // Paid is terminal
    for next in ["new", "cancelled", "delivered"] {
        let (status, body) = app
            .put(
                &format!("/api/orders/{order_id}/status"),
                &admin.token,
                json!({ "status": next }),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT, "{next}: {body}");
        assert_eq!(error_code(&body), ErrorCode::OrderAlreadyPaid.code() as u64);
    }

    let (status, body) = app
        .post(
            &format!("/api/orders/{order_id}/items"),
            &waiter.token,
            json!({ "menuItemId": burger, "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, body) = app
        .post(
            &format!("/api/orders/{order_id}/payments"),
            &waiter.token,
            json!({ "amount": 20.00, "method": "card" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
}

#[tokio::test]
async fn adding_an_existing_item_increments_quantity() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let table_id = app.table(&admin, 1, 4).await;
    let soup = app.menu_item(&admin, "Soup", 6.50).await;

    let (_, body) = app
        .post(
            "/api/orders",
            &waiter.token,
            json!({ "tableId": table_id, "items": [{ "menuItemId": soup, "quantity": 1 }] }),
        )
        .await;
    let order_id = body["order"]["id"].as_i64().expect("order id");

    let (status, body) = app
        .post(
            &format!("/api/orders/{order_id}/items"),
            &waiter.token,
            json!({ "menuItemId": soup, "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let items = body["order"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
}

#[tokio::test]
async fn duplicate_lines_in_one_submission_are_merged() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let table_id = app.table(&admin, 2, 2).await;
    let fries = app.menu_item(&admin, "Fries", 3.25).await;

    let (status, body) = app
        .post(
            "/api/orders",
            &waiter.token,
            json!({
                "tableId": table_id,
                "items": [
                    { "menuItemId": fries, "quantity": 1 },
                    { "menuItemId": fries, "quantity": 2 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let items = body["order"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
}

#[tokio::test]
async fn order_submission_is_validated() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let table_id = app.table(&admin, 3, 4).await;

    let (status, body) = app
        .post("/api/orders", &waiter.token, json!({ "tableId": table_id, "items": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), ErrorCode::OrderEmpty.code() as u64);

    let (status, body) = app
        .post(
            "/api/orders",
            &waiter.token,
            json!({ "tableId": table_id, "items": [{ "menuItemId": 999, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), ErrorCode::MenuItemNotFound.code() as u64);

    let (status, body) = app
        .post(
            "/api/orders",
            &waiter.token,
            json!({ "tableId": 999, "items": [{ "menuItemId": 1, "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), ErrorCode::TableNotFound.code() as u64);
}

#[tokio::test]
async fn status_cannot_skip_or_go_backward() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let table_id = app.table(&admin, 4, 4).await;
    let pasta = app.menu_item(&admin, "Pasta", 12.00).await;

    let (_, body) = app
        .post(
            "/api/orders",
            &waiter.token,
            json!({ "tableId": table_id, "items": [{ "menuItemId": pasta, "quantity": 1 }] }),
        )
        .await;
    let order_id = body["order"]["id"].as_i64().expect("order id");
    let status_uri = format!("/api/orders/{order_id}/status");

    let (status, body) = app
        .put(&status_uri, &waiter.token, json!({ "status": "delivered" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), ErrorCode::OrderInvalidTransition.code() as u64);

    let (status, body) = app
        .put(&status_uri, &waiter.token, json!({ "status": "paid" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), ErrorCode::OrderPaidRequiresPayment.code() as u64);

    // Payment before delivery
    let (status, body) = app
        .post(
            &format!("/api/orders/{order_id}/payments"),
            &waiter.token,
            json!({ "amount": 12.00, "method": "card" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), ErrorCode::PaymentOrderNotDelivered.code() as u64);

    let (status, _) = app
        .put(&status_uri, &waiter.token, json!({ "status": "cancelled" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .put(&status_uri, &waiter.token, json!({ "status": "new" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), ErrorCode::OrderAlreadyCancelled.code() as u64);
}

#[tokio::test]
async fn payment_amounts_finer_than_a_cent_are_rejected() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let chef = app.staff("Carla Chef", Role::Chef).await;
    let table_id = app.table(&admin, 8, 2).await;
    let soup = app.menu_item(&admin, "Soup", 20.00).await;

    let (_, body) = app
        .post(
            "/api/orders",
            &waiter.token,
            json!({ "tableId": table_id, "items": [{ "menuItemId": soup, "quantity": 1 }] }),
        )
        .await;
    let order_id = body["order"]["id"].as_i64().expect("order id");
    for (token, next) in [
        (&chef.token, "in_progress"),
        (&chef.token, "done"),
        (&waiter.token, "delivered"),
    ] {
        let (status, body) = app
            .put(
                &format!("/api/orders/{order_id}/status"),
                token,
                json!({ "status": next }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{next}: {body}");
    }

    let payments_uri = format!("/api/orders/{order_id}/payments");
    for payload in [
        json!({ "amount": 0.004, "tip": 0, "method": "cash" }),
        json!({ "amount": 20.005, "tip": 0, "method": "cash" }),
        json!({ "amount": 20.00, "tip": 0.001, "method": "cash" }),
    ] {
        let (status, body) = app.post(&payments_uri, &waiter.token, payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}: {body}");
        assert_eq!(error_code(&body), ErrorCode::PaymentInvalidAmount.code() as u64);
    }

    // Nothing was recorded, the order can still be paid
    let (status, body) = app
        .post(
            &payments_uri,
            &waiter.token,
            json!({ "amount": 20.00, "tip": 0, "method": "cash" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["payment"]["amount"].as_f64(), Some(20.0));
    assert_eq!(body["order"]["status"], "paid");
}

#[tokio::test]
async fn negative_lines_are_not_merged_away() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let table_id = app.table(&admin, 9, 2).await;
    let burger = app.menu_item(&admin, "Burger", 10.00).await;

    let (status, body) = app
        .post(
            "/api/orders",
            &waiter.token,
            json!({
                "tableId": table_id,
                "items": [
                    { "menuItemId": burger, "quantity": 5 },
                    { "menuItemId": burger, "quantity": -3 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(error_code(&body), ErrorCode::OrderInvalidQuantity.code() as u64);

    let (_, body) = app.get("/api/orders", &waiter.token).await;
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn kitchen_queue_lists_open_orders_oldest_first() {
    let app = TestApp::new().await;
    let admin = app.staff("Ada Admin", Role::Admin).await;
    let waiter = app.staff("Walt Waiter", Role::Waiter).await;
    let chef = app.staff("Carla Chef", Role::Chef).await;
    let table_id = app.table(&admin, 6, 4).await;
    let salad = app.menu_item(&admin, "Salad", 8.00).await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let (_, body) = app
            .post(
                "/api/orders",
                &waiter.token,
                json!({ "tableId": table_id, "items": [{ "menuItemId": salad, "quantity": 1 }] }),
            )
            .await;
        ids.push(body["order"]["id"].as_i64().expect("order id"));
    }
    app.put(
        &format!("/api/orders/{}/status", ids[1]),
        &waiter.token,
        json!({ "status": "cancelled" }),
    )
    .await;

    let (status, body) = app.get("/api/kitchen/orders", &chef.token).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let queue = body["orders"].as_array().expect("orders");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0]["id"], ids[0]);
    assert!(body["pollIntervalSecs"].as_u64().unwrap_or_default() > 0);

    // Chef moves the line through preparation but cannot edit it
    let item_id = queue[0]["items"][0]["id"].as_i64().expect("item id");
    let item_uri = format!("/api/orders/{}/items/{item_id}", ids[0]);
    let (status, body) = app
        .put(&item_uri, &chef.token, json!({ "status": "preparing" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["order"]["items"][0]["status"], "preparing");

    let (status, _) = app.put(&item_uri, &chef.token, json!({ "quantity": 5 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

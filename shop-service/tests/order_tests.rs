mod common;

use common::catalog_item;
use common::decimal;
use common::money;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::Value;

async fn place_order(app: &TestApp, token: &str) -> reqwest::Response {
    app.post_authenticated("/api/orders", token)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn test_place_order_with_empty_cart() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("alice", "pw123").await;

    let response = place_order(&app, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Cart is empty");
}

#[tokio::test]
async fn test_checkout_snapshots_prices() {
    let x = catalog_item("Smart Watch", "10.00");
    let app = TestApp::spawn_with_items(vec![x.clone()]).await;
    let token = app.signed_in("alice", "pw123").await;

    assert_eq!(
        place_order(&app, &token).await.status(),
        StatusCode::BAD_REQUEST
    );

    let cart: Value = app.add_to_cart(&token, &x.id, 2).await.json().await.unwrap();
    assert_eq!(money(&cart["data"]["total"]), decimal("20.00"));

    let response = place_order(&app, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Order placed successfully");
    let order = &body["data"]["order"];
    let order_id = order["id"].as_str().unwrap().to_string();
    let lines = order["items"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["item_id"], x.id.to_string());
    assert_eq!(lines[0]["quantity"], 2);
    assert_eq!(money(&lines[0]["price_at_purchase"]), decimal("10.00"));
    assert_eq!(money(&order["total_amount"]), decimal("20.00"));
    assert_eq!(order["status"], "pending");

    let cart: Value = app
        .get_authenticated("/api/carts", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(cart["data"]["items"].as_array().unwrap().is_empty());

    app.store.set_price(&x.id, decimal("15.00")).await;

    let stored: Value = app
        .get_authenticated(&format!("/api/orders/{}", order_id), &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(money(&stored["data"]["total_amount"]), decimal("20.00"));
    assert_eq!(
        money(&stored["data"]["items"][0]["price_at_purchase"]),
        decimal("10.00")
    );
}

#[tokio::test]
async fn test_order_total_sums_all_lines() {
    let x = catalog_item("Running Shoes", "79.99");
    let y = catalog_item("Water Bottle", "8.50");
    let app = TestApp::spawn_with_items(vec![x.clone(), y.clone()]).await;
    let token = app.signed_in("alice", "pw123").await;

    app.add_to_cart(&token, &x.id, 1).await;
    app.add_to_cart(&token, &y.id, 3).await;

    let body: Value = place_order(&app, &token).await.json().await.unwrap();
    let order = &body["data"]["order"];

    // Lines keep cart order
    assert_eq!(order["items"][0]["item_id"], x.id.to_string());
    assert_eq!(order["items"][1]["item_id"], y.id.to_string());
    assert_eq!(money(&order["total_amount"]), decimal("105.49"));
}

#[tokio::test]
async fn test_second_checkout_of_same_cart_fails() {
    let x = catalog_item("Yoga Mat", "20.00");
    let app = TestApp::spawn_with_items(vec![x.clone()]).await;
    let token = app.signed_in("alice", "pw123").await;
    app.add_to_cart(&token, &x.id, 1).await;

    assert_eq!(place_order(&app, &token).await.status(), StatusCode::CREATED);
    assert_eq!(
        place_order(&app, &token).await.status(),
        StatusCode::BAD_REQUEST
    );

    let orders: Value = app
        .get_authenticated("/api/orders", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(orders["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_checkout_fails_when_item_left_catalog() {
    let x = catalog_item("Desk Lamp", "12.00");
    let app = TestApp::spawn_with_items(vec![x.clone()]).await;
    let token = app.signed_in("alice", "pw123").await;
    app.add_to_cart(&token, &x.id, 1).await;

    app.store.remove_item(&x.id).await;

    let response = place_order(&app, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let orders: Value = app
        .get_authenticated("/api/orders", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(orders["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_orders_newest_first() {
    let x = catalog_item("Notebook", "3.00");
    let app = TestApp::spawn_with_items(vec![x.clone()]).await;
    let token = app.signed_in("alice", "pw123").await;

    app.add_to_cart(&token, &x.id, 1).await;
    let first: Value = place_order(&app, &token).await.json().await.unwrap();
    app.add_to_cart(&token, &x.id, 2).await;
    let second: Value = place_order(&app, &token).await.json().await.unwrap();

    let response = app
        .get_authenticated("/api/orders", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], second["data"]["order"]["id"]);
    assert_eq!(orders[1]["id"], first["data"]["order"]["id"]);
}

#[tokio::test]
async fn test_get_order_of_another_account() {
    let x = catalog_item("Backpack", "35.00");
    let app = TestApp::spawn_with_items(vec![x.clone()]).await;
    let alice = app.signed_in("alice", "pw123").await;
    let bob = app.signed_in("bob", "pw456").await;

    app.add_to_cart(&alice, &x.id, 1).await;
    let placed: Value = place_order(&app, &alice).await.json().await.unwrap();
    let order_id = placed["data"]["order"]["id"].as_str().unwrap();

    let response = app
        .get_authenticated(&format!("/api/orders/{}", order_id), &bob)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bob_orders: Value = app
        .get_authenticated("/api/orders", &bob)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(bob_orders["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_order_malformed_id() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("alice", "pw123").await;

    let response = app
        .get_authenticated("/api/orders/not-a-uuid", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_orders_require_session() {
    let app = TestApp::spawn().await;
    let token = app.signed_in("alice", "pw123").await;
    app.logout(&token).await;

    let response = place_order(&app, &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

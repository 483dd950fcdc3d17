//! Cart endpoint flows.
//!
//! Product 1 is "Clay Water Pot" at 450 in the seed catalog.

use serde_json::{Value, json};

use villagecraft_integration_tests::TestApp;

async fn get_cart(app: &TestApp) -> Value {
    app.client
        .get(app.url("/api/cart"))
        .send()
        .await
        .expect("get cart")
        .json()
        .await
        .expect("cart body")
}

#[tokio::test]
async fn unauthenticated_cart_calls_are_rejected_without_side_effects() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/cart/add"))
        .json(&json!({"productId": 1, "quantity": 1}))
        .send()
        .await
        .expect("add request");
    assert_eq!(response.status().as_u16(), 401);

    let body: Value = response.json().await.expect("body");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not authenticated. Please login again.");

    // After logging in, the cart shows nothing leaked from the refused add.
    app.login_as("meera@example.com").await;
    let cart = get_cart(&app).await;
    assert_eq!(cart["cart"]["items"], json!([]));
    assert_eq!(cart["cart"]["total"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn add_merges_lines_and_recomputes_total() {
    let app = TestApp::spawn().await;
    app.login_as("meera@example.com").await;

    let body: Value = app
        .client
        .post(app.url("/api/cart/add"))
        .json(&json!({"productId": 1}))
        .send()
        .await
        .expect("add")
        .json()
        .await
        .expect("body");
    assert_eq!(body["success"], true);
    assert_eq!(body["cart"]["items"][0]["quantity"], 1);
    assert_eq!(body["cart"]["total"].as_f64(), Some(450.0));

    let body: Value = app
        .client
        .post(app.url("/api/cart/add"))
        .json(&json!({"productId": 1}))
        .send()
        .await
        .expect("add")
        .json()
        .await
        .expect("body");
    let items = body["cart"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["price"].as_f64(), Some(450.0));
    assert_eq!(items[0]["name"], "Clay Water Pot");
    assert_eq!(body["cart"]["total"].as_f64(), Some(900.0));
}

#[tokio::test]
async fn add_unknown_product_is_not_found() {
    let app = TestApp::spawn().await;
    app.login_as("meera@example.com").await;

    let response = app
        .client
        .post(app.url("/api/cart/add"))
        .json(&json!({"productId": 999}))
        .send()
        .await
        .expect("add");
    assert_eq!(response.status().as_u16(), 404);

    let body: Value = response.json().await.expect("body");
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn update_to_zero_removes_the_line() {
    let app = TestApp::spawn().await;
    app.login_as("meera@example.com").await;

    app.client
        .post(app.url("/api/cart/add"))
        .json(&json!({"productId": 1, "quantity": 2}))
        .send()
        .await
        .expect("add");

    let body: Value = app
        .client
        .put(app.url("/api/cart/update"))
        .json(&json!({"productId": 1, "quantity": 0}))
        .send()
        .await
        .expect("update")
        .json()
        .await
        .expect("body");
    assert_eq!(body["success"], true);
    assert_eq!(body["cart"]["items"], json!([]));
    assert_eq!(body["cart"]["total"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn update_missing_cart_or_item_is_not_found() {
    let app = TestApp::spawn().await;
    app.login_as("meera@example.com").await;

    let response = app
        .client
        .put(app.url("/api/cart/update"))
        .json(&json!({"productId": 1, "quantity": 2}))
        .send()
        .await
        .expect("update");
    assert_eq!(response.status().as_u16(), 404);

    app.client
        .post(app.url("/api/cart/add"))
        .json(&json!({"productId": 1}))
        .send()
        .await
        .expect("add");

    let response = app
        .client
        .put(app.url("/api/cart/update"))
        .json(&json!({"productId": 2, "quantity": 2}))
        .send()
        .await
        .expect("update");
    assert_eq!(response.status().as_u16(), 404);

    let body: Value = response.json().await.expect("body");
    assert_eq!(body["message"], "Item not found in cart");
}

#[tokio::test]
async fn remove_is_forgiving_and_returns_the_cart() {
    let app = TestApp::spawn().await;
    app.login_as("meera@example.com").await;

    // Removing from a cart that does not exist yet still succeeds.
    let body: Value = app
        .client
        .delete(app.url("/api/cart/remove"))
        .json(&json!({"productId": 1}))
        .send()
        .await
        .expect("remove")
        .json()
        .await
        .expect("body");
    assert_eq!(body["success"], true);
    assert_eq!(body["cart"]["items"], json!([]));

    app.client
        .post(app.url("/api/cart/add"))
        .json(&json!({"productId": 1}))
        .send()
        .await
        .expect("add");
    app.client
        .post(app.url("/api/cart/add"))
        .json(&json!({"productId": 13}))
        .send()
        .await
        .expect("add");

    // Removing an absent item leaves the cart unchanged but succeeds.
    let body: Value = app
        .client
        .delete(app.url("/api/cart/remove"))
        .json(&json!({"productId": 24}))
        .send()
        .await
        .expect("remove")
        .json()
        .await
        .expect("body");
    assert_eq!(body["success"], true);
    assert_eq!(body["cart"]["items"].as_array().expect("items").len(), 2);

    // Removing a present item drops it and recomputes the total.
    let body: Value = app
        .client
        .delete(app.url("/api/cart/remove"))
        .json(&json!({"productId": 1}))
        .send()
        .await
        .expect("remove")
        .json()
        .await
        .expect("body");
    let items = body["cart"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"], 13);
    assert_eq!(body["cart"]["total"].as_f64(), Some(150.0));
}

#[tokio::test]
async fn clear_deletes_the_record_and_get_defaults_to_empty() {
    let app = TestApp::spawn().await;
    app.login_as("meera@example.com").await;

    for product_id in [1, 13, 19] {
        app.client
            .post(app.url("/api/cart/add"))
            .json(&json!({"productId": product_id}))
            .send()
            .await
            .expect("add");
    }

    let body: Value = app
        .client
        .delete(app.url("/api/cart/clear"))
        .send()
        .await
        .expect("clear")
        .json()
        .await
        .expect("body");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Cart cleared");

    let cart = get_cart(&app).await;
    assert_eq!(cart["success"], true);
    assert_eq!(cart["cart"]["items"], json!([]));
    assert_eq!(cart["cart"]["total"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn carts_are_scoped_per_user() {
    let meera = TestApp::spawn().await;
    meera.login_as("meera@example.com").await;
    meera
        .client
        .post(meera.url("/api/cart/add"))
        .json(&json!({"productId": 1}))
        .send()
        .await
        .expect("add");

    // A second client against the same server, different account.
    let rajesh = TestApp {
        addr: meera.addr,
        client: reqwest::Client::builder()
            .cookie_store(true)
            .no_proxy()
            .build()
            .expect("client"),
    };
    rajesh.login_as("rajesh@example.com").await;

    let cart = get_cart(&rajesh).await;
    assert_eq!(cart["cart"]["items"], json!([]));

    let cart = get_cart(&meera).await;
    assert_eq!(cart["cart"]["items"].as_array().expect("items").len(), 1);
}
